use super::{open_desk, Options};
use crate::output::{print_reply, Table};
use orderdesk_core::command::Command;
use orderdesk_core::desk::Desk;
use orderdesk_core::directory::label;
use std::path::Path;

/// Run a single command and print its reply. A rejected command exits non-zero.
pub fn run(root: &Path, command: Command, opts: &Options) -> anyhow::Result<()> {
    let desk = open_desk(root, opts)?;

    if !opts.json {
        match &command {
            Command::Team => return print_team(&desk),
            Command::WhoIsWorking => return print_working(&desk),
            _ => {}
        }
    }

    let reply = desk.execute(opts.actor, command);
    // Rejections go to stderr through the error below.
    if opts.json || reply.ok {
        print_reply(&reply, opts.json)?;
    }
    if !reply.ok {
        anyhow::bail!("{}", reply.text);
    }
    Ok(())
}

fn print_team(desk: &Desk) -> anyhow::Result<()> {
    let team = desk.store().list_team();
    if team.is_empty() {
        println!("No team members have been registered yet.");
        return Ok(());
    }
    let mut table = Table::new(&["ID", "MEMBER", "ROLE"]);
    for (id, role) in &team {
        table.row([id.to_string(), label(desk.directory(), *id), role.clone()]);
    }
    table.print();
    Ok(())
}

fn print_working(desk: &Desk) -> anyhow::Result<()> {
    let groups = desk.store().list_working(desk.directory());
    if groups.is_empty() {
        println!("Nobody is working on an open order.");
        return Ok(());
    }
    let mut table = Table::new(&["MEMBER", "ORDER", "STATUS", "DEADLINE"]);
    for group in &groups {
        for order in &group.orders {
            table.row([
                group.member.clone(),
                order.id.clone(),
                order.status.clone(),
                order.deadline.clone().unwrap_or_default(),
            ]);
        }
    }
    table.print();
    Ok(())
}
