//! Executes parsed commands against the record store on behalf of an actor.
//!
//! Every command yields a [`Reply`]; failures become short notices rather
//! than errors. Mutating commands also emit a [`LogRecord`] through the
//! configured notifier, best effort.

use crate::command::{self, Command};
use crate::config::Config;
use crate::directory::{self, Directory};
use crate::error::{DeskError, Result};
use crate::notify::{notify_best_effort, LogRecord, Notifier};
use crate::store::RecordStore;
use crate::types::MemberId;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub ok: bool,
    pub text: String,
    /// Structured payload for read commands.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Reply {
    fn ok(text: impl Into<String>) -> Self {
        Self {
            ok: true,
            text: text.into(),
            data: None,
        }
    }

    fn notice(text: impl Into<String>) -> Self {
        Self {
            ok: false,
            text: text.into(),
            data: None,
        }
    }

    fn with_data<T: Serialize>(mut self, data: &T) -> Self {
        self.data = serde_json::to_value(data).ok();
        self
    }
}

pub struct Desk {
    store: RecordStore,
    directory: Box<dyn Directory>,
    notifier: Box<dyn Notifier>,
    prefix: String,
}

impl Desk {
    pub fn new(
        store: RecordStore,
        directory: Box<dyn Directory>,
        notifier: Box<dyn Notifier>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            store,
            directory,
            notifier,
            prefix: prefix.into(),
        }
    }

    /// Open the desk under `root` with the given configuration.
    pub fn open(root: &Path, config: &Config) -> Self {
        Self::new(
            RecordStore::open(root, config.persist_orders),
            Box::new(config.members.clone()),
            config.notifier(root),
            config.prefix.clone(),
        )
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn directory(&self) -> &dyn Directory {
        self.directory.as_ref()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Handle one chat message. `None` when the message is not a command.
    pub fn handle_message(&self, actor: Option<MemberId>, text: &str) -> Option<Reply> {
        match command::parse_message(&self.prefix, text)? {
            Ok(cmd) => Some(self.execute(actor, cmd)),
            Err(e) => Some(Reply::notice(e.to_string())),
        }
    }

    pub fn execute(&self, actor: Option<MemberId>, cmd: Command) -> Reply {
        let name = cmd.name().to_string();
        match self.run(actor, cmd) {
            Ok((reply, record)) => {
                if let Some(record) = record {
                    notify_best_effort(self.notifier.as_ref(), &record);
                }
                reply
            }
            Err(e) => {
                tracing::debug!(command = %name, error = %e, "command rejected");
                Reply::notice(notice_for(&e))
            }
        }
    }

    fn member_label(&self, id: MemberId) -> String {
        self.directory
            .display_name(id)
            .unwrap_or_else(|| id.mention())
    }

    fn run(&self, actor: Option<MemberId>, cmd: Command) -> Result<(Reply, Option<LogRecord>)> {
        let action = cmd.name().to_string();
        match cmd {
            Command::Register { member, role } => {
                self.store.register(member, role.as_str())?;
                let record = LogRecord::new(actor, &action, member.to_string())
                    .detail("Registered member", member.mention())
                    .detail("Assigned role", &role);
                let reply = Reply::ok(format!("Registered {} as a {role}!", self.member_label(member)));
                Ok((reply, Some(record)))
            }
            Command::Unregister { member } => {
                let role = self.store.unregister(member)?;
                let record = LogRecord::new(actor, &action, member.to_string())
                    .detail("Removed member", member.mention())
                    .detail("Previous role", &role);
                let reply = Reply::ok(format!(
                    "Unregistered {} (was {role}).",
                    self.member_label(member)
                ));
                Ok((reply, Some(record)))
            }
            Command::Team => {
                let team = self.store.list_team();
                if team.is_empty() {
                    return Ok((Reply::ok("No team members have been registered yet."), None));
                }
                let mut text = String::from("Here's the team:\n");
                let mut rows = Vec::new();
                for (id, role) in &team {
                    let name = self.directory.display_name(*id);
                    text.push_str(&format!("- {}: {role}\n", directory::label(self.directory(), *id)));
                    rows.push(serde_json::json!({ "member_id": id, "name": name, "role": role }));
                }
                Ok((Reply::ok(text).with_data(&rows), None))
            }
            Command::AddOrder {
                id,
                kind,
                description,
                deadline,
            } => {
                let order = self.store.create_order(
                    &id,
                    Some(kind),
                    Some(description),
                    deadline,
                )?;
                let mut record = LogRecord::new(actor, &action, &id)
                    .detail("Order ID", &id)
                    .detail("Type", order.kind.as_deref().unwrap_or("Not specified"))
                    .detail(
                        "Description",
                        order.description.as_deref().unwrap_or("Not specified"),
                    );
                if let Some(deadline) = &order.deadline {
                    record = record.detail("Deadline", deadline);
                }
                let reply = Reply::ok(format!("Order {id} added with status: {}", order.status))
                    .with_data(&order);
                Ok((reply, Some(record)))
            }
            Command::OrderStatus { id, status } => {
                let previous = self.store.set_status(&id, status.as_str())?;
                let record = LogRecord::new(actor, &action, &id)
                    .detail("Order ID", &id)
                    .detail("Old status", &previous)
                    .detail("New status", &status);
                let reply = Reply::ok(format!("Status of order {id} updated to: {status}"));
                Ok((reply, Some(record)))
            }
            Command::AssignOrder { id, member } => {
                self.store.assign(&id, member)?;
                if self.store.role_of(member).is_none() {
                    tracing::info!(order = %id, member = %member, "order assigned to a member who is not on the roster");
                }
                let record = LogRecord::new(actor, &action, &id)
                    .detail("Order ID", &id)
                    .detail("Assigned to", member.mention());
                let reply = Reply::ok(format!(
                    "Order {id} has been assigned to {}!",
                    self.member_label(member)
                ));
                Ok((reply, Some(record)))
            }
            Command::CheckOrder { id } => {
                let view = self.store.get_order(&id, self.directory())?;
                let order = &view.order;
                let mut text = format!("Order ID: {id}\nStatus: {}\n", order.status);
                if let Some(kind) = &order.kind {
                    text.push_str(&format!("Type: {kind}\n"));
                }
                if let Some(description) = &order.description {
                    text.push_str(&format!("Description: {description}\n"));
                }
                if let Some(deadline) = &order.deadline {
                    text.push_str(&format!("Deadline: {deadline}\n"));
                }
                if let Some(assignee) = &view.assignee {
                    let name = assignee
                        .display_name
                        .clone()
                        .unwrap_or_else(|| "Unknown member".to_string());
                    match &assignee.role {
                        Some(role) => text.push_str(&format!("Assigned to: {name} ({role})\n")),
                        None => text.push_str(&format!("Assigned to: {name}\n")),
                    }
                }
                if !order.notes.is_empty() {
                    text.push_str("Notes:\n");
                    for (i, note) in order.notes.iter().enumerate() {
                        text.push_str(&format!("{}. {note}\n", i + 1));
                    }
                }
                Ok((Reply::ok(text).with_data(&view), None))
            }
            Command::FinishOrder { id } => {
                let previous = self.store.finish(&id)?;
                let record = LogRecord::new(actor, &action, &id)
                    .detail("Order ID", &id)
                    .detail("Old status", &previous);
                Ok((Reply::ok(format!("Order {id} marked as Completed.")), Some(record)))
            }
            Command::AddNote { id, note } => {
                let count = self.store.add_note(&id, note.as_str())?;
                let record = LogRecord::new(actor, &action, &id)
                    .detail("Order ID", &id)
                    .detail("Note", &note);
                Ok((
                    Reply::ok(format!("Note added to order {id} ({count} total).")),
                    Some(record),
                ))
            }
            Command::WhoIsWorking => {
                let groups = self.store.list_working(self.directory());
                if groups.is_empty() {
                    return Ok((Reply::ok("Nobody is working on an open order."), None));
                }
                let mut text = String::from("Currently working:\n");
                for group in &groups {
                    let ids: Vec<String> = group
                        .orders
                        .iter()
                        .map(|o| format!("{} ({})", o.id, o.status))
                        .collect();
                    text.push_str(&format!("- {}: {}\n", group.member, ids.join(", ")));
                }
                Ok((Reply::ok(text).with_data(&groups), None))
            }
            Command::MyPage => {
                let member = actor.ok_or_else(|| {
                    DeskError::Usage("mypage needs to know who is asking".to_string())
                })?;
                let page = self.store.orders_for(member);
                let mut text = format!("Page for {}\n", self.member_label(member));
                match &page.role {
                    Some(role) => text.push_str(&format!("Role: {role}\n")),
                    None => text.push_str("Role: not registered\n"),
                }
                if page.orders.is_empty() {
                    text.push_str("No orders assigned.\n");
                } else {
                    text.push_str("Orders:\n");
                    for o in &page.orders {
                        text.push_str(&format!("- {}: {}\n", o.id, o.status));
                    }
                }
                Ok((Reply::ok(text).with_data(&page), None))
            }
            Command::Commands => Ok((Reply::ok(command::help_text(&self.prefix)), None)),
            Command::Platform { name } => Ok((
                Reply::notice(format!("{}{name} is handled by the chat platform.", self.prefix)),
                None,
            )),
        }
    }
}

/// User-facing wording for a rejected command.
fn notice_for(e: &DeskError) -> String {
    match e {
        DeskError::OrderNotFound(id) => format!("Order with ID {id} not found!"),
        DeskError::OrderExists(id) => format!("Order with ID {id} already exists!"),
        DeskError::MemberNotFound(id) => format!("{} is not a registered team member.", id.mention()),
        DeskError::Usage(msg) => msg.clone(),
        other => format!("Something went wrong: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NullNotifier;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<LogRecord>>>);

    impl Notifier for Recorder {
        fn notify(&self, record: &LogRecord) -> Result<()> {
            self.0.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    struct Broken;

    impl Notifier for Broken {
        fn notify(&self, _record: &LogRecord) -> Result<()> {
            Err(DeskError::Notify("channel deleted".into()))
        }
    }

    const ADMIN: Option<MemberId> = Some(MemberId(1));

    fn members() -> BTreeMap<MemberId, String> {
        [(MemberId(1), "admin"), (MemberId(111), "alice")]
            .into_iter()
            .map(|(id, n)| (id, n.to_string()))
            .collect()
    }

    fn desk_with(dir: &TempDir, notifier: Box<dyn Notifier>) -> Desk {
        Desk::new(
            RecordStore::open(dir.path(), true),
            Box::new(members()),
            notifier,
            "!!",
        )
    }

    fn say(desk: &Desk, text: &str) -> Reply {
        desk.handle_message(ADMIN, text).expect("command reply")
    }

    #[test]
    fn register_team_unregister_scenario() {
        let dir = TempDir::new().unwrap();
        let desk = desk_with(&dir, Box::new(NullNotifier));

        let reply = say(&desk, "!!register 111 Designer");
        assert!(reply.ok);
        assert_eq!(reply.text, "Registered alice as a Designer!");

        let team = say(&desk, "!!team");
        assert!(team.text.contains("- alice: Designer"));

        assert!(say(&desk, "!!unregister 111").ok);
        let team = say(&desk, "!!team");
        assert_eq!(team.text, "No team members have been registered yet.");

        // restart
        drop(desk);
        let desk = desk_with(&dir, Box::new(NullNotifier));
        assert!(desk.store().list_team().is_empty());
    }

    #[test]
    fn unregister_unknown_member_is_a_notice() {
        let dir = TempDir::new().unwrap();
        let desk = desk_with(&dir, Box::new(NullNotifier));
        let reply = say(&desk, "!!unregister 42");
        assert!(!reply.ok);
        assert_eq!(reply.text, "<@42> is not a registered team member.");
    }

    #[test]
    fn order_scenario() {
        let dir = TempDir::new().unwrap();
        let desk = desk_with(&dir, Box::new(NullNotifier));

        let reply = say(&desk, r#"!!addorder A1 Logo "Client X logo""#);
        assert_eq!(reply.text, "Order A1 added with status: New");
        assert!(say(&desk, "!!checkorder A1").text.contains("Status: New\n"));

        say(&desk, "!!orderstatus A1 In Progress");
        assert!(say(&desk, "!!checkorder A1").text.contains("Status: In Progress\n"));

        say(&desk, "!!finishorder A1");
        let check = say(&desk, "!!checkorder A1");
        assert!(check.text.contains("Status: Completed\n"));
        assert_eq!(check.data.unwrap()["status"], "Completed");
    }

    #[test]
    fn duplicate_and_missing_orders_are_notices() {
        let dir = TempDir::new().unwrap();
        let desk = desk_with(&dir, Box::new(NullNotifier));
        say(&desk, "!!addorder A1 Logo Draft");

        let dup = say(&desk, "!!addorder A1 Banner Other");
        assert!(!dup.ok);
        assert_eq!(dup.text, "Order with ID A1 already exists!");

        let missing = say(&desk, "!!finishorder Z9");
        assert!(!missing.ok);
        assert_eq!(missing.text, "Order with ID Z9 not found!");
    }

    #[test]
    fn checkorder_shows_assignee_role_and_notes() {
        let dir = TempDir::new().unwrap();
        let desk = desk_with(&dir, Box::new(NullNotifier));
        say(&desk, "!!register <@111> Designer");
        say(&desk, "!!addorder A1 Logo Draft 2026-12-01");
        say(&desk, "!!assignorder A1 <@111>");
        say(&desk, "!!addnote A1 sent first sketch");

        let text = say(&desk, "!!checkorder A1").text;
        assert!(text.contains("Deadline: 2026-12-01\n"));
        assert!(text.contains("Assigned to: alice (Designer)\n"));
        assert!(text.contains("1. sent first sketch\n"));
    }

    #[test]
    fn checkorder_with_departed_assignee() {
        let dir = TempDir::new().unwrap();
        let desk = desk_with(&dir, Box::new(NullNotifier));
        say(&desk, "!!addorder A1 Logo Draft");
        say(&desk, "!!assignorder A1 999");
        assert!(say(&desk, "!!checkorder A1")
            .text
            .contains("Assigned to: Unknown member\n"));
    }

    #[test]
    fn mutating_commands_are_logged() {
        let dir = TempDir::new().unwrap();
        let recorder = Recorder::default();
        let desk = desk_with(&dir, Box::new(recorder.clone()));

        say(&desk, "!!register 111 Designer");
        say(&desk, "!!addorder A1 Logo Draft");
        say(&desk, "!!orderstatus A1 Review");
        say(&desk, "!!checkorder A1");
        say(&desk, "!!team");
        say(&desk, "!!finishorder Z9");

        let records = recorder.0.lock().unwrap();
        let actions: Vec<&str> = records.iter().map(|r| r.action.as_str()).collect();
        assert_eq!(actions, vec!["register", "addorder", "orderstatus"]);
        assert_eq!(records[0].actor, ADMIN);
        assert!(records[2].details.contains(&"Old status: New".to_string()));
    }

    #[test]
    fn broken_log_channel_never_fails_the_command() {
        let dir = TempDir::new().unwrap();
        let desk = desk_with(&dir, Box::new(Broken));

        let reply = say(&desk, "!!register 111 Designer");
        assert!(reply.ok);
        assert_eq!(desk.store().role_of(MemberId(111)).as_deref(), Some("Designer"));
    }

    #[test]
    fn failed_save_leaves_nothing_behind() {
        let dir = TempDir::new().unwrap();
        let orders = crate::paths::orders_path(dir.path());
        std::fs::create_dir_all(&orders).unwrap();
        let recorder = Recorder::default();
        let desk = desk_with(&dir, Box::new(recorder.clone()));

        let reply = say(&desk, "!!addorder A1 Logo Draft");
        assert!(!reply.ok);
        assert!(reply.text.starts_with("Something went wrong"));
        assert_eq!(say(&desk, "!!checkorder A1").text, "Order with ID A1 not found!");
        assert!(recorder.0.lock().unwrap().is_empty());

        std::fs::remove_dir(&orders).unwrap();
        assert!(say(&desk, "!!addorder A1 Logo Draft").ok);
    }

    #[test]
    fn whoisworking_tags_unknown_members() {
        let dir = TempDir::new().unwrap();
        let desk = desk_with(&dir, Box::new(NullNotifier));
        say(&desk, "!!addorder A1 Logo Draft");
        say(&desk, "!!addorder A2 Banner Draft");
        say(&desk, "!!addorder A3 Flyer Draft");
        say(&desk, "!!assignorder A1 111");
        say(&desk, "!!assignorder A2 555");
        say(&desk, "!!assignorder A3 111");
        say(&desk, "!!finishorder A3");

        let text = say(&desk, "!!whoisworking").text;
        assert!(text.contains("- alice: A1 (New)\n"));
        assert!(text.contains("- Unknown member (555): A2 (New)\n"));
        assert!(!text.contains("A3"));
    }

    #[test]
    fn mypage_needs_an_actor() {
        let dir = TempDir::new().unwrap();
        let desk = desk_with(&dir, Box::new(NullNotifier));
        say(&desk, "!!register 111 Designer");
        say(&desk, "!!addorder A1 Logo Draft");
        say(&desk, "!!assignorder A1 111");

        let page = desk.handle_message(Some(MemberId(111)), "!!mypage").unwrap();
        assert!(page.text.contains("Role: Designer\n"));
        assert!(page.text.contains("- A1: New\n"));

        let anonymous = desk.handle_message(None, "!!mypage").unwrap();
        assert!(!anonymous.ok);
    }

    #[test]
    fn chatter_and_platform_commands() {
        let dir = TempDir::new().unwrap();
        let desk = desk_with(&dir, Box::new(NullNotifier));
        assert!(desk.handle_message(ADMIN, "good morning").is_none());

        let reply = say(&desk, "!!uptime");
        assert!(!reply.ok);
        assert_eq!(reply.text, "!!uptime is handled by the chat platform.");

        let unknown = say(&desk, "!!dance");
        assert!(!unknown.ok);
        assert!(unknown.text.contains("unknown command 'dance'"));
    }

    #[test]
    fn open_builds_desk_from_config() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            prefix: "?".into(),
            ..Config::default()
        };
        let desk = Desk::open(dir.path(), &config);
        assert_eq!(desk.prefix(), "?");
        assert!(desk.handle_message(ADMIN, "?register 5 QA").unwrap().ok);
        // default log channel writes an audit file
        let audit = std::fs::read_to_string(crate::paths::audit_path(dir.path())).unwrap();
        assert!(audit.contains("\"action\":\"register\""));
    }
}
