mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use orderdesk_core::command::Command;
use orderdesk_core::types::MemberId;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "orderdesk",
    about = "Team order desk: members, work orders, and notes from chat-style commands",
    version,
    propagate_version = true
)]
struct Cli {
    /// Desk root (default: auto-detect from .orderdesk/ or .git/)
    #[arg(long, global = true, env = "ORDERDESK_ROOT")]
    root: Option<PathBuf>,

    /// Member issuing the command (id or <@id> mention)
    #[arg(long = "as", global = true, env = "ORDERDESK_ACTOR")]
    actor: Option<MemberId>,

    /// Send log records to this webhook instead of the configured channel
    #[arg(long, global = true, env = "ORDERDESK_LOG_WEBHOOK")]
    log_webhook: Option<String>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .orderdesk/ with a default config
    Init,

    /// Register a team member with a role (re-registering overwrites)
    Register {
        member: MemberId,
        #[arg(required = true)]
        role: Vec<String>,
    },

    /// Remove a team member
    Unregister { member: MemberId },

    /// List registered team members
    Team,

    /// Create an order with status New
    #[command(name = "addorder", alias = "add-order")]
    AddOrder {
        id: String,
        #[arg(value_name = "TYPE")]
        kind: String,
        #[arg(required = true)]
        description: Vec<String>,
        /// Free-form deadline, e.g. 2026-11-01
        #[arg(long)]
        deadline: Option<String>,
    },

    /// Change an order's status
    #[command(name = "orderstatus", alias = "order-status")]
    OrderStatus {
        id: String,
        #[arg(required = true)]
        status: Vec<String>,
    },

    /// Assign an order to a member
    #[command(name = "assignorder", alias = "assign-order")]
    AssignOrder { id: String, member: MemberId },

    /// Show an order
    #[command(name = "checkorder", alias = "check-order")]
    CheckOrder { id: String },

    /// Mark an order Completed
    #[command(name = "finishorder", alias = "finish-order")]
    FinishOrder { id: String },

    /// Append a note to an order
    #[command(name = "addnote", alias = "add-note")]
    AddNote {
        id: String,
        #[arg(required = true)]
        note: Vec<String>,
    },

    /// Open orders grouped by assignee
    #[command(name = "whoisworking", alias = "who-is-working")]
    WhoIsWorking,

    /// Your role and assigned orders (requires --as)
    #[command(name = "mypage", alias = "my-page")]
    MyPage,

    /// List chat commands
    Commands,

    /// Read chat lines from stdin and answer commands on stdout
    Listen,
}

impl Commands {
    fn into_command(self) -> Option<Command> {
        let command = match self {
            Commands::Init | Commands::Listen => return None,
            Commands::Register { member, role } => Command::Register {
                member,
                role: role.join(" "),
            },
            Commands::Unregister { member } => Command::Unregister { member },
            Commands::Team => Command::Team,
            Commands::AddOrder {
                id,
                kind,
                description,
                deadline,
            } => Command::AddOrder {
                id,
                kind,
                description: description.join(" "),
                deadline,
            },
            Commands::OrderStatus { id, status } => Command::OrderStatus {
                id,
                status: status.join(" "),
            },
            Commands::AssignOrder { id, member } => Command::AssignOrder { id, member },
            Commands::CheckOrder { id } => Command::CheckOrder { id },
            Commands::FinishOrder { id } => Command::FinishOrder { id },
            Commands::AddNote { id, note } => Command::AddNote {
                id,
                note: note.join(" "),
            },
            Commands::WhoIsWorking => Command::WhoIsWorking,
            Commands::MyPage => Command::MyPage,
            Commands::Commands => Command::Commands,
        };
        Some(command)
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Listen => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let opts = cmd::Options {
        actor: cli.actor,
        log_webhook: cli.log_webhook,
        json: cli.json,
    };

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root, opts.json),
        Commands::Listen => cmd::listen::run(&root, &opts),
        other => match other.into_command() {
            Some(command) => cmd::desk::run(&root, command, &opts),
            None => Ok(()),
        },
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
