//! Chat command router: turns `!!addorder A1 Logo "Client X logo"` into a
//! typed [`Command`].
//!
//! Arguments are whitespace separated; double quotes group words. A trailing
//! "rest" argument (role, status, note) takes the remainder of the message
//! verbatim, so `!!register <@1> Senior Designer` needs no quotes.

use crate::error::{DeskError, Result};
use crate::types::MemberId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Register {
        member: MemberId,
        role: String,
    },
    Unregister {
        member: MemberId,
    },
    Team,
    AddOrder {
        id: String,
        kind: String,
        description: String,
        deadline: Option<String>,
    },
    OrderStatus {
        id: String,
        status: String,
    },
    AssignOrder {
        id: String,
        member: MemberId,
    },
    CheckOrder {
        id: String,
    },
    FinishOrder {
        id: String,
    },
    AddNote {
        id: String,
        note: String,
    },
    WhoIsWorking,
    MyPage,
    Commands,
    /// Commands the chat platform answers itself (announcements, polls, …).
    Platform {
        name: String,
    },
}

impl Command {
    pub fn name(&self) -> &str {
        match self {
            Command::Register { .. } => "register",
            Command::Unregister { .. } => "unregister",
            Command::Team => "team",
            Command::AddOrder { .. } => "addorder",
            Command::OrderStatus { .. } => "orderstatus",
            Command::AssignOrder { .. } => "assignorder",
            Command::CheckOrder { .. } => "checkorder",
            Command::FinishOrder { .. } => "finishorder",
            Command::AddNote { .. } => "addnote",
            Command::WhoIsWorking => "whoisworking",
            Command::MyPage => "mypage",
            Command::Commands => "commands",
            Command::Platform { name } => name.as_str(),
        }
    }
}

// ---------------------------------------------------------------------------
// Help table
// ---------------------------------------------------------------------------

pub struct CommandHelp {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
}

pub const COMMANDS: &[CommandHelp] = &[
    CommandHelp {
        name: "register",
        usage: "<member> <role>",
        summary: "Register a team member with a role",
    },
    CommandHelp {
        name: "unregister",
        usage: "<member>",
        summary: "Remove a team member",
    },
    CommandHelp {
        name: "team",
        usage: "",
        summary: "List registered team members",
    },
    CommandHelp {
        name: "addorder",
        usage: "<id> <type> <description> [deadline]",
        summary: "Create an order with status New",
    },
    CommandHelp {
        name: "orderstatus",
        usage: "<id> <status>",
        summary: "Change an order's status",
    },
    CommandHelp {
        name: "assignorder",
        usage: "<id> <member>",
        summary: "Assign an order to a member",
    },
    CommandHelp {
        name: "checkorder",
        usage: "<id>",
        summary: "Show an order",
    },
    CommandHelp {
        name: "finishorder",
        usage: "<id>",
        summary: "Mark an order Completed",
    },
    CommandHelp {
        name: "addnote",
        usage: "<id> <note>",
        summary: "Append a note to an order",
    },
    CommandHelp {
        name: "whoisworking",
        usage: "",
        summary: "Open orders grouped by assignee",
    },
    CommandHelp {
        name: "mypage",
        usage: "",
        summary: "Your role and assigned orders",
    },
    CommandHelp {
        name: "commands",
        usage: "",
        summary: "Show this list",
    },
];

pub const PLATFORM_COMMANDS: &[&str] = &[
    "announcement",
    "say",
    "shoutout",
    "clear",
    "serverinfo",
    "poll",
    "uptime",
];

pub fn help_text(prefix: &str) -> String {
    let mut out = String::from("Available commands:\n");
    for c in COMMANDS {
        let usage = if c.usage.is_empty() {
            String::new()
        } else {
            format!(" {}", c.usage)
        };
        out.push_str(&format!("- {prefix}{}{usage}: {}\n", c.name, c.summary));
    }
    out
}

// ---------------------------------------------------------------------------
// Argument cursor
// ---------------------------------------------------------------------------

struct Args<'a> {
    rest: &'a str,
}

impl<'a> Args<'a> {
    fn new(text: &'a str) -> Self {
        Self { rest: text.trim_start() }
    }

    /// Next word or double-quoted phrase.
    fn word(&mut self) -> Result<Option<String>> {
        let s = self.rest.trim_start();
        if s.is_empty() {
            self.rest = s;
            return Ok(None);
        }
        if let Some(body) = s.strip_prefix('"') {
            let end = body
                .find('"')
                .ok_or_else(|| DeskError::Usage("unterminated quote".to_string()))?;
            self.rest = &body[end + 1..];
            return Ok(Some(body[..end].to_string()));
        }
        let end = s.find(char::is_whitespace).unwrap_or(s.len());
        self.rest = &s[end..];
        Ok(Some(s[..end].to_string()))
    }

    fn required(&mut self, name: &str, command: &str) -> Result<String> {
        self.word()?
            .filter(|w| !w.is_empty())
            .ok_or_else(|| missing(name, command))
    }

    fn member(&mut self, command: &str) -> Result<MemberId> {
        self.required("member", command)?.parse()
    }

    /// The remainder of the message, with one pair of enclosing quotes removed.
    fn remainder(&mut self, name: &str, command: &str) -> Result<String> {
        let s = self.rest.trim();
        self.rest = "";
        let s = s
            .strip_prefix('"')
            .and_then(|t| t.strip_suffix('"'))
            .filter(|t| !t.contains('"'))
            .unwrap_or(s);
        if s.is_empty() {
            return Err(missing(name, command));
        }
        Ok(s.to_string())
    }

    fn finish(&mut self, command: &str) -> Result<()> {
        if self.rest.trim().is_empty() {
            Ok(())
        } else {
            Err(DeskError::Usage(format!(
                "too many arguments for {command}; quote multi-word values"
            )))
        }
    }
}

fn missing(name: &str, command: &str) -> DeskError {
    let usage = COMMANDS
        .iter()
        .find(|c| c.name == command)
        .map(|c| c.usage)
        .unwrap_or("");
    DeskError::Usage(format!("missing <{name}>; usage: {command} {usage}"))
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a chat message. Returns `None` when the message does not start with
/// `prefix` (ordinary chatter). A blank prefix matches nothing.
pub fn parse_message(prefix: &str, text: &str) -> Option<Result<Command>> {
    if prefix.trim().is_empty() {
        return None;
    }
    let body = text.trim_start().strip_prefix(prefix)?;
    if body.is_empty() || body.starts_with(char::is_whitespace) {
        return None;
    }
    Some(parse(body))
}

/// Parse a command line without prefix, e.g. `checkorder A1`.
pub fn parse(line: &str) -> Result<Command> {
    let mut args = Args::new(line);
    let name = args
        .word()?
        .ok_or_else(|| DeskError::Usage("empty command".to_string()))?
        .to_lowercase();
    let cmd = name.as_str();

    let command = match cmd {
        "register" => Command::Register {
            member: args.member(cmd)?,
            role: args.remainder("role", cmd)?,
        },
        "unregister" => Command::Unregister {
            member: args.member(cmd)?,
        },
        "team" => Command::Team,
        "addorder" => {
            let id = args.required("id", cmd)?;
            let kind = args.required("type", cmd)?;
            let description = args.required("description", cmd)?;
            let deadline = args.word()?.filter(|d| !d.is_empty());
            Command::AddOrder {
                id,
                kind,
                description,
                deadline,
            }
        }
        "orderstatus" => Command::OrderStatus {
            id: args.required("id", cmd)?,
            status: args.remainder("status", cmd)?,
        },
        "assignorder" => Command::AssignOrder {
            id: args.required("id", cmd)?,
            member: args.member(cmd)?,
        },
        "checkorder" => Command::CheckOrder {
            id: args.required("id", cmd)?,
        },
        "finishorder" => Command::FinishOrder {
            id: args.required("id", cmd)?,
        },
        "addnote" => Command::AddNote {
            id: args.required("id", cmd)?,
            note: args.remainder("note", cmd)?,
        },
        "whoisworking" => Command::WhoIsWorking,
        "mypage" => Command::MyPage,
        "commands" => Command::Commands,
        other if PLATFORM_COMMANDS.contains(&other) => {
            // Platform commands take free-form arguments.
            args.rest = "";
            Command::Platform {
                name: other.to_string(),
            }
        }
        other => {
            return Err(DeskError::Usage(format!(
                "unknown command '{other}'; try commands"
            )))
        }
    };
    args.finish(cmd)?;
    Ok(command)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(text: &str) -> Command {
        parse_message("!!", text)
            .expect("message should be a command")
            .unwrap_or_else(|e| panic!("{text}: {e}"))
    }

    #[test]
    fn ignores_chatter() {
        assert!(parse_message("!!", "hello team").is_none());
        assert!(parse_message("!!", "!!").is_none());
        assert!(parse_message("!!", "!! team").is_none());
    }

    #[test]
    fn blank_prefix_matches_nothing() {
        assert!(parse_message("", "team").is_none());
        assert!(parse_message(" ", "checkorder A1").is_none());
    }

    #[test]
    fn register_takes_rest_as_role() {
        assert_eq!(
            parse_ok("!!register <@!111> Senior Designer"),
            Command::Register {
                member: MemberId(111),
                role: "Senior Designer".into()
            }
        );
    }

    #[test]
    fn addorder_with_quotes_and_deadline() {
        assert_eq!(
            parse_ok(r#"!!addorder A1 Logo "Client X logo" 2026-11-01"#),
            Command::AddOrder {
                id: "A1".into(),
                kind: "Logo".into(),
                description: "Client X logo".into(),
                deadline: Some("2026-11-01".into()),
            }
        );
        assert_eq!(
            parse_ok("!!addorder A2 Banner Homepage"),
            Command::AddOrder {
                id: "A2".into(),
                kind: "Banner".into(),
                description: "Homepage".into(),
                deadline: None,
            }
        );
    }

    #[test]
    fn addorder_rejects_unquoted_extra_words() {
        let err = parse_message("!!", "!!addorder A1 Logo Client X logo")
            .unwrap()
            .unwrap_err();
        assert!(err.to_string().contains("too many arguments"));
    }

    #[test]
    fn orderstatus_and_addnote_keep_text_verbatim() {
        assert_eq!(
            parse_ok("!!orderstatus A1 In Progress"),
            Command::OrderStatus {
                id: "A1".into(),
                status: "In Progress".into()
            }
        );
        assert_eq!(
            parse_ok(r#"!!addnote A1 "client wants   more blue""#),
            Command::AddNote {
                id: "A1".into(),
                note: "client wants   more blue".into()
            }
        );
    }

    #[test]
    fn command_names_are_case_insensitive() {
        assert_eq!(parse_ok("!!WhoIsWorking"), Command::WhoIsWorking);
    }

    #[test]
    fn missing_arguments_report_usage() {
        let err = parse("assignorder A1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing <member>; usage: assignorder <id> <member>"
        );
        assert!(parse("register 111").is_err());
        assert!(parse("checkorder").is_err());
    }

    #[test]
    fn bad_member_reference() {
        assert!(matches!(
            parse("unregister alice"),
            Err(DeskError::Usage(_))
        ));
    }

    #[test]
    fn unterminated_quote() {
        assert!(parse(r#"addorder A1 Logo "Client X"#).is_err());
    }

    #[test]
    fn platform_commands_are_recognised() {
        assert_eq!(
            parse_ok("!!poll \"Lunch?\" pizza tacos"),
            Command::Platform {
                name: "poll".into()
            }
        );
        assert!(parse("dance").is_err());
    }

    #[test]
    fn help_lists_every_command() {
        let help = help_text("!!");
        for c in COMMANDS {
            assert!(help.contains(&format!("!!{}", c.name)), "{}", c.name);
        }
    }
}
