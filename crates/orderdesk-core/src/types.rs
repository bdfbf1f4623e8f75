use crate::error::DeskError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

pub const STATUS_NEW: &str = "New";
pub const STATUS_COMPLETED: &str = "Completed";

// ---------------------------------------------------------------------------
// MemberId
// ---------------------------------------------------------------------------

/// Platform-assigned numeric user id. Opaque and externally owned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub u64);

impl MemberId {
    /// The platform mention form, e.g. `<@111>`.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.0)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static MENTION_RE: OnceLock<Regex> = OnceLock::new();

fn mention_re() -> &'static Regex {
    MENTION_RE.get_or_init(|| Regex::new(r"^<@!?(\d+)>$").unwrap())
}

impl FromStr for MemberId {
    type Err = DeskError;

    /// Accepts a raw id (`111`) or a platform mention (`<@111>`, `<@!111>`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = match mention_re().captures(s) {
            Some(caps) => caps.get(1).map_or("", |m| m.as_str()),
            None => s,
        };
        digits
            .parse::<u64>()
            .map(MemberId)
            .map_err(|_| DeskError::Usage(format!("'{s}' is not a member id or mention")))
    }
}

/// Member id → role label.
pub type Roster = BTreeMap<MemberId, String>;

// ---------------------------------------------------------------------------
// Order
// ---------------------------------------------------------------------------

fn default_status() -> String {
    STATUS_NEW.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    /// Weak reference: never checked against the roster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<MemberId>,
    #[serde(default)]
    pub notes: Vec<String>,
}

impl Order {
    pub fn new(
        id: impl Into<String>,
        kind: Option<String>,
        description: Option<String>,
        deadline: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            status: default_status(),
            kind,
            description,
            deadline,
            assigned_to: None,
            notes: Vec::new(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_id_parses_raw_and_mentions() {
        for input in ["111", "<@111>", "<@!111>", " 111 "] {
            assert_eq!(input.parse::<MemberId>().unwrap(), MemberId(111), "{input}");
        }
    }

    #[test]
    fn member_id_rejects_names() {
        for input in ["", "alice", "<@alice>", "<#111>", "-5"] {
            assert!(input.parse::<MemberId>().is_err(), "expected invalid: {input}");
        }
    }

    #[test]
    fn order_defaults_missing_fields() {
        let order: Order = serde_json::from_str(r#"{"id": "A1"}"#).unwrap();
        assert_eq!(order.status, STATUS_NEW);
        assert!(order.notes.is_empty());
        assert!(order.assigned_to.is_none());
    }

    #[test]
    fn order_serializes_type_field() {
        let order = Order::new("A1", Some("Logo".into()), None, None);
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["type"], "Logo");
        assert!(json.get("description").is_none());
    }
}
