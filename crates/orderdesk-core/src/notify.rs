//! Side-channel log records for administrative commands.
//!
//! Delivery is best effort. [`notify_best_effort`] is the only entry point the
//! desk uses, and it never lets a delivery failure reach the command that
//! produced the record.

use crate::error::{DeskError, Result};
use crate::io;
use crate::types::MemberId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

// ---------------------------------------------------------------------------
// LogRecord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub at: DateTime<Utc>,
    pub actor: Option<MemberId>,
    /// Command name, e.g. `register`.
    pub action: String,
    /// The order id or member id the command touched.
    pub entity: String,
    pub details: Vec<String>,
}

impl LogRecord {
    pub fn new(actor: Option<MemberId>, action: &str, entity: impl Into<String>) -> Self {
        Self {
            at: Utc::now(),
            actor,
            action: action.to_string(),
            entity: entity.into(),
            details: Vec::new(),
        }
    }

    pub fn detail(mut self, label: &str, value: impl std::fmt::Display) -> Self {
        self.details.push(format!("{label}: {value}"));
        self
    }

    /// Plain-text rendering for chat destinations.
    pub fn summary(&self) -> String {
        let actor = self
            .actor
            .map(|a| a.mention())
            .unwrap_or_else(|| "an unknown actor".to_string());
        let mut out = format!("[ !{} used by {} ] {}", self.action, actor, self.entity);
        for d in &self.details {
            out.push_str("\n- ");
            out.push_str(d);
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

pub trait Notifier: Send + Sync {
    fn notify(&self, record: &LogRecord) -> Result<()>;
}

/// Deliver `record`, downgrading any failure to a diagnostic.
/// Returns whether delivery succeeded.
pub fn notify_best_effort(notifier: &dyn Notifier, record: &LogRecord) -> bool {
    match notifier.notify(record) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(action = %record.action, entity = %record.entity, error = %e, "log record not delivered");
            false
        }
    }
}

/// No destination configured. Every record is reported as undeliverable.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _record: &LogRecord) -> Result<()> {
        Err(DeskError::Notify("log channel not configured".to_string()))
    }
}

/// Appends one JSON object per line.
#[derive(Debug, Clone)]
pub struct FileNotifier {
    path: PathBuf,
}

impl FileNotifier {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Notifier for FileNotifier {
    fn notify(&self, record: &LogRecord) -> Result<()> {
        io::append_json_line(&self.path, record)
    }
}

/// POSTs each record to a chat webhook as `{"content": <summary>, "record": {...}}`.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    url: String,
    client: reqwest::blocking::Client,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| DeskError::Notify(e.to_string()))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&self, record: &LogRecord) -> Result<()> {
        let body = serde_json::json!({
            "content": record.summary(),
            "record": record,
        });
        self.client
            .post(&self.url)
            .json(&body)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| DeskError::Notify(e.to_string()))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
