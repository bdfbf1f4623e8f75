use crate::error::Result;
use crate::notify::{FileNotifier, Notifier, NullNotifier, WebhookNotifier};
use crate::paths;
use crate::types::MemberId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// LogChannel
// ---------------------------------------------------------------------------

/// Where administrative log records go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogChannel {
    None,
    File {
        #[serde(default = "default_audit_path")]
        path: PathBuf,
    },
    Webhook {
        url: String,
    },
}

fn default_audit_path() -> PathBuf {
    PathBuf::from(paths::AUDIT_FILE)
}

impl Default for LogChannel {
    fn default() -> Self {
        LogChannel::File {
            path: default_audit_path(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Leading characters that mark a chat message as a command.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// When false, orders live only as long as the process.
    #[serde(default = "default_persist_orders")]
    pub persist_orders: bool,
    #[serde(default)]
    pub log_channel: LogChannel,
    /// Platform directory: member id → display name.
    #[serde(default)]
    pub members: BTreeMap<MemberId, String>,
}

fn default_prefix() -> String {
    "!!".to_string()
}

fn default_persist_orders() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            persist_orders: default_persist_orders(),
            log_channel: LogChannel::default(),
            members: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load `.orderdesk/config.yaml`, falling back to defaults when it is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut config: Self = serde_yaml::from_str(&content)?;
        if config.prefix.trim().is_empty() {
            tracing::warn!(path = %path.display(), "blank command prefix, using {}", default_prefix());
            config.prefix = default_prefix();
        }
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Build the configured notifier. An unusable destination degrades to
    /// [`NullNotifier`] with a diagnostic.
    pub fn notifier(&self, root: &Path) -> Box<dyn Notifier> {
        match &self.log_channel {
            LogChannel::None => Box::new(NullNotifier),
            LogChannel::File { path } => Box::new(FileNotifier::new(paths::resolve(root, path))),
            LogChannel::Webhook { url } => match WebhookNotifier::new(url.as_str()) {
                Ok(n) => Box::new(n),
                Err(e) => {
                    tracing::warn!(error = %e, "webhook log channel unusable");
                    Box::new(NullNotifier)
                }
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
