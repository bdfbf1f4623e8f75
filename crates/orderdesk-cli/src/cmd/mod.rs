pub mod desk;
pub mod init;
pub mod listen;

use anyhow::Context;
use orderdesk_core::config::{Config, LogChannel};
use orderdesk_core::desk::Desk;
use orderdesk_core::types::MemberId;
use std::path::Path;

/// Global flags shared by every subcommand.
pub struct Options {
    pub actor: Option<MemberId>,
    pub log_webhook: Option<String>,
    pub json: bool,
}

/// Load config, apply flag overrides, and open the desk.
pub fn open_desk(root: &Path, opts: &Options) -> anyhow::Result<Desk> {
    let mut config = Config::load(root).context("failed to load .orderdesk/config.yaml")?;
    if let Some(url) = &opts.log_webhook {
        config.log_channel = LogChannel::Webhook { url: url.clone() };
    }
    Ok(Desk::open(root, &config))
}
