use crate::output::print_json;
use anyhow::Context;
use orderdesk_core::{config::Config, io, paths};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let desk_dir = paths::desk_dir(root);
    std::fs::create_dir_all(&desk_dir).context("failed to create .orderdesk/")?;
    let yaml = Config::default().to_yaml()?;
    let created = io::create_new(&paths::config_path(root), yaml.as_bytes())
        .context("failed to write config")?;
    let ignored = io::gitignore(root, &[paths::AUDIT_FILE]).context("failed to update .gitignore")?;

    if json {
        print_json(&serde_json::json!({
            "root": root.display().to_string(),
            "config_created": created,
            "gitignore_added": ignored,
        }))?;
    } else if created {
        println!("Initialized order desk in {}", desk_dir.display());
    } else {
        println!("Order desk already initialized in {}", desk_dir.display());
    }
    Ok(())
}
