use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const DESK_DIR: &str = ".orderdesk";

pub const CONFIG_FILE: &str = ".orderdesk/config.yaml";
pub const TEAM_FILE: &str = ".orderdesk/team.json";
pub const ORDERS_FILE: &str = ".orderdesk/orders.json";
pub const AUDIT_FILE: &str = ".orderdesk/audit.jsonl";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn desk_dir(root: &Path) -> PathBuf {
    root.join(DESK_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn team_path(root: &Path) -> PathBuf {
    root.join(TEAM_FILE)
}

pub fn orders_path(root: &Path) -> PathBuf {
    root.join(ORDERS_FILE)
}

pub fn audit_path(root: &Path) -> PathBuf {
    root.join(AUDIT_FILE)
}

/// Resolve a configured path: absolute paths are kept, relative ones hang off `root`.
pub fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/desk");
        assert_eq!(
            config_path(root),
            PathBuf::from("/tmp/desk/.orderdesk/config.yaml")
        );
        assert_eq!(team_path(root), PathBuf::from("/tmp/desk/.orderdesk/team.json"));
        assert_eq!(
            orders_path(root),
            PathBuf::from("/tmp/desk/.orderdesk/orders.json")
        );
    }

    #[test]
    fn resolve_keeps_absolute_paths() {
        let root = Path::new("/tmp/desk");
        assert_eq!(
            resolve(root, Path::new("/var/log/audit.jsonl")),
            PathBuf::from("/var/log/audit.jsonl")
        );
        assert_eq!(
            resolve(root, Path::new("logs/audit.jsonl")),
            PathBuf::from("/tmp/desk/logs/audit.jsonl")
        );
    }
}
