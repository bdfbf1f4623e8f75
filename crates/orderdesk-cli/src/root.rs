use std::path::{Path, PathBuf};

/// Resolve the desk root directory.
///
/// Priority:
/// 1. `--root` flag / `ORDERDESK_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.orderdesk/`
/// 3. Walk upward from `cwd` looking for `.git/`
/// 4. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_upward(&cwd, ".orderdesk")
        .or_else(|| find_upward(&cwd, ".git"))
        .unwrap_or(cwd)
}

fn find_upward(start: &Path, marker: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(marker).is_dir())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        assert_eq!(resolve_root(Some(dir.path())), dir.path());
    }

    #[test]
    fn finds_desk_dir_from_subdirectory() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".orderdesk")).unwrap();
        let subdir = dir.path().join("clients/x");
        std::fs::create_dir_all(&subdir).unwrap();
        assert_eq!(find_upward(&subdir, ".orderdesk").as_deref(), Some(dir.path()));
    }

    #[test]
    fn missing_marker_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(find_upward(dir.path(), ".orderdesk-nowhere").is_none());
    }
}
