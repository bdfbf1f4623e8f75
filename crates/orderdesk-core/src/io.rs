//! File primitives for the `.orderdesk/` state directory.
//!
//! State files (roster, orders) are replaced whole through a sibling temp
//! file, so a reader sees either the previous or the new document. The audit
//! log only grows, one JSON record per line.

use crate::error::{DeskError, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

fn write_failed(path: &Path, source: std::io::Error) -> DeskError {
    DeskError::Write {
        path: path.to_path_buf(),
        source,
    }
}

/// Replace `path` with `data`, creating the parent directory when needed.
/// Errors name the target file.
pub fn replace_file(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| write_failed(path, e))?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| write_failed(path, e))?;
    tmp.write_all(data).map_err(|e| write_failed(path, e))?;
    tmp.as_file().sync_all().map_err(|e| write_failed(path, e))?;
    // On failure the temp file is dropped and removed.
    tmp.persist(path).map_err(|e| write_failed(path, e.error))?;
    Ok(())
}

/// Serialize `value` as pretty JSON with a trailing newline and replace `path`.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut content = serde_json::to_vec_pretty(value)?;
    content.push(b'\n');
    replace_file(path, &content)
}

/// Append `record` as one JSON line, written with a single `write_all`.
pub fn append_json_line<T: Serialize + ?Sized>(path: &Path, record: &T) -> Result<()> {
    let mut line = serde_json::to_vec(record)?;
    line.push(b'\n');
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut f = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    f.write_all(&line)?;
    Ok(())
}

/// Create `path` holding `data` unless something already exists there.
/// Returns true when the file was created.
pub fn create_new(path: &Path, data: &[u8]) -> Result<bool> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut f = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
    {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(e.into()),
    };
    f.write_all(data)?;
    Ok(true)
}

/// Make sure every entry is listed in `root/.gitignore`. Returns the entries
/// that had to be added.
pub fn gitignore(root: &Path, entries: &[&str]) -> Result<Vec<String>> {
    let path = root.join(".gitignore");
    let mut content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };
    let added: Vec<String> = entries
        .iter()
        .filter(|entry| !content.lines().any(|l| l.trim() == **entry))
        .map(|entry| entry.to_string())
        .collect();
    if added.is_empty() {
        return Ok(added);
    }
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    for entry in &added {
        content.push_str(entry);
        content.push('\n');
    }
    replace_file(&path, content.as_bytes())?;
    Ok(added)
}
