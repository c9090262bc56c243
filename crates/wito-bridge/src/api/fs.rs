//! Filesystem operations.
//!
//! I/O failures come back as `{"error": ...}` values so the page receives a
//! resolved call it can inspect.

use std::io;
use std::path::Path;

use serde_json::{json, Value};
use tracing::debug;

fn io_error(op: &str, path: &Path, e: io::Error) -> Value {
    debug!(op, path = %path.display(), error = %e, "filesystem operation failed");
    json!({ "error": e.to_string() })
}

/// Entry names of a directory, sorted.
pub fn list_dir(path: &Path) -> Value {
    let entries = match std::fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => return io_error("list_dir", path, e),
    };
    let mut names = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => names.push(entry.file_name().to_string_lossy().into_owned()),
            Err(e) => return io_error("list_dir", path, e),
        }
    }
    names.sort();
    json!({ "contents": names })
}

/// Create a directory and its parents. Existing directories are fine.
pub fn create_dir(path: &Path) -> Value {
    let created = std::fs::create_dir_all(path).and_then(|()| std::fs::canonicalize(path));
    match created {
        Ok(abs) => json!({ "success": true, "path": abs.to_string_lossy() }),
        Err(e) => io_error("create_dir", path, e),
    }
}

pub fn delete_file(path: &Path) -> Value {
    match std::fs::remove_file(path) {
        Ok(()) => json!({ "success": true }),
        Err(e) => io_error("delete_file", path, e),
    }
}

pub fn read_file(path: &Path) -> Value {
    match std::fs::read_to_string(path) {
        Ok(content) => json!({ "content": content }),
        Err(e) => io_error("read_file", path, e),
    }
}

/// Write `content`, replacing the file.
pub fn save_file(path: &Path, content: &str) -> Value {
    match std::fs::write(path, content) {
        Ok(()) => json!({ "success": true }),
        Err(e) => io_error("save_file", path, e),
    }
}

pub fn file_exists(path: &Path) -> Value {
    let exists = path.exists();
    json!({
        "exists": exists,
        "is_file": exists && path.is_file(),
        "is_dir": exists && path.is_dir(),
    })
}
