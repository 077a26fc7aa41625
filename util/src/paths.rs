use crate::config;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Create a directory (and all parents) if it doesn't exist, and return the path.
pub fn ensure_dir<P: AsRef<Path>>(path: P) -> io::Result<PathBuf> {
    let p = path.as_ref();
    fs::create_dir_all(p)?;
    Ok(p.to_path_buf())
}

/// Ensure the parent directory of a *file path* exists (no-op if none).
pub fn ensure_parent_dir<P: AsRef<Path>>(file_path: P) -> io::Result<()> {
    if let Some(parent) = file_path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Global storage root (absolute), from `config::storage_root()`.
/// If relative in env, resolve against current_dir().
pub fn storage_root() -> PathBuf {
    let root = config::storage_root();
    let p = PathBuf::from(root);
    if p.is_absolute() {
        p
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(p)
    }
}

/// A single event folder: {STORAGE_ROOT}/event_{event_id}
pub fn event_dir(event_id: i64) -> PathBuf {
    storage_root().join(format!("event_{event_id}"))
}

/// Uploaded attachments for an event: {STORAGE_ROOT}/event_{event_id}/files
pub fn event_files_dir(event_id: i64) -> PathBuf {
    event_dir(event_id).join("files")
}

/// Generated report exports: {STORAGE_ROOT}/reports/{year}/{run_id}
pub fn report_dir(year: i32, run_id: i64) -> PathBuf {
    storage_root()
        .join("reports")
        .join(year.to_string())
        .join(run_id.to_string())
}

/// Full path to a stored report CSV (does not create).
pub fn report_path(year: i32, run_id: i64, filename: &str) -> PathBuf {
    report_dir(year, run_id).join(filename)
}
