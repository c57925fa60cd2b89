//! JSON file helpers
//!
//! Writes go to a sibling temp file which is synced and renamed over the
//! target, so a crash leaves either the old or the new contents.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::PlannerError;

/// Read JSON from a file, falling back to `T::default()` when it is missing
pub fn read_json<T, P>(path: P) -> Result<T, PlannerError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path).map_err(|e| {
        PlannerError::Storage(format!("Failed to open {}: {}", path.display(), e))
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        PlannerError::Storage(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Write JSON to a file atomically (temp file, sync, rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), PlannerError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            PlannerError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("json.tmp");
    let file = File::create(&temp_path)
        .map_err(|e| PlannerError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| PlannerError::Storage(format!("Failed to serialize data: {}", e)))?;
    writer
        .flush()
        .map_err(|e| PlannerError::Storage(format!("Failed to flush data: {}", e)))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| PlannerError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        PlannerError::Storage(format!("Failed to rename temp file: {}", e))
    })
}

pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, PlannerError> {
    lock.read()
        .map_err(|e| PlannerError::Storage(format!("Failed to acquire read lock: {}", e)))
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, PlannerError> {
    lock.write()
        .map_err(|e| PlannerError::Storage(format!("Failed to acquire write lock: {}", e)))
}
