//! Checkpoint persistence: one JSON state file per script path.

use crate::types::CheckpointRecord;
use std::path::{Path, PathBuf};
use tracing::{instrument, warn};

/// Fixed suffix appended to a script path to derive its checkpoint path.
pub const CHECKPOINT_SUFFIX: &str = ".checkpoint.json";

/// Derives the checkpoint path deterministically from the script's own path,
/// so checkpoint identity is per-script, not per-invocation.
pub fn checkpoint_path_for(script: &Path) -> PathBuf {
  let mut name = script
    .file_name()
    .map(|n| n.to_os_string())
    .unwrap_or_default();
  name.push(CHECKPOINT_SUFFIX);
  script.with_file_name(name)
}

/// Loads the checkpoint at `path`, or `None` when there is no usable record.
///
/// A missing file means no prior run. An unreadable or undeserializable file
/// is logged as a warning and likewise treated as no prior run.
#[instrument(level = "trace", skip(path))]
pub fn load_checkpoint(path: &Path) -> Option<CheckpointRecord> {
  let bytes = match std::fs::read(path) {
    Ok(b) => b,
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
    Err(e) => {
      warn!(path = %path.display(), error = %e, "checkpoint unreadable; treating as no prior run");
      return None;
    }
  };
  match serde_json::from_slice(&bytes) {
    Ok(record) => Some(record),
    Err(e) => {
      warn!(path = %path.display(), error = %e, "checkpoint corrupt; treating as no prior run");
      None
    }
  }
}

/// Saves `record` to `path`, fully replacing any previous record.
///
/// Writes to a temp file and renames, so a crash mid-write never leaves a
/// truncated record behind.
#[instrument(level = "trace", skip(path, record))]
pub fn save_checkpoint(path: &Path, record: &CheckpointRecord) -> Result<(), std::io::Error> {
  let json = serde_json::to_string_pretty(record)
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
  let tmp = path.with_extension("json.tmp");
  std::fs::write(&tmp, json)?;
  std::fs::rename(&tmp, path)
}

/// Removes the checkpoint at `path` if present. Idempotent: a missing file is
/// not an error.
#[instrument(level = "trace", skip(path))]
pub fn delete_checkpoint(path: &Path) -> Result<(), std::io::Error> {
  match std::fs::remove_file(path) {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
    Err(e) => Err(e),
  }
}
