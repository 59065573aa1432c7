//! Persisted checkpoint record: the last completed stage plus shared data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{SharedData, StageIdentity};

/// On-disk record of a run in progress, one per script path.
///
/// Fully replaced (never merged) after each successful stage; deleted when the
/// finalization call runs. `last_completed` always names a stage whose body
/// ran to completion without erroring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointRecord {
  /// SHA-256 hex of the script source at checkpoint time.
  pub script_hash: String,
  /// Optional full copy of the source, kept solely for human inspection
  /// when the live script later diverges.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source_snapshot: Option<String>,
  /// The stage that most recently executed its body to completion.
  pub last_completed: StageIdentity,
  pub timestamp: DateTime<Utc>,
  /// Snapshot of the shared key→value store after `last_completed`.
  pub shared_data: SharedData,
}

impl CheckpointRecord {
  /// True when `fingerprint` equals the hash recorded at checkpoint time.
  pub fn matches_fingerprint(&self, fingerprint: &str) -> bool {
    self.script_hash == fingerprint
  }
}
