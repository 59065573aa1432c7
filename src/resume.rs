//! Resume decision flow: compare the stored checkpoint to the live script and
//! let the operator choose how to proceed.
//!
//! The core performs no console I/O. A [ResumeDecider] sits at the
//! presentation boundary: it receives the checkpoint and whether the live
//! fingerprint still matches, and answers with one choice. Defaults (resume on
//! match, fresh on mismatch) and warning text belong to the decider.

use crate::checkpoint_io::{delete_checkpoint, load_checkpoint};
use crate::types::{CheckpointRecord, SharedData, StageIdentity};
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{info, instrument, warn};

/// What the resume flow asks the operator.
#[derive(Debug)]
pub struct ResumePrompt<'a> {
  pub record: &'a CheckpointRecord,
  /// False when the script was modified since the checkpoint was written, in
  /// which case stage count and line mapping may no longer align and resuming
  /// may produce inconsistent results.
  pub fingerprint_matches: bool,
}

/// One operator choice at the resume prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeChoice {
  /// Skip stages up to and including the last completed one.
  Resume,
  /// Discard the checkpoint and run every stage.
  Fresh,
  /// Show the read-only checkpoint details, then ask again.
  Details,
  /// Terminate without changing anything.
  Quit,
}

/// Read-only view of a checkpoint for the More-Details choice. Non-mutating.
#[derive(Debug)]
pub struct CheckpointDetails<'a> {
  pub last_completed: &'a StageIdentity,
  pub timestamp: DateTime<Utc>,
  pub shared_data: &'a SharedData,
  /// Source as it was at checkpoint time, when the record kept a snapshot.
  pub source_snapshot: Option<&'a str>,
}

/// Presentation boundary for the resume flow.
pub trait ResumeDecider {
  fn choose(&mut self, prompt: &ResumePrompt<'_>) -> ResumeChoice;
  fn show_details(&mut self, details: &CheckpointDetails<'_>);
}

/// Outcome of the resume decision flow.
#[derive(Debug)]
pub enum ResumePlan {
  /// No usable checkpoint, or the operator chose to start over (in which case
  /// the checkpoint has been deleted).
  Fresh,
  /// Skip stages up to `target`, with shared data re-hydrated from the
  /// checkpoint.
  Resume {
    target: StageIdentity,
    shared_data: SharedData,
  },
  /// Terminate without changing anything.
  Quit,
}

/// Loads the checkpoint for `checkpoint_path` and drives the operator's
/// resume/fresh/details/quit choice against `current_fingerprint`.
#[instrument(level = "debug", skip(checkpoint_path, current_fingerprint, decider))]
pub fn decide_resume(
  checkpoint_path: &Path,
  current_fingerprint: &str,
  decider: &mut dyn ResumeDecider,
) -> ResumePlan {
  let Some(record) = load_checkpoint(checkpoint_path) else {
    info!("no prior checkpoint; proceeding fresh");
    return ResumePlan::Fresh;
  };

  let fingerprint_matches = record.matches_fingerprint(current_fingerprint);
  if !fingerprint_matches {
    info!(
      last_completed = %record.last_completed,
      "script modified since checkpoint; stage count and line mapping may no longer align"
    );
  }

  let prompt = ResumePrompt {
    record: &record,
    fingerprint_matches,
  };
  loop {
    match decider.choose(&prompt) {
      ResumeChoice::Details => {
        decider.show_details(&CheckpointDetails {
          last_completed: &record.last_completed,
          timestamp: record.timestamp,
          shared_data: &record.shared_data,
          source_snapshot: record.source_snapshot.as_deref(),
        });
      }
      ResumeChoice::Resume => {
        info!(target = %record.last_completed, "resuming from checkpoint");
        return ResumePlan::Resume {
          target: record.last_completed.clone(),
          shared_data: record.shared_data.clone(),
        };
      }
      ResumeChoice::Fresh => {
        if let Err(e) = delete_checkpoint(checkpoint_path) {
          warn!(path = %checkpoint_path.display(), error = %e, "could not delete checkpoint");
        }
        info!("checkpoint discarded; proceeding fresh");
        return ResumePlan::Fresh;
      }
      ResumeChoice::Quit => return ResumePlan::Quit,
    }
  }
}
