//! Error taxonomy for the resume engine.
//!
//! Only stage-body failures, identity resolution, script read, and rewrite
//! failures terminate a launch. Checkpoint load/write failures are recovered
//! locally with a warning and a safe fallback, and a fingerprint mismatch is
//! not an error at all (it drives the resume decision flow).

use thiserror::Error;

use crate::types::StageIdentity;

/// Opaque error raised by a stage body.
pub type StageError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that terminate a launch or a rewrite operation.
#[derive(Debug, Error)]
pub enum EngineError {
  /// A runtime stage call has no matching stage construct in the source.
  /// Fatal: the engine cannot name the caller.
  #[error("cannot resolve stage identity: {0}")]
  IdentityResolution(String),

  /// A stage body failed. The checkpoint is left at its pre-stage value, so
  /// the run is resumable from this same stage on relaunch.
  #[error("stage {identity} failed: {source}")]
  StageExecution {
    identity: StageIdentity,
    #[source]
    source: StageError,
  },

  /// A remediation could not be applied. The original file is left
  /// byte-for-byte unmodified.
  #[error("script rewrite failed: {0}")]
  ScriptRewrite(String),

  /// The script itself could not be read.
  #[error("cannot read script: {0}")]
  Io(#[from] std::io::Error),
}

impl EngineError {
  /// Identity of the failed stage, when this error originated in a stage body.
  pub fn failed_stage(&self) -> Option<&StageIdentity> {
    match self {
      EngineError::StageExecution { identity, .. } => Some(identity),
      _ => None,
    }
  }
}
