//! # restage
//!
//! Checkpoint/resume execution engine for long-running multi-stage scripts.
//!
//! A script is a sequence of stage constructs. After every successful stage
//! the engine persists a checkpoint (script fingerprint, last completed stage,
//! shared data) next to the script; when an interrupted script is relaunched,
//! only the stages not yet completed run again.
//!
//! ## Architecture
//!
//! One launch flows one way: the scanner runs first (before any checkpoint is
//! trusted) and flags live code outside stage spans → if a remediation
//! rewrites the script the launch stops for a relaunch → otherwise the
//! checkpoint store is read and the resume decision flow configures an
//! [ExecutionSession] → the session decides skip-vs-execute for every stage
//! call and advances the checkpoint.
//!
//! Interactive choices cross trait boundaries ([RemediationDecider],
//! [resume::ResumeDecider]); the engine itself performs no console I/O.

pub mod checkpoint_io;
pub mod error;
pub mod fingerprint;
#[cfg(test)]
mod fingerprint_test;
pub mod grammar;
pub mod resume;
pub mod rewriter;
#[cfg(test)]
mod rewriter_test;
pub mod scanner;
pub mod session;
pub mod types;

pub use error::{EngineError, StageError};
pub use grammar::ScriptGrammar;
pub use resume::{ResumeChoice, ResumeDecider, ResumePlan};
pub use rewriter::RewriteOutcome;
pub use scanner::{ScanReport, StageSpan, scan_script};
pub use session::{
  ExecutionSession, Launch, LaunchOptions, RemediationDecider, StageOutcome, launch,
};
pub use types::{
  CheckpointRecord, NonResumableBlock, RemediationAction, SharedData, StageIdentity,
};
