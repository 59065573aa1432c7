//! Per-launch execution session: skip or execute each stage, advance the
//! checkpoint, finalize.
//!
//! A session is an explicit value created once per launch by [launch] and
//! threaded through the host's stage calls, so several independent sessions
//! can coexist in one process. Launch order: scan → remediation (stop on
//! rewrite) → fingerprint → resume decision → session.

use crate::checkpoint_io::{
  checkpoint_path_for, delete_checkpoint, load_checkpoint, save_checkpoint,
};
use crate::error::{EngineError, StageError};
use crate::fingerprint::hash_bytes;
use crate::grammar::ScriptGrammar;
use crate::resume::{ResumeDecider, ResumePlan, decide_resume};
use crate::rewriter::{RewriteOutcome, apply_remediations};
use crate::scanner::scan_script;
use crate::types::{
  CheckpointRecord, NonResumableBlock, RemediationAction, SharedData, StageIdentity,
};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Presentation boundary for the pre-launch remediation pass: one action per
/// flagged block. The core performs no console I/O.
pub trait RemediationDecider {
  fn choose(&mut self, block: &NonResumableBlock, lines: &[String]) -> RemediationAction;
}

/// Options for [launch].
#[derive(Debug, Clone)]
pub struct LaunchOptions {
  /// Embed the full source in each checkpoint, for inspection when the live
  /// script later diverges.
  pub keep_source_snapshot: bool,
}

impl Default for LaunchOptions {
  fn default() -> Self {
    Self {
      keep_source_snapshot: true,
    }
  }
}

/// Result of preparing one launch.
#[derive(Debug)]
pub enum Launch {
  /// Ready to run stages.
  Ready(ExecutionSession),
  /// The script was rewritten; line numbers are stale, relaunch against the
  /// updated source.
  RewriteApplied,
  /// The operator quit at a prompt; nothing was changed.
  Aborted,
}

/// What [ExecutionSession::stage] did with one stage call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
  /// The body ran to completion and the checkpoint advanced.
  Executed,
  /// The body was not invoked: a prior run already completed this stage.
  Skipped,
}

/// Prepares one launch of `script_path`.
///
/// Scans the source first — before any checkpoint is trusted — and routes
/// flagged non-resumable blocks through `remediation`. If that rewrites the
/// file the launch stops ([Launch::RewriteApplied]). Otherwise the checkpoint
/// is read and `resume` drives the resume/fresh/details/quit choice.
#[instrument(level = "debug", skip_all, fields(script = %script_path.display()))]
pub fn launch(
  script_path: &Path,
  grammar: &ScriptGrammar,
  options: LaunchOptions,
  remediation: &mut dyn RemediationDecider,
  resume: &mut dyn ResumeDecider,
) -> Result<Launch, EngineError> {
  let script_path = std::fs::canonicalize(script_path)?;
  let bytes = std::fs::read(&script_path)?;
  let text = String::from_utf8_lossy(&bytes).into_owned();
  let lines: Vec<String> = text.lines().map(str::to_string).collect();

  let report = scan_script(&lines, grammar);
  if !report.blocks.is_empty() {
    info!(
      blocks = report.blocks.len(),
      "live code outside stages; it would re-execute on every launch"
    );
    let decisions: Vec<RemediationAction> = report
      .blocks
      .iter()
      .map(|b| remediation.choose(b, &lines))
      .collect();
    match apply_remediations(&script_path, &lines, &report, &decisions, grammar)? {
      RewriteOutcome::Rewritten => return Ok(Launch::RewriteApplied),
      RewriteOutcome::Aborted => return Ok(Launch::Aborted),
      RewriteOutcome::Unchanged => {}
    }
  }

  let fingerprint = hash_bytes(&bytes);
  let checkpoint_path = checkpoint_path_for(&script_path);
  let stage_index: Vec<StageIdentity> = report
    .stage_spans
    .iter()
    .map(|span| StageIdentity::new(&script_path, span.display_line()))
    .collect();

  let (restore_mode, target_stage, data) =
    match decide_resume(&checkpoint_path, &fingerprint, resume) {
      ResumePlan::Quit => return Ok(Launch::Aborted),
      ResumePlan::Fresh => (false, None, SharedData::new()),
      ResumePlan::Resume {
        target,
        shared_data,
      } => (true, Some(target), shared_data),
    };

  Ok(Launch::Ready(ExecutionSession {
    script_path,
    fingerprint,
    checkpoint_path,
    source_snapshot: options.keep_source_snapshot.then_some(text),
    stage_index,
    next_ordinal: 0,
    restore_mode,
    target_stage,
    data,
  }))
}

/// In-memory state of one launch.
#[derive(Debug)]
pub struct ExecutionSession {
  script_path: PathBuf,
  fingerprint: String,
  checkpoint_path: PathBuf,
  source_snapshot: Option<String>,
  /// Identities of the script's stage constructs, in source order.
  stage_index: Vec<StageIdentity>,
  /// Ordinal the next stage call will claim.
  next_ordinal: usize,
  /// True while skipping stages up to the checkpoint.
  restore_mode: bool,
  target_stage: Option<StageIdentity>,
  data: SharedData,
}

impl ExecutionSession {
  pub fn script_path(&self) -> &Path {
    &self.script_path
  }

  pub fn fingerprint(&self) -> &str {
    &self.fingerprint
  }

  pub fn checkpoint_path(&self) -> &Path {
    &self.checkpoint_path
  }

  /// True while stages are still being skipped up to the checkpoint.
  pub fn is_restoring(&self) -> bool {
    self.restore_mode
  }

  pub fn data(&self) -> &SharedData {
    &self.data
  }

  pub fn data_mut(&mut self) -> &mut SharedData {
    &mut self.data
  }

  /// Runs one stage invocation: claims the next identity, then skips it (if a
  /// prior run already completed it) or executes `body` and advances the
  /// checkpoint.
  ///
  /// A body failure propagates as [EngineError::StageExecution] with no
  /// checkpoint update, so the failed stage re-runs from scratch on the next
  /// launch. A checkpoint write failure is non-fatal: the run continues, but
  /// resumability for this stage is not guaranteed.
  pub fn stage<F>(&mut self, body: F) -> Result<StageOutcome, EngineError>
  where
    F: FnOnce(&mut SharedData) -> Result<(), StageError>,
  {
    let identity = self.claim_identity()?;

    if self.restore_mode {
      if Some(&identity) == self.target_stage.as_ref() {
        // Caught up: this is the stage the checkpoint recorded as done.
        self.restore_mode = false;
      }
      info!(stage = %identity, "skipping stage completed in a prior run");
      return Ok(StageOutcome::Skipped);
    }

    info!(stage = %identity, "executing stage");
    body(&mut self.data).map_err(|source| EngineError::StageExecution {
      identity: identity.clone(),
      source,
    })?;

    let record = CheckpointRecord {
      script_hash: self.fingerprint.clone(),
      source_snapshot: self.source_snapshot.clone(),
      last_completed: identity.clone(),
      timestamp: Utc::now(),
      shared_data: self.data.clone(),
    };
    if let Err(e) = save_checkpoint(&self.checkpoint_path, &record) {
      warn!(
        stage = %identity,
        error = %e,
        "checkpoint write failed; this stage may re-run if the launch is interrupted"
      );
    }
    Ok(StageOutcome::Executed)
  }

  /// Finalization call: deletes the checkpoint unconditionally. Idempotent.
  ///
  /// This is the only transition that clears the persisted record; a script
  /// that never finalizes leaves its checkpoint behind after the last stage.
  #[instrument(level = "debug", skip(self))]
  pub fn finalize(&mut self) {
    if let Err(e) = delete_checkpoint(&self.checkpoint_path) {
      warn!(path = %self.checkpoint_path.display(), error = %e, "could not delete checkpoint");
    } else {
      info!("run finalized; checkpoint cleared");
    }
  }

  /// Whether a checkpoint record currently exists for this script.
  pub fn has_checkpoint(&self) -> bool {
    load_checkpoint(&self.checkpoint_path).is_some()
  }

  /// Claims the next ordinal against the parse-time stage index.
  fn claim_identity(&mut self) -> Result<StageIdentity, EngineError> {
    let identity = self.stage_index.get(self.next_ordinal).cloned().ok_or_else(|| {
      EngineError::IdentityResolution(format!(
        "stage call #{} has no matching stage construct in {}",
        self.next_ordinal + 1,
        self.script_path.display()
      ))
    })?;
    self.next_ordinal += 1;
    Ok(identity)
  }
}
