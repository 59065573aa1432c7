//! Applies operator-chosen remediations to flagged blocks and rewrites the
//! script.
//!
//! Any textual change invalidates the line numbers computed by the scan, so a
//! rewrite always ends the current launch: the operator relaunches against the
//! updated source.

use crate::error::EngineError;
use crate::grammar::ScriptGrammar;
use crate::scanner::ScanReport;
use crate::types::{NonResumableBlock, RemediationAction};
use std::path::Path;
use tracing::{info, instrument};

/// What a remediation pass did to the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteOutcome {
  /// The file was rewritten; earlier line numbers are stale and the operator
  /// must relaunch.
  Rewritten,
  /// Every decision was `Ignore`; nothing was written and the launch may
  /// continue.
  Unchanged,
  /// The operator chose `Quit`; nothing was written.
  Aborted,
}

/// Applies one decision per flagged block and, if any decision changes the
/// text, writes the file in place (temp file + rename, so the original is
/// byte-for-byte unmodified on failure).
#[instrument(level = "debug", skip(path, lines, report, decisions, grammar))]
pub fn apply_remediations(
  path: &Path,
  lines: &[String],
  report: &ScanReport,
  decisions: &[RemediationAction],
  grammar: &ScriptGrammar,
) -> Result<RewriteOutcome, EngineError> {
  if decisions.len() != report.blocks.len() {
    return Err(EngineError::ScriptRewrite(format!(
      "expected {} decisions, got {}",
      report.blocks.len(),
      decisions.len()
    )));
  }
  if decisions.contains(&RemediationAction::Quit) {
    return Ok(RewriteOutcome::Aborted);
  }
  if decisions.iter().all(|d| *d == RemediationAction::Ignore) {
    return Ok(RewriteOutcome::Unchanged);
  }
  for (block, decision) in report.blocks.iter().zip(decisions) {
    if *decision == RemediationAction::Move {
      if !block.is_trailing {
        return Err(EngineError::ScriptRewrite(format!(
          "move is only valid for trailing blocks (line {})",
          block.first_display_line()
        )));
      }
      if report.finalize_line.is_none() {
        return Err(EngineError::ScriptRewrite(
          "move requires a finalization call to insert after".to_string(),
        ));
      }
    }
  }

  let mut out: Vec<String> = lines.to_vec();
  // Track where the finalization call sits as edits shift lines. All blocks
  // precede it, so applying edits in reverse source order keeps every
  // untouched index valid.
  let mut finalize_at = report.finalize_line;
  for (block, decision) in report.blocks.iter().zip(decisions).rev() {
    apply_one(&mut out, block, *decision, &mut finalize_at, grammar);
  }

  write_lines(path, &out)
    .map_err(|e| EngineError::ScriptRewrite(format!("{}: {e}", path.display())))?;
  info!(path = %path.display(), "script rewritten; relaunch required");
  Ok(RewriteOutcome::Rewritten)
}

/// Applies a single decision to `out`, updating the finalization index.
fn apply_one(
  out: &mut Vec<String>,
  block: &NonResumableBlock,
  decision: RemediationAction,
  finalize_at: &mut Option<usize>,
  grammar: &ScriptGrammar,
) {
  let range = block.lines.clone();
  match decision {
    RemediationAction::Ignore | RemediationAction::Quit => {}
    RemediationAction::Delete => {
      out.splice(range.clone(), std::iter::empty());
      shift(finalize_at, -(range.len() as isize));
    }
    RemediationAction::Wrap => {
      let indent = leading_whitespace(&out[range.start]).to_string();
      let mut replacement = Vec::with_capacity(range.len() + 2);
      replacement.push(grammar.stage_open_line(&indent));
      for line in &out[range.clone()] {
        if line.trim().is_empty() {
          replacement.push(line.clone());
        } else {
          replacement.push(format!("{}{line}", grammar.indent_unit));
        }
      }
      replacement.push(grammar.body_close_line(&indent));
      out.splice(range, replacement);
      shift(finalize_at, 2);
    }
    RemediationAction::MarkIgnored => {
      let indent = leading_whitespace(&out[range.start]).to_string();
      out.insert(range.end, format!("{indent}{}", grammar.ignore_close));
      out.insert(range.start, format!("{indent}{}", grammar.ignore_open));
      shift(finalize_at, 2);
    }
    RemediationAction::Move => {
      let moved: Vec<String> = out.splice(range.clone(), std::iter::empty()).collect();
      shift(finalize_at, -(range.len() as isize));
      // Validated by the caller: trailing block with a finalization line.
      if let Some(fin) = *finalize_at {
        let at = fin + 1;
        out.splice(at..at, moved);
      }
    }
  }
}

fn shift(finalize_at: &mut Option<usize>, by: isize) {
  if let Some(fin) = finalize_at {
    *fin = fin.saturating_add_signed(by);
  }
}

fn leading_whitespace(line: &str) -> &str {
  let end = line
    .find(|c: char| !c.is_whitespace())
    .unwrap_or(line.len());
  &line[..end]
}

/// Writes `lines` to `path` atomically with a trailing newline.
fn write_lines(path: &Path, lines: &[String]) -> Result<(), std::io::Error> {
  let mut text = lines.join("\n");
  text.push('\n');
  let tmp = path.with_extension("rewrite.tmp");
  std::fs::write(&tmp, text)?;
  std::fs::rename(&tmp, path)
}
