//! Static scan: stage spans, finalization line, and live code outside stages.
//!
//! Code outside a stage span re-executes on every launch, including resumed
//! ones, silently breaking the "already done" guarantee. This scan is the only
//! mechanism that surfaces that risk before it causes duplicated side effects.

use crate::grammar::ScriptGrammar;
use crate::types::NonResumableBlock;
use tracing::instrument;

/// Contiguous lines of one stage construct (0-based, inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSpan {
  pub start: usize,
  pub end: usize,
}

impl StageSpan {
  /// 1-based line of the stage-opening token, the stage's identity line.
  pub fn display_line(&self) -> usize {
    self.start + 1
  }
}

/// Result of scanning one script.
#[derive(Debug, Clone)]
pub struct ScanReport {
  /// Stage spans in source order.
  pub stage_spans: Vec<StageSpan>,
  /// 0-based line of the first finalization call, if any.
  pub finalize_line: Option<usize>,
  /// Maximal runs of live lines outside every span, in source order.
  /// Empty when the script has no stages.
  pub blocks: Vec<NonResumableBlock>,
}

/// Scans `lines` in a single linear pass, tracking a nesting counter over the
/// grammar's delimiters to find stage spans and the finalization call, then
/// classifies every line outside a span in the three regions (before the first
/// stage, between stages, between the last stage and finalization) as live
/// unless blank, comment, pure declaration, or inside an ignore-sentinel pair.
#[instrument(level = "trace", skip(lines, grammar), fields(lines = lines.len()))]
pub fn scan_script(lines: &[String], grammar: &ScriptGrammar) -> ScanReport {
  let mut stage_spans = Vec::new();
  let mut finalize_line = None;
  let mut live = vec![false; lines.len()];
  let mut in_ignore = false;

  let mut i = 0;
  while i < lines.len() {
    let line = &lines[i];

    if in_ignore {
      if grammar.is_ignore_close(line) {
        in_ignore = false;
      }
      i += 1;
      continue;
    }
    if grammar.is_ignore_open(line) {
      in_ignore = true;
      i += 1;
      continue;
    }

    if grammar.is_stage_open(line) {
      let end = consume_balanced(lines, i, grammar);
      stage_spans.push(StageSpan { start: i, end });
      i = end + 1;
      continue;
    }

    if finalize_line.is_none() && grammar.is_finalize(line) {
      finalize_line = Some(i);
      i += 1;
      continue;
    }

    if grammar.is_declaration(line) {
      // A declaration that opens a delimited body is inert as a whole.
      let end = if grammar.delim_delta(line) > 0 {
        consume_balanced(lines, i, grammar)
      } else {
        i
      };
      i = end + 1;
      continue;
    }

    if finalize_line.is_none() && !grammar.is_blank(line) && !grammar.is_comment(line) {
      live[i] = true;
    }
    i += 1;
  }

  let blocks = if stage_spans.is_empty() {
    Vec::new()
  } else {
    let last_stage_end = stage_spans[stage_spans.len() - 1].end;
    group_live_lines(&live, last_stage_end)
  };

  ScanReport {
    stage_spans,
    finalize_line,
    blocks,
  }
}

/// Consumes a construct starting at `start` until its delimiters balance.
/// Returns the 0-based index of its last line. An unclosed construct runs to
/// the end of the source.
fn consume_balanced(lines: &[String], start: usize, grammar: &ScriptGrammar) -> usize {
  let mut nesting = 0i32;
  let mut seen_open = false;
  for (i, line) in lines.iter().enumerate().skip(start) {
    for c in grammar.code_portion(line).chars() {
      if c == grammar.open_delim {
        nesting += 1;
        seen_open = true;
      } else if c == grammar.close_delim {
        nesting -= 1;
      }
    }
    if seen_open && nesting <= 0 {
      return i;
    }
  }
  lines.len().saturating_sub(1)
}

/// Groups consecutive live indices into maximal runs, tagging runs after the
/// last stage as trailing.
fn group_live_lines(live: &[bool], last_stage_end: usize) -> Vec<NonResumableBlock> {
  let mut blocks = Vec::new();
  let mut run_start = None;
  for (i, &is_live) in live.iter().enumerate() {
    match (is_live, run_start) {
      (true, None) => run_start = Some(i),
      (false, Some(s)) => {
        blocks.push(NonResumableBlock::new(s..i, s > last_stage_end));
        run_start = None;
      }
      _ => {}
    }
  }
  if let Some(s) = run_start {
    blocks.push(NonResumableBlock::new(s..live.len(), s > last_stage_end));
  }
  blocks
}
