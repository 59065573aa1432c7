//! Non-resumable block: live source lines outside any stage span.

use std::ops::Range;

/// A maximal contiguous run of live lines that lie outside every stage span.
///
/// Such lines re-execute on every launch, including resumed ones, silently
/// breaking the "already done" guarantee. `lines` holds 0-based indices into
/// the scanned source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonResumableBlock {
  pub lines: Range<usize>,
  /// True only for the region between the last stage and the finalization
  /// call. Only trailing blocks permit [RemediationAction::Move].
  pub is_trailing: bool,
}

impl NonResumableBlock {
  pub fn new(lines: Range<usize>, is_trailing: bool) -> Self {
    Self { lines, is_trailing }
  }

  pub fn len(&self) -> usize {
    self.lines.len()
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  /// 1-based first line, as an operator would see it in an editor.
  pub fn first_display_line(&self) -> usize {
    self.lines.start + 1
  }
}

/// Operator-chosen remediation for one flagged block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemediationAction {
  /// Replace the block with a stage construct whose body is exactly those
  /// lines.
  Wrap,
  /// Relocate the lines to immediately after the finalization call.
  /// Valid only for trailing blocks.
  Move,
  /// Surround the block with ignore sentinels so future scans skip it.
  MarkIgnored,
  /// Remove the block's lines entirely.
  Delete,
  /// Leave the block and accept the resumability risk for this run.
  Ignore,
  /// Abort without writing anything.
  Quit,
}
