//! Tests for the script rewriter.

use crate::grammar::ScriptGrammar;
use crate::rewriter::{RewriteOutcome, apply_remediations};
use crate::scanner::scan_script;
use crate::types::RemediationAction;
use std::path::PathBuf;

const SOURCE: &str = "\
before = 1
stage {
  a
}
after = 2
finalize
";

fn setup(source: &str) -> (tempfile::TempDir, PathBuf, Vec<String>) {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("script.rsg");
  std::fs::write(&path, source).unwrap();
  let lines = source.lines().map(str::to_string).collect();
  (dir, path, lines)
}

fn rewrite(source: &str, decisions: &[RemediationAction]) -> (RewriteOutcome, String) {
  let (_dir, path, lines) = setup(source);
  let grammar = ScriptGrammar::braces();
  let report = scan_script(&lines, &grammar);
  let outcome = apply_remediations(&path, &lines, &report, decisions, &grammar).unwrap();
  let text = std::fs::read_to_string(&path).unwrap();
  (outcome, text)
}

#[test]
fn ignore_everything_leaves_file_untouched() {
  let (outcome, text) = rewrite(
    SOURCE,
    &[RemediationAction::Ignore, RemediationAction::Ignore],
  );
  assert_eq!(outcome, RewriteOutcome::Unchanged);
  assert_eq!(text, SOURCE);
}

#[test]
fn quit_aborts_without_writing() {
  let (outcome, text) = rewrite(SOURCE, &[RemediationAction::Wrap, RemediationAction::Quit]);
  assert_eq!(outcome, RewriteOutcome::Aborted);
  assert_eq!(text, SOURCE);
}

#[test]
fn wrap_replaces_block_with_a_stage() {
  let (outcome, text) = rewrite(
    SOURCE,
    &[RemediationAction::Wrap, RemediationAction::Ignore],
  );
  assert_eq!(outcome, RewriteOutcome::Rewritten);
  assert_eq!(
    text,
    "\
stage {
  before = 1
}
stage {
  a
}
after = 2
finalize
"
  );
}

#[test]
fn delete_removes_block_lines() {
  let (outcome, text) = rewrite(
    SOURCE,
    &[RemediationAction::Delete, RemediationAction::Delete],
  );
  assert_eq!(outcome, RewriteOutcome::Rewritten);
  assert_eq!(text, "stage {\n  a\n}\nfinalize\n");
}

#[test]
fn mark_ignored_surrounds_block_with_sentinels() {
  let (outcome, text) = rewrite(
    SOURCE,
    &[RemediationAction::MarkIgnored, RemediationAction::Ignore],
  );
  assert_eq!(outcome, RewriteOutcome::Rewritten);
  assert_eq!(
    text,
    "\
# restage:skip-begin
before = 1
# restage:skip-end
stage {
  a
}
after = 2
finalize
"
  );
  // A rescan of the marked source flags only the untouched block.
  let lines: Vec<String> = text.lines().map(str::to_string).collect();
  let report = scan_script(&lines, &ScriptGrammar::braces());
  assert_eq!(report.blocks.len(), 1);
  assert!(report.blocks[0].is_trailing);
}

#[test]
fn move_relocates_trailing_block_after_finalize() {
  let (outcome, text) = rewrite(
    SOURCE,
    &[RemediationAction::Ignore, RemediationAction::Move],
  );
  assert_eq!(outcome, RewriteOutcome::Rewritten);
  assert_eq!(
    text,
    "\
before = 1
stage {
  a
}
finalize
after = 2
"
  );
  // Moved lines sit after finalize, so a rescan no longer flags them.
  let lines: Vec<String> = text.lines().map(str::to_string).collect();
  let report = scan_script(&lines, &ScriptGrammar::braces());
  assert_eq!(report.blocks.len(), 1);
  assert_eq!(report.blocks[0].lines, 0..1);
}

#[test]
fn move_on_non_trailing_block_is_rejected() {
  let (_dir, path, lines) = setup(SOURCE);
  let grammar = ScriptGrammar::braces();
  let report = scan_script(&lines, &grammar);
  let err = apply_remediations(
    &path,
    &lines,
    &report,
    &[RemediationAction::Move, RemediationAction::Ignore],
    &grammar,
  )
  .unwrap_err();
  assert!(err.to_string().contains("trailing"));
  assert_eq!(std::fs::read_to_string(&path).unwrap(), SOURCE);
}

#[test]
fn move_without_finalize_is_rejected() {
  let source = "stage {\n  a\n}\ntrailing = 1\n";
  let (_dir, path, lines) = setup(source);
  let grammar = ScriptGrammar::braces();
  let report = scan_script(&lines, &grammar);
  let err =
    apply_remediations(&path, &lines, &report, &[RemediationAction::Move], &grammar).unwrap_err();
  assert!(err.to_string().contains("finalization"));
  assert_eq!(std::fs::read_to_string(&path).unwrap(), source);
}

#[test]
fn decision_count_mismatch_is_rejected() {
  let (_dir, path, lines) = setup(SOURCE);
  let grammar = ScriptGrammar::braces();
  let report = scan_script(&lines, &grammar);
  let err = apply_remediations(&path, &lines, &report, &[RemediationAction::Ignore], &grammar)
    .unwrap_err();
  assert!(err.to_string().contains("decisions"));
}

#[test]
fn mixed_decisions_apply_in_one_pass() {
  let source = "\
one = 1
stage {
  a
}
two = 2
three = 3
finalize
";
  let (_dir, path, lines) = setup(source);
  let grammar = ScriptGrammar::braces();
  let report = scan_script(&lines, &grammar);
  assert_eq!(report.blocks.len(), 2);
  let outcome = apply_remediations(
    &path,
    &lines,
    &report,
    &[RemediationAction::Delete, RemediationAction::Move],
    &grammar,
  )
  .unwrap();
  assert_eq!(outcome, RewriteOutcome::Rewritten);
  assert_eq!(
    std::fs::read_to_string(&path).unwrap(),
    "stage {\n  a\n}\nfinalize\ntwo = 2\nthree = 3\n"
  );
}
