//! CLI: inspect and maintain checkpoint state for a multi-stage script.
//!
//! - `restage scan <script>`: flag live code outside stages and apply a chosen
//!   remediation per block (prompted on stdin).
//! - `restage status <script>`: show the checkpoint record, if any.
//! - `restage clear <script>`: delete the checkpoint.
//!
//! Set RUST_LOG=restage=trace for TRACE-level span enter/exit and events.

use clap::{Parser, Subcommand};
use restage::checkpoint_io::{checkpoint_path_for, delete_checkpoint, load_checkpoint};
use restage::rewriter::{RewriteOutcome, apply_remediations};
use restage::scanner::scan_script;
use restage::types::{NonResumableBlock, RemediationAction};
use restage::ScriptGrammar;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

/// Inspect and maintain checkpoint state for a multi-stage script.
#[derive(Parser, Debug)]
#[command(name = "restage")]
struct Args {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Scan a script for code outside stages and remediate it.
  Scan {
    /// Path to the script
    script: PathBuf,
    /// Report blocks without prompting or writing.
    #[arg(long)]
    dry_run: bool,
  },
  /// Show the checkpoint record for a script.
  Status {
    /// Path to the script
    script: PathBuf,
  },
  /// Delete the checkpoint record for a script.
  Clear {
    /// Path to the script
    script: PathBuf,
  },
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .init();

  let args = Args::parse();
  let code = match args.command {
    Command::Scan { script, dry_run } => cmd_scan(&script, dry_run),
    Command::Status { script } => cmd_status(&script),
    Command::Clear { script } => cmd_clear(&script),
  };
  process::exit(code);
}

fn cmd_scan(script: &Path, dry_run: bool) -> i32 {
  let source = match std::fs::read_to_string(script) {
    Ok(s) => s,
    Err(e) => {
      eprintln!("Error reading {}: {}", script.display(), e);
      return 1;
    }
  };
  let lines: Vec<String> = source.lines().map(str::to_string).collect();
  let grammar = ScriptGrammar::braces();
  let report = scan_script(&lines, &grammar);

  println!(
    "{}: {} stage(s), {} non-resumable block(s)",
    script.display(),
    report.stage_spans.len(),
    report.blocks.len()
  );
  if report.blocks.is_empty() {
    return 0;
  }
  for (i, block) in report.blocks.iter().enumerate() {
    print_block(i, block, &lines);
  }
  if dry_run {
    return 0;
  }

  let decisions: Vec<RemediationAction> = report
    .blocks
    .iter()
    .map(|b| prompt_action(b))
    .collect();
  match apply_remediations(script, &lines, &report, &decisions, &grammar) {
    Ok(RewriteOutcome::Rewritten) => {
      println!("Rewrote {}; relaunch the script against the updated source.", script.display());
      0
    }
    Ok(RewriteOutcome::Unchanged) => {
      println!("No changes made; the flagged code will re-run on every launch.");
      0
    }
    Ok(RewriteOutcome::Aborted) => {
      println!("Aborted; nothing written.");
      1
    }
    Err(e) => {
      eprintln!("Rewrite error: {}", e);
      1
    }
  }
}

fn print_block(index: usize, block: &NonResumableBlock, lines: &[String]) {
  let kind = if block.is_trailing { "trailing" } else { "interior" };
  println!(
    "\nBlock {} ({}, line {}): re-executes on every launch",
    index + 1,
    kind,
    block.first_display_line()
  );
  for i in block.lines.clone() {
    println!("  {:>4} | {}", i + 1, lines[i]);
  }
}

/// Asks the operator for one action; move is offered only for trailing blocks.
fn prompt_action(block: &NonResumableBlock) -> RemediationAction {
  let stdin = std::io::stdin();
  loop {
    if block.is_trailing {
      print!("[w]rap  [m]ove after finalize  mark [s]kipped  [d]elete  [i]gnore  [q]uit > ");
    } else {
      print!("[w]rap  mark [s]kipped  [d]elete  [i]gnore  [q]uit > ");
    }
    let _ = std::io::stdout().flush();
    let mut line = String::new();
    if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
      return RemediationAction::Quit;
    }
    match line.trim().to_ascii_lowercase().as_str() {
      "w" => return RemediationAction::Wrap,
      "m" if block.is_trailing => return RemediationAction::Move,
      "s" => return RemediationAction::MarkIgnored,
      "d" => return RemediationAction::Delete,
      "i" => return RemediationAction::Ignore,
      "q" => return RemediationAction::Quit,
      _ => println!("Unrecognized choice."),
    }
  }
}

fn cmd_status(script: &Path) -> i32 {
  let path = checkpoint_path_for(script);
  match load_checkpoint(&path) {
    Some(record) => {
      println!("Checkpoint: {}", path.display());
      println!("  Last completed: {}", record.last_completed);
      println!("  Written at:     {}", record.timestamp.to_rfc3339());
      println!("  Script hash:    {}", record.script_hash);
      println!("  Shared data:    {} key(s)", record.shared_data.len());
      for (k, v) in record.shared_data.iter() {
        println!("    {k} = {v}");
      }
      0
    }
    None => {
      println!("No checkpoint for {}", script.display());
      0
    }
  }
}

fn cmd_clear(script: &Path) -> i32 {
  let path = checkpoint_path_for(script);
  match delete_checkpoint(&path) {
    Ok(()) => {
      println!("Cleared {}", path.display());
      0
    }
    Err(e) => {
      eprintln!("Error clearing {}: {}", path.display(), e);
      1
    }
  }
}
