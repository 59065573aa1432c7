//! Identity of a stage: script path plus the 1-based line of its opening token.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Lexical identity of one stage, formatted as `"path:line"`.
///
/// Identities are assigned once at scan time (one per stage construct in the
/// source) and claimed in order by runtime stage calls, so two launches of the
/// same unmodified script always agree on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageIdentity {
  pub script_path: PathBuf,
  pub line: usize,
}

impl StageIdentity {
  pub fn new(script_path: impl Into<PathBuf>, line: usize) -> Self {
    Self {
      script_path: script_path.into(),
      line,
    }
  }

  pub fn path(&self) -> &Path {
    &self.script_path
  }
}

impl fmt::Display for StageIdentity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.script_path.display(), self.line)
  }
}
