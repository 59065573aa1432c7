//! Pluggable script grammar: the tokens the scanner and rewriter recognize.
//!
//! The engine never hard-codes a host language. A [ScriptGrammar] names the
//! stage-opening and finalization tokens, the body delimiters, and the line
//! shapes (comments, declarations, ignore sentinels) the scanner must skip.

/// Tokens and line shapes for one host script dialect.
#[derive(Debug, Clone)]
pub struct ScriptGrammar {
  /// Keyword that opens a stage construct (e.g. `stage`).
  pub stage_token: String,
  /// Zero-argument finalization call (e.g. `finalize`).
  pub finalize_token: String,
  /// Delimiter opening a stage or declaration body.
  pub open_delim: char,
  /// Delimiter closing a stage or declaration body.
  pub close_delim: char,
  /// Prefixes that start a comment line (and end the code portion of a line).
  pub comment_prefixes: Vec<String>,
  /// Prefixes of pure declaration lines; a declaration that opens a delimited
  /// body consumes its whole balanced block.
  pub declaration_prefixes: Vec<String>,
  /// Sentinel line opening an ignored region.
  pub ignore_open: String,
  /// Sentinel line closing an ignored region.
  pub ignore_close: String,
  /// One level of indentation, used when wrapping a block into a stage.
  pub indent_unit: String,
}

impl ScriptGrammar {
  /// Braced dialect: `stage { ... }` bodies, a bare `finalize` call, `#` and
  /// `//` comments, and `# restage:skip-begin/-end` ignore sentinels.
  pub fn braces() -> Self {
    Self {
      stage_token: "stage".to_string(),
      finalize_token: "finalize".to_string(),
      open_delim: '{',
      close_delim: '}',
      comment_prefixes: vec!["#".to_string(), "//".to_string()],
      declaration_prefixes: vec!["fn ".to_string(), "use ".to_string()],
      ignore_open: "# restage:skip-begin".to_string(),
      ignore_close: "# restage:skip-end".to_string(),
      indent_unit: "  ".to_string(),
    }
  }

  /// True when the line's code portion begins a stage construct.
  pub fn is_stage_open(&self, line: &str) -> bool {
    starts_with_token(line.trim_start(), &self.stage_token)
  }

  /// True when the line's code portion is the finalization call.
  pub fn is_finalize(&self, line: &str) -> bool {
    starts_with_token(line.trim_start(), &self.finalize_token)
  }

  pub fn is_blank(&self, line: &str) -> bool {
    line.trim().is_empty()
  }

  pub fn is_comment(&self, line: &str) -> bool {
    let t = line.trim_start();
    self.comment_prefixes.iter().any(|p| t.starts_with(p.as_str()))
  }

  pub fn is_declaration(&self, line: &str) -> bool {
    let t = line.trim_start();
    self
      .declaration_prefixes
      .iter()
      .any(|p| t.starts_with(p.as_str()))
  }

  pub fn is_ignore_open(&self, line: &str) -> bool {
    line.trim() == self.ignore_open
  }

  pub fn is_ignore_close(&self, line: &str) -> bool {
    line.trim() == self.ignore_close
  }

  /// The line up to its first comment prefix.
  pub fn code_portion<'a>(&self, line: &'a str) -> &'a str {
    let mut end = line.len();
    for p in &self.comment_prefixes {
      if let Some(i) = line.find(p.as_str()) {
        end = end.min(i);
      }
    }
    &line[..end]
  }

  /// Open-delimiter count minus close-delimiter count on the code portion.
  pub fn delim_delta(&self, line: &str) -> i32 {
    let mut delta = 0;
    for c in self.code_portion(line).chars() {
      if c == self.open_delim {
        delta += 1;
      } else if c == self.close_delim {
        delta -= 1;
      }
    }
    delta
  }

  /// A stage-opening line at the given indentation, e.g. `stage {`.
  pub fn stage_open_line(&self, indent: &str) -> String {
    format!("{indent}{} {}", self.stage_token, self.open_delim)
  }

  /// A body-closing line at the given indentation.
  pub fn body_close_line(&self, indent: &str) -> String {
    format!("{indent}{}", self.close_delim)
  }
}

impl Default for ScriptGrammar {
  fn default() -> Self {
    Self::braces()
  }
}

/// True when `s` starts with `token` followed by a non-identifier character.
fn starts_with_token(s: &str, token: &str) -> bool {
  if !s.starts_with(token) {
    return false;
  }
  match s[token.len()..].chars().next() {
    None => true,
    Some(c) => !c.is_ascii_alphanumeric() && c != '_',
  }
}
