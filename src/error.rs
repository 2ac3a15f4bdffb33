//! Shared error utilities used across the compilation pipeline.
//!
//! Diagnostics are kept lightweight on purpose – lexical and syntax errors
//! point at the offending byte with a caret under the source line, in a
//! style reminiscent of chibicc. Every error is terminal for the compile;
//! nothing is accumulated or retried.

use snafu::Snafu;
use std::path::PathBuf;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Snafu)]
pub enum CompileError {
  #[snafu(display("cannot access {}: {source}", path.display()))]
  Io {
    path: PathBuf,
    source: std::io::Error,
  },

  #[snafu(display("lexical error at line {line}: {message}\n{source_line}\n{marker}"))]
  Lexical {
    line: usize,
    message: String,
    source_line: String,
    marker: String,
  },

  #[snafu(display("syntax error at line {line}: {message}\n{source_line}\n{marker}"))]
  Syntax {
    line: usize,
    message: String,
    source_line: String,
    marker: String,
  },

  #[snafu(display("cannot generate code for {kind} node"))]
  UnsupportedNode { kind: String },

  #[snafu(display("internal error: {message}"))]
  Internal { message: String },
}

impl CompileError {
  /// Construct a lexical error anchored at a byte offset in the source.
  pub fn lexical(source: &str, loc: usize, message: impl Into<String>) -> Self {
    let (line, source_line, marker) = render(source, loc);
    Self::Lexical {
      line,
      message: message.into(),
      source_line,
      marker,
    }
  }

  /// Construct a syntax error anchored at a byte offset in the source.
  pub fn syntax(source: &str, loc: usize, message: impl Into<String>) -> Self {
    let (line, source_line, marker) = render(source, loc);
    Self::Syntax {
      line,
      message: message.into(),
      source_line,
      marker,
    }
  }
}

/// Extract the line containing `loc` plus a caret marker pointing at it.
fn render(source: &str, loc: usize) -> (usize, String, String) {
  let safe_loc = loc.min(source.len());
  let line_start = source[..safe_loc].rfind('\n').map_or(0, |i| i + 1);
  let line_end = source[safe_loc..]
    .find('\n')
    .map_or(source.len(), |i| safe_loc + i);
  let line = source[..safe_loc].matches('\n').count() + 1;
  let source_line = source[line_start..line_end].to_string();
  let column = source[line_start..safe_loc].chars().count();
  let marker = format!("{}^", " ".repeat(column));
  (line, source_line, marker)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn caret_points_at_offending_column() {
    let err = CompileError::syntax("gyat x = ;", 9, "expected a number");
    let text = err.to_string();
    assert!(text.contains("syntax error at line 1"));
    assert!(text.contains("gyat x = ;"));
    assert!(text.ends_with("         ^"));
  }

  #[test]
  fn multi_line_sources_report_the_right_line() {
    let source = "toiletskibidi main() {\n  gyat x = ;\n}";
    let loc = source.find(';').unwrap();
    let err = CompileError::lexical(source, loc, "boom");
    let text = err.to_string();
    assert!(text.contains("line 2"));
    assert!(text.contains("  gyat x = ;"));
    assert!(!text.contains("toiletskibidi"));
  }

  #[test]
  fn offsets_past_the_end_are_clamped() {
    let err = CompileError::syntax("x", 99, "unexpected end of input");
    assert!(err.to_string().contains("unexpected end of input"));
  }
}
