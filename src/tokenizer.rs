//! Lexical analysis: turns raw source text into a lazy token stream.
//!
//! The tokenizer is intentionally tiny – it knows nothing about semantics
//! beyond classifying identifier runs against the keyword table. Tokens are
//! produced one at a time on demand; the cursor only moves forward, and
//! [`Lexer::reset`] rewinds it so the same buffer can be scanned again.

use crate::error::{CompileError, CompileResult};

/// Kinds of tokens recognised by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  // Type keywords.
  Int,    // gyat
  Float,  // grimace / rizz
  Char,   // yap
  Double, // caseoh
  Void,   // toiletskibidi

  // Statement keywords.
  If,        // beta
  Else,      // sigma
  PrintCall, // yapper

  Identifier,
  Number,
  Str,

  LParen,
  RParen,
  LBrace,
  RBrace,
  Semicolon,
  Assign,
  EqEq,
  Lt,
  Gt,
  Comma,

  Eof,
}

/// Keyword spellings and the kinds they classify to. `grimace` and `rizz`
/// are dialect spellings of the same float keyword. The remaining slang
/// words (`chad`, `slay`, `nomilk`, `edging`, ...) are reserved for future
/// statement forms and lex as plain identifiers.
const KEYWORDS: &[(&str, TokenKind)] = &[
  ("gyat", TokenKind::Int),
  ("grimace", TokenKind::Float),
  ("rizz", TokenKind::Float),
  ("yap", TokenKind::Char),
  ("caseoh", TokenKind::Double),
  ("toiletskibidi", TokenKind::Void),
  ("beta", TokenKind::If),
  ("sigma", TokenKind::Else),
  ("yapper", TokenKind::PrintCall),
];

/// Thin wrapper for lexical information needed by later stages.
///
/// `text` is the exact lexeme; for string tokens it excludes the delimiting
/// quotes. `loc` is the byte offset of the lexeme's first character (the
/// opening quote for strings), used to anchor diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub text: String,
  pub loc: usize,
}

impl Token {
  pub fn new(kind: TokenKind, text: &str, loc: usize) -> Self {
    Self {
      kind,
      text: text.to_string(),
      loc,
    }
  }
}

/// Human-friendly description used in diagnostics.
pub fn describe(token: &Token) -> String {
  match token.kind {
    TokenKind::Eof => "EOF".to_string(),
    TokenKind::Str => format!("\"{}\"", token.text),
    _ => token.text.clone(),
  }
}

/// Forward-only cursor over the source text.
pub struct Lexer<'a> {
  source: &'a str,
  pos: usize,
  len: usize,
}

impl<'a> Lexer<'a> {
  pub fn new(source: &'a str) -> Self {
    Self {
      source,
      pos: 0,
      len: source.len(),
    }
  }

  /// The full buffer this lexer scans; handed to diagnostics.
  pub fn source(&self) -> &'a str {
    self.source
  }

  /// Rewind to the start of the buffer. Scanning the same buffer again
  /// yields an identical token sequence.
  pub fn reset(&mut self) {
    self.pos = 0;
  }

  /// Produce the next token, advancing the cursor past it. Once the end of
  /// input is reached this keeps returning `Eof` tokens.
  pub fn next_token(&mut self) -> CompileResult<Token> {
    let bytes = self.source.as_bytes();

    while self.pos < self.len {
      let c = bytes[self.pos];

      if c.is_ascii_whitespace() {
        self.pos += 1;
        continue;
      }

      if c.is_ascii_digit() {
        let start = self.pos;
        while self.pos < self.len && bytes[self.pos].is_ascii_digit() {
          self.pos += 1;
        }
        return Ok(Token::new(
          TokenKind::Number,
          &self.source[start..self.pos],
          start,
        ));
      }

      if c.is_ascii_alphabetic() {
        let start = self.pos;
        while self.pos < self.len && bytes[self.pos].is_ascii_alphanumeric() {
          self.pos += 1;
        }
        let text = &self.source[start..self.pos];
        let kind = KEYWORDS
          .iter()
          .find(|(word, _)| *word == text)
          .map(|(_, kind)| *kind)
          .unwrap_or(TokenKind::Identifier);
        return Ok(Token::new(kind, text, start));
      }

      if c == b'"' {
        let start = self.pos;
        self.pos += 1;
        let text_start = self.pos;
        while self.pos < self.len && bytes[self.pos] != b'"' {
          self.pos += 1;
        }
        if self.pos >= self.len {
          return Err(CompileError::lexical(
            self.source,
            start,
            "unterminated string literal",
          ));
        }
        let text = &self.source[text_start..self.pos];
        self.pos += 1; // closing quote
        return Ok(Token::new(TokenKind::Str, text, start));
      }

      let start = self.pos;
      self.pos += 1;
      let kind = match c {
        b'(' => TokenKind::LParen,
        b')' => TokenKind::RParen,
        b'{' => TokenKind::LBrace,
        b'}' => TokenKind::RBrace,
        b';' => TokenKind::Semicolon,
        b'<' => TokenKind::Lt,
        b'>' => TokenKind::Gt,
        b',' => TokenKind::Comma,
        b'=' => {
          if self.pos < self.len && bytes[self.pos] == b'=' {
            self.pos += 1;
            TokenKind::EqEq
          } else {
            TokenKind::Assign
          }
        }
        _ => {
          let invalid = self.source[start..].chars().next().unwrap_or('\0');
          return Err(CompileError::lexical(
            self.source,
            start,
            format!("unrecognized character '{invalid}'"),
          ));
        }
      };
      return Ok(Token::new(kind, &self.source[start..self.pos], start));
    }

    Ok(Token::new(TokenKind::Eof, "", self.len))
  }
}
