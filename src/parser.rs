//! Recursive-descent parser producing an arena-backed AST.
//!
//! Each grammar rule is one parsing routine pulling tokens straight from the
//! lexer; there is no separate token buffer. Nodes live in a flat arena and
//! point at each other by index: `left` and `right` are child relations,
//! `next` threads ordered lists (statement sequences, call arguments), so
//! the whole tree is freed in one step when the arena drops.
//!
//! The grammar is deliberately small: one `toiletskibidi main() { ... }`
//! entry point whose body is a sequence of initializing declarations and
//! `yapper(...)` print calls.

use crate::Options;
use crate::error::{CompileError, CompileResult};
use crate::tokenizer::{Lexer, Token, TokenKind, describe};

/// Index of a node in the AST arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

/// Node kinds the code generator dispatches on. The parser only ever
/// constructs `Program`, `Assignment`, `FunctionCall` and `Literal`; the
/// rest are anticipated statement forms with no grammar rule yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
  Program,
  Declaration,
  Assignment,
  IfStatement,
  WhileLoop,
  ForLoop,
  FunctionCall,
  Literal,
  Identifier,
}

impl NodeKind {
  pub fn name(self) -> &'static str {
    match self {
      Self::Program => "program",
      Self::Declaration => "declaration",
      Self::Assignment => "assignment",
      Self::IfStatement => "if-statement",
      Self::WhileLoop => "while-loop",
      Self::ForLoop => "for-loop",
      Self::FunctionCall => "function-call",
      Self::Literal => "literal",
      Self::Identifier => "identifier",
    }
  }
}

/// A single AST node. `value` carries the identifier name, literal text or
/// callee name, depending on the kind.
#[derive(Debug, Clone)]
pub struct Node {
  pub kind: NodeKind,
  pub value: String,
  pub left: Option<NodeId>,
  pub right: Option<NodeId>,
  pub next: Option<NodeId>,
}

/// Flat arena owning every node of one parse.
#[derive(Debug, Default)]
pub struct Ast {
  nodes: Vec<Node>,
}

impl Ast {
  /// Append a fresh node with no relations and return its id.
  pub fn push(&mut self, kind: NodeKind, value: impl Into<String>) -> NodeId {
    let id = NodeId(self.nodes.len());
    self.nodes.push(Node {
      kind,
      value: value.into(),
      left: None,
      right: None,
      next: None,
    });
    id
  }

  pub fn node(&self, id: NodeId) -> &Node {
    &self.nodes[id.0]
  }

  pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
    &mut self.nodes[id.0]
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }
}

/// A named stack slot. Offsets are relative to `rbp`, assigned in source
/// order at first declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Local {
  pub name: String,
  pub offset: i64,
}

/// Result of a successful parse: the arena, the `Program` root, and the
/// frame layout for the single entry function.
#[derive(Debug)]
pub struct Program {
  pub ast: Ast,
  pub root: NodeId,
  pub locals: Vec<Local>,
  pub stack_size: i64,
}

impl Program {
  pub fn local_offset(&self, name: &str) -> Option<i64> {
    self
      .locals
      .iter()
      .find(|local| local.name == name)
      .map(|local| local.offset)
  }
}

/// Parse a whole source buffer into a [`Program`].
///
/// Fails on the first deviation from the grammar; no partial tree is
/// returned. The statement list is terminated by `}` or end of input – a
/// missing closing brace is deliberately tolerated.
pub fn parse_program(lexer: &mut Lexer, options: &Options) -> CompileResult<Program> {
  let mut parser = Parser {
    lexer,
    options,
    ast: Ast::default(),
    locals: Vec::new(),
  };
  let root = parser.program()?;
  let stack_size = align_to(parser.locals.len() as i64 * 8, 16);
  Ok(Program {
    ast: parser.ast,
    root,
    locals: parser.locals,
    stack_size,
  })
}

fn align_to(n: i64, align: i64) -> i64 {
  (n + align - 1) / align * align
}

struct Parser<'a, 's> {
  lexer: &'a mut Lexer<'s>,
  options: &'a Options,
  ast: Ast,
  locals: Vec<Local>,
}

impl Parser<'_, '_> {
  fn advance(&mut self) -> CompileResult<Token> {
    self.lexer.next_token()
  }

  fn expect(&mut self, kind: TokenKind, what: &str) -> CompileResult<Token> {
    let token = self.advance()?;
    if token.kind == kind {
      Ok(token)
    } else {
      Err(self.error_at(&token, format!("expected {what}, but got \"{}\"", describe(&token))))
    }
  }

  fn error_at(&self, token: &Token, message: impl Into<String>) -> CompileError {
    CompileError::syntax(self.lexer.source(), token.loc, message)
  }

  /// Program := 'toiletskibidi' 'main' '(' ')' '{' StatementList '}'
  fn program(&mut self) -> CompileResult<NodeId> {
    self.expect(TokenKind::Void, "\"toiletskibidi\"")?;
    let name = self.expect(TokenKind::Identifier, "a function name")?;
    if name.text != "main" {
      return Err(self.error_at(&name, "the entry point must be named \"main\""));
    }
    self.expect(TokenKind::LParen, "\"(\"")?;
    self.expect(TokenKind::RParen, "\")\"")?;
    self.expect(TokenKind::LBrace, "\"{\"")?;

    let body = self.statements()?;
    let root = self.ast.push(NodeKind::Program, name.text);
    self.ast.node_mut(root).left = body;
    Ok(root)
  }

  /// StatementList := (Declaration | PrintCall)* – ends at '}' or EOF.
  fn statements(&mut self) -> CompileResult<Option<NodeId>> {
    let mut head = None;
    let mut tail: Option<NodeId> = None;

    loop {
      let token = self.advance()?;
      let statement = match token.kind {
        TokenKind::RBrace | TokenKind::Eof => break,
        TokenKind::Int | TokenKind::Float | TokenKind::Char | TokenKind::Double => {
          self.declaration()?
        }
        TokenKind::PrintCall => self.print_call(token)?,
        _ => {
          return Err(self.error_at(
            &token,
            format!("expected a statement, but got \"{}\"", describe(&token)),
          ));
        }
      };

      match tail {
        None => head = Some(statement),
        Some(prev) => self.ast.node_mut(prev).next = Some(statement),
      }
      tail = Some(statement);
    }

    Ok(head)
  }

  /// Declaration := TypeKeyword Identifier '=' Number ';'
  ///
  /// The type keyword was already consumed by the caller and is discarded:
  /// it is required syntactically but carries no meaning in the tree. The
  /// declaration fuses with its initializer into one Assignment node.
  fn declaration(&mut self) -> CompileResult<NodeId> {
    let ident = self.expect(TokenKind::Identifier, "an identifier")?;
    self.expect(TokenKind::Assign, "\"=\"")?;
    let value = self.expect(TokenKind::Number, "a numeric initializer")?;
    self.expect(TokenKind::Semicolon, "\";\"")?;

    self.declare_local(&ident.text);
    let initializer = self.ast.push(NodeKind::Literal, value.text);
    let statement = self.ast.push(NodeKind::Assignment, ident.text);
    self.ast.node_mut(statement).left = Some(initializer);
    Ok(statement)
  }

  /// PrintCall := 'yapper' '(' ( Literal (',' Literal)* )? ')' ';'
  ///
  /// Arguments form a `next`-linked chain of Literal nodes anchored at the
  /// call's `left`. With `multi_arg_print` disabled a comma is a syntax
  /// error, so at most one argument is accepted.
  fn print_call(&mut self, callee: Token) -> CompileResult<NodeId> {
    self.expect(TokenKind::LParen, "\"(\"")?;

    let mut head = None;
    let mut tail: Option<NodeId> = None;
    loop {
      let token = self.advance()?;
      if token.kind == TokenKind::RParen {
        break;
      }
      if !matches!(
        token.kind,
        TokenKind::Str | TokenKind::Number | TokenKind::Identifier
      ) {
        return Err(self.error_at(
          &token,
          format!("expected a literal argument, but got \"{}\"", describe(&token)),
        ));
      }

      let arg = self.ast.push(NodeKind::Literal, token.text);
      match tail {
        None => head = Some(arg),
        Some(prev) => self.ast.node_mut(prev).next = Some(arg),
      }
      tail = Some(arg);

      let separator = self.advance()?;
      if separator.kind == TokenKind::RParen {
        break;
      }
      if separator.kind != TokenKind::Comma {
        return Err(self.error_at(
          &separator,
          format!("expected \",\" or \")\", but got \"{}\"", describe(&separator)),
        ));
      }
      if !self.options.multi_arg_print {
        return Err(self.error_at(&separator, "print calls accept a single argument"));
      }
    }

    self.expect(TokenKind::Semicolon, "\";\"")?;

    let call = self.ast.push(NodeKind::FunctionCall, callee.text);
    self.ast.node_mut(call).left = head;
    Ok(call)
  }

  /// Give `name` its own 8-byte frame slot; re-declaring reuses the slot.
  fn declare_local(&mut self, name: &str) {
    if self.locals.iter().any(|local| local.name == name) {
      return;
    }
    let offset = (self.locals.len() as i64 + 1) * 8;
    self.locals.push(Local {
      name: name.to_string(),
      offset,
    });
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(source: &str) -> CompileResult<Program> {
    let mut lexer = Lexer::new(source);
    parse_program(&mut lexer, &Options::default())
  }

  fn parse_single_arg(source: &str) -> CompileResult<Program> {
    let mut lexer = Lexer::new(source);
    let options = Options {
      multi_arg_print: false,
      ..Options::default()
    };
    parse_program(&mut lexer, &options)
  }

  fn first_statement(program: &Program) -> &Node {
    let root = program.ast.node(program.root);
    program.ast.node(root.left.expect("non-empty body"))
  }

  #[test]
  fn declarations_become_assignment_nodes() {
    for keyword in ["gyat", "grimace", "rizz", "yap", "caseoh"] {
      let source = format!("toiletskibidi main() {{ {keyword} id = 7; }}");
      let program = parse(&source).expect("valid program");

      let statement = first_statement(&program);
      assert_eq!(statement.kind, NodeKind::Assignment);
      assert_eq!(statement.value, "id");
      assert!(statement.next.is_none());

      let initializer = program.ast.node(statement.left.expect("initializer"));
      assert_eq!(initializer.kind, NodeKind::Literal);
      assert_eq!(initializer.value, "7");
    }
  }

  #[test]
  fn initializer_must_be_a_digit_run() {
    for init in ["y", "", "\"text\"", "1 2"] {
      let source = format!("toiletskibidi main() {{ gyat x = {init}; }}");
      let err = parse(&source).unwrap_err();
      assert!(
        matches!(err, CompileError::Syntax { .. }),
        "initializer {init:?}: {err}"
      );
    }
  }

  #[test]
  fn float_initializers_are_rejected() {
    // "1.5" lexes as Number '.' Number; the '.' is not even a valid token.
    let err = parse("toiletskibidi main() { grimace f = 1.5; }").unwrap_err();
    assert!(matches!(err, CompileError::Lexical { .. }));
  }

  #[test]
  fn entry_point_must_be_named_main() {
    let err = parse("toiletskibidi start() { }").unwrap_err();
    assert!(err.to_string().contains("must be named \"main\""));
  }

  #[test]
  fn program_header_is_required() {
    for source in ["", "gyat main() { }", "toiletskibidi main( {", "toiletskibidi main"] {
      let err = parse(source).unwrap_err();
      assert!(matches!(err, CompileError::Syntax { .. }), "source {source:?}");
    }
  }

  #[test]
  fn missing_semicolon_names_the_expected_token() {
    let err = parse("toiletskibidi main() { gyat x = 1 }").unwrap_err();
    assert!(err.to_string().contains("expected \";\""));

    let err = parse("toiletskibidi main() { yapper(\"hi\") }").unwrap_err();
    assert!(err.to_string().contains("expected \";\""));
  }

  #[test]
  fn body_may_be_empty() {
    let program = parse("toiletskibidi main() { }").expect("empty body");
    assert!(program.ast.node(program.root).left.is_none());
    assert!(program.locals.is_empty());
    assert_eq!(program.stack_size, 0);
  }

  #[test]
  fn missing_closing_brace_is_tolerated() {
    let program = parse("toiletskibidi main() { gyat x = 1;").expect("open body");
    assert_eq!(first_statement(&program).value, "x");
  }

  #[test]
  fn statements_chain_in_source_order() {
    let program = parse(
      "toiletskibidi main() {\n  gyat x = 1;\n  yapper(\"hi\");\n  gyat y = 2;\n}",
    )
    .expect("valid program");

    let first = first_statement(&program);
    assert_eq!(first.kind, NodeKind::Assignment);
    let second = program.ast.node(first.next.expect("second statement"));
    assert_eq!(second.kind, NodeKind::FunctionCall);
    let third = program.ast.node(second.next.expect("third statement"));
    assert_eq!(third.kind, NodeKind::Assignment);
    assert_eq!(third.value, "y");
    assert!(third.next.is_none());
  }

  #[test]
  fn print_arguments_form_a_sibling_chain() {
    let program =
      parse("toiletskibidi main() { yapper(\"hi\", 42, x); }").expect("valid program");

    let call = first_statement(&program);
    assert_eq!(call.kind, NodeKind::FunctionCall);
    assert_eq!(call.value, "yapper");

    let first = program.ast.node(call.left.expect("arguments"));
    assert_eq!(first.value, "hi");
    let second = program.ast.node(first.next.expect("second argument"));
    assert_eq!(second.value, "42");
    let third = program.ast.node(second.next.expect("third argument"));
    assert_eq!(third.value, "x");
    assert!(third.next.is_none());
  }

  #[test]
  fn print_call_may_have_no_arguments() {
    let program = parse("toiletskibidi main() { yapper(); }").expect("valid program");
    assert!(first_statement(&program).left.is_none());
  }

  #[test]
  fn only_yapper_is_a_recognized_callee() {
    let err = parse("toiletskibidi main() { shout(\"hi\"); }").unwrap_err();
    assert!(err.to_string().contains("expected a statement"));
  }

  #[test]
  fn single_arg_mode_rejects_commas() {
    let err =
      parse_single_arg("toiletskibidi main() { yapper(\"a\", \"b\"); }").unwrap_err();
    assert!(err.to_string().contains("single argument"));

    let program =
      parse_single_arg("toiletskibidi main() { yapper(\"a\"); }").expect("one argument");
    assert!(first_statement(&program).left.is_some());
  }

  #[test]
  fn each_name_gets_its_own_slot() {
    let program = parse(
      "toiletskibidi main() { gyat x = 1; caseoh y = 2; yap z = 3; }",
    )
    .expect("valid program");

    assert_eq!(program.local_offset("x"), Some(8));
    assert_eq!(program.local_offset("y"), Some(16));
    assert_eq!(program.local_offset("z"), Some(24));
    assert_eq!(program.local_offset("w"), None);
    assert_eq!(program.stack_size, 32); // 24 rounded up to 16-byte alignment
  }

  #[test]
  fn redeclaring_a_name_reuses_its_slot() {
    let program =
      parse("toiletskibidi main() { gyat x = 1; gyat x = 2; }").expect("valid program");
    assert_eq!(program.locals.len(), 1);
    assert_eq!(program.local_offset("x"), Some(8));
    assert_eq!(program.stack_size, 16);
  }
}
