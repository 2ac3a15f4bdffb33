//! Crate root: wires together the compilation pipeline.
//!
//! `brainrotc` compiles a restricted, C-like toy language whose keywords
//! are internet slang (`toiletskibidi` is `void`, `gyat` is `int`, `yapper`
//! is `printf`) into x86-64 NASM assembly for bare Linux.
//!
//! The stages are intentionally small and composable so they can be evolved
//! independently:
//! - `tokenizer` performs lexical analysis and produces a lazy token stream.
//! - `parser` owns all syntactic knowledge and returns an arena-backed AST
//!   plus the frame layout for the single entry function.
//! - `codegen` lowers the parsed program into NASM x86-64 assembly.
//! - `cli` is the file-handling driver used by the binary.
//! - `error` centralises reporting utilities shared by the other modules.

pub mod cli;
pub mod error;
pub mod parser;
pub mod tokenizer;

mod codegen;

pub use error::{CompileError, CompileResult};

/// Pipeline knobs.
#[derive(Debug, Clone)]
pub struct Options {
  /// Accept comma-separated argument lists in `yapper` calls. When off, a
  /// comma in an argument list is a syntax error.
  pub multi_arg_print: bool,
  /// Source bytes beyond this ceiling are dropped before tokenization; the
  /// pipeline then compiles the truncated prefix as if it were the whole
  /// program.
  pub max_source_len: usize,
}

impl Default for Options {
  fn default() -> Self {
    Self {
      multi_arg_print: true,
      max_source_len: 64 * 1024,
    }
  }
}

/// Compile a source string into NASM assembly with default options.
pub fn compile(source: &str) -> CompileResult<String> {
  compile_with_options(source, &Options::default())
}

/// Compile a source string into NASM assembly.
pub fn compile_with_options(source: &str, options: &Options) -> CompileResult<String> {
  let mut lexer = tokenizer::Lexer::new(source);
  let program = parser::parse_program(&mut lexer, options)?;
  codegen::generate(&program)
}
