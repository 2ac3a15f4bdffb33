//! Driver glue: reads the source file, runs the pipeline, writes the
//! assembly file.
//!
//! All file handling happens here so the pipeline itself stays pure
//! string-to-string. The output is built fully in memory and written in one
//! call, so a failed compile never leaves a half-written or open
//! destination behind.

use crate::error::{CompileError, CompileResult};
use crate::{Options, compile_with_options};
use std::fs;
use std::path::Path;

/// Compile `source_path` into assembly at `output_path`.
pub fn run(source_path: &Path, output_path: &Path, options: &Options) -> CompileResult<()> {
  let source = read_source(source_path, options)?;
  let asm = compile_with_options(&source, options)?;
  fs::write(output_path, asm).map_err(|source| CompileError::Io {
    path: output_path.to_path_buf(),
    source,
  })?;
  Ok(())
}

/// Read a source file, applying the configured size ceiling.
pub fn read_source(path: &Path, options: &Options) -> CompileResult<String> {
  let bytes = fs::read(path).map_err(|source| CompileError::Io {
    path: path.to_path_buf(),
    source,
  })?;
  Ok(bounded_source(&bytes, options.max_source_len))
}

/// Truncate `bytes` at `max_len` and decode the prefix. Everything past the
/// ceiling is dropped before tokenization; the pipeline then sees the
/// truncated text as the whole program. The language is ASCII, so the lossy
/// decode only matters for garbage input.
pub fn bounded_source(bytes: &[u8], max_len: usize) -> String {
  let cut = bytes.len().min(max_len);
  String::from_utf8_lossy(&bytes[..cut]).into_owned()
}
