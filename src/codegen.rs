//! Code generation: lower the AST into NASM-syntax x86-64 assembly.
//!
//! The emitter performs one pre-order walk over the arena (`left`, then
//! `right`, then the `next` chain) and never revisits a node. Instructions
//! accumulate in a text buffer while print calls intern their literals into
//! the string table; the final output is assembled afterwards as the data
//! section followed by the text section, so every `message<i>` label
//! referenced by a write sequence is defined.
//!
//! The target is bare Linux: output is meant for `nasm -f elf64` + `ld`,
//! with a `_start` entry that talks to the kernel through `write` and
//! `exit` syscalls directly.

use crate::error::{CompileError, CompileResult};
use crate::parser::{NodeId, NodeKind, Program};

/// Ordered registry of distinct string literals. Each text is assigned a
/// stable 0-based index at first use and emitted as a `message<index>`
/// label; repeated texts share one entry.
#[derive(Debug, Default)]
struct StringTable {
  entries: Vec<String>,
}

impl StringTable {
  fn intern(&mut self, text: &str) -> usize {
    if let Some(index) = self.entries.iter().position(|entry| entry == text) {
      return index;
    }
    self.entries.push(text.to_string());
    self.entries.len() - 1
  }
}

/// Emit assembly for a parsed program.
pub fn generate(program: &Program) -> CompileResult<String> {
  let mut text = String::new();
  let mut strings = StringTable::default();
  emit_node(program, program.root, &mut text, &mut strings)?;

  let mut asm = String::new();
  asm.push_str("section .data\n");
  for (index, entry) in strings.entries.iter().enumerate() {
    asm.push_str(&format!("    message{index} db \"{entry}\", 0\n"));
  }
  asm.push('\n');
  asm.push_str("section .text\n");
  asm.push_str("global _start\n\n");
  asm.push_str(&text);
  Ok(asm)
}

/// Pre-order walk: emit this node, then its `next` sibling. Child relations
/// are handled inside the per-kind arms.
fn emit_node(
  program: &Program,
  id: NodeId,
  asm: &mut String,
  strings: &mut StringTable,
) -> CompileResult<()> {
  let node = program.ast.node(id);

  match node.kind {
    NodeKind::Program => {
      asm.push_str("_start:\n");
      asm.push_str("    push rbp\n");
      asm.push_str("    mov rbp, rsp\n");
      if program.stack_size > 0 {
        asm.push_str(&format!("    sub rsp, {}\n", program.stack_size));
      }

      if let Some(body) = node.left {
        emit_node(program, body, asm, strings)?;
      }

      // Exactly one exit sequence, after every statement.
      asm.push_str("    mov rax, 60\n");
      asm.push_str("    xor rdi, rdi\n");
      asm.push_str("    syscall\n");
    }

    NodeKind::Assignment => {
      let initializer = node.left.ok_or_else(|| CompileError::Internal {
        message: format!("assignment to \"{}\" has no initializer", node.value),
      })?;
      let offset = program
        .local_offset(&node.value)
        .ok_or_else(|| CompileError::Internal {
          message: format!("\"{}\" has no stack slot", node.value),
        })?;
      let value = &program.ast.node(initializer).value;
      asm.push_str(&format!("    mov rax, {value}\n"));
      asm.push_str(&format!("    mov [rbp-{offset}], rax\n"));
    }

    NodeKind::FunctionCall => {
      // Only the first collected argument of a yapper call is printed;
      // the rest of the chain is parsed but never emitted.
      if node.value == "yapper"
        && let Some(argument) = node.left
      {
        let text = &program.ast.node(argument).value;
        let index = strings.intern(text);
        asm.push_str("    mov rax, 1\n");
        asm.push_str("    mov rdi, 1\n");
        asm.push_str(&format!("    mov rsi, message{index}\n"));
        asm.push_str(&format!("    mov rdx, {}\n", text.len()));
        asm.push_str("    syscall\n");
      }
    }

    NodeKind::IfStatement => {
      // No grammar rule produces this node yet; the emission logic exists
      // for the day `beta`/`sigma` grow parser support.
      if let Some(condition) = node.left {
        emit_node(program, condition, asm, strings)?;
      }
      asm.push_str("    cmp rax, 0\n");
      asm.push_str(&format!("    je else_{}\n", node.value));
      if let Some(body) = node.right {
        emit_node(program, body, asm, strings)?;
      }
      asm.push_str(&format!("else_{}:\n", node.value));
    }

    kind => {
      return Err(CompileError::UnsupportedNode {
        kind: kind.name().to_string(),
      });
    }
  }

  if let Some(next) = node.next {
    emit_node(program, next, asm, strings)?;
  }
  Ok(())
}
