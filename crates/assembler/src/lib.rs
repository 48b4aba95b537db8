//! stackvm assembler: program text ↔ decoded instructions.
//!
//! The parser is a mechanical line-by-line translation: line `n` of the
//! text becomes instruction `n - 1`, comments (`#` to end of line) are
//! dropped, and blank lines become no-ops so that line numbers used as
//! branch targets stay valid.
//!
//! # Usage
//!
//! ```
//! use stackvm_assembler::{assemble, disassemble};
//!
//! let text = "push_int 3\npush_int 4\nadd   # sum\nprint\nexit\n";
//! let program = assemble(text).unwrap();
//! assert_eq!(program.len(), 5);
//! assert_eq!(disassemble(&program), "push_int 3\npush_int 4\nadd\nprint\nexit\n");
//! ```

pub mod error;

mod disassembler;
mod lexer;
mod parser;

pub use error::ParseError;
pub use lexer::split_lines;

use lexer::tokenize_line;
use parser::parse_line;
use stackvm_common::Program;
use tracing::debug;

/// Parse program text into a [`Program`].
///
/// Returns the first error encountered. Missing operands are not reported
/// here; run the verifier on the result before executing it.
pub fn assemble(text: &str) -> Result<Program, ParseError> {
    let lines = split_lines(text);
    let mut instructions = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let tokens = tokenize_line(line);
        instructions.push(parse_line(&tokens, idx + 1)?);
    }

    debug!(lines = lines.len(), "program parsed");
    let source = lines.into_iter().map(str::to_string).collect();
    Ok(Program::with_source(instructions, source))
}

/// Disassemble a program into canonical text.
pub fn disassemble(program: &Program) -> String {
    disassembler::disassemble(program)
}
