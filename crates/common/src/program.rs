//! Program representation.
//!
//! A program is a sequence of instructions, one per source line, together
//! with the source text of each line for error reporting.

use crate::instruction::Instruction;

/// A parsed program: instruction `i` came from source line `i + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// The instruction stream.
    pub instructions: Vec<Instruction>,
    source: Vec<String>,
}

impl Program {
    /// Create a program from instructions alone. The source text of each
    /// line is the instruction's canonical form.
    pub fn new(instructions: Vec<Instruction>) -> Self {
        let source = instructions.iter().map(ToString::to_string).collect();
        Self {
            instructions,
            source,
        }
    }

    /// Create a program with the original text of every line.
    ///
    /// Lines without a matching instruction are dropped; instructions
    /// without a matching line fall back to their canonical form.
    pub fn with_source(instructions: Vec<Instruction>, source: Vec<String>) -> Self {
        let mut source = source;
        source.truncate(instructions.len());
        for instr in &instructions[source.len()..] {
            source.push(instr.to_string());
        }
        Self {
            instructions,
            source,
        }
    }

    /// Instruction at a 0-based index.
    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// Source text of the line holding the instruction at a 0-based index.
    pub fn source_line(&self, index: usize) -> Option<&str> {
        self.source.get(index).map(String::as_str)
    }

    /// Number of instructions in the program.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
