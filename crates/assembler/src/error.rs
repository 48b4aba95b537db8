//! Error types for the stackvm parser.

use thiserror::Error;

/// Errors produced while parsing program text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// An unrecognized opcode mnemonic was encountered.
    #[error("line {line}: undefined opcode '{token}'")]
    UndefinedOpcode { line: usize, token: String },

    /// A token where a numeric literal was expected could not be parsed.
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },
}

impl ParseError {
    /// The 1-based line the error was found on.
    pub fn line(&self) -> usize {
        match self {
            ParseError::UndefinedOpcode { line, .. } | ParseError::InvalidNumber { line, .. } => {
                *line
            }
        }
    }
}
