//! Verification errors for the stackvm verifier.
//!
//! Every error carries the 1-based line it was found on. The verifier
//! collects ALL errors, not just the first.

use thiserror::Error;

/// Errors found during static verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// An operand-requiring opcode was written without an operand.
    #[error("line {line}: {opcode} requires an operand")]
    MissingOperand { line: usize, opcode: &'static str },
}

impl VerifyError {
    /// The 1-based line the error was found on.
    pub fn line(&self) -> usize {
        match self {
            VerifyError::MissingOperand { line, .. } => *line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_operand() {
        let e = VerifyError::MissingOperand {
            line: 4,
            opcode: "jump",
        };
        assert_eq!(e.to_string(), "line 4: jump requires an operand");
        assert_eq!(e.line(), 4);
    }
}
