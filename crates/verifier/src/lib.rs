//! stackvm verifier: static checks run once before execution.
//!
//! The verifier checks a `Program` BEFORE any instruction runs, so a
//! malformed program fails without producing output. It collects ALL errors
//! (not just the first) and returns them in line order.
//!
//! # Usage
//!
//! ```
//! use stackvm_common::{Instruction, Opcode, Program};
//! use stackvm_verifier::verify;
//!
//! let program = Program::new(vec![
//!     Instruction::with_number(Opcode::PushInt, 42.0),
//!     Instruction::bare(Opcode::Print),
//!     Instruction::bare(Opcode::Exit),
//! ]);
//!
//! assert!(verify(&program).is_ok());
//! ```
//!
//! # Passes
//!
//! 1. **Structural**: operand-requiring opcodes carry an operand

pub mod error;
pub mod structural;

pub use error::VerifyError;

use stackvm_common::Program;
use tracing::debug;

/// Verify a program.
///
/// Returns `Ok(())` if the program passes all checks, or
/// `Err(Vec<VerifyError>)` with all errors found.
pub fn verify(program: &Program) -> Result<(), Vec<VerifyError>> {
    let errors = structural::check_operands(&program.instructions);

    debug!(
        instructions = program.len(),
        errors = errors.len(),
        "program verified"
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
