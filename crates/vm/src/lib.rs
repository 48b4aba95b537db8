//! stackvm virtual machine: executes line-oriented stackvm programs.
//!
//! The VM is a stack-based machine with:
//! - A data stack for operands and results
//! - A global address space shared by every call frame
//! - A local address space per call frame, swapped out on `call`
//! - A return stack of saved program counters
//!
//! # Usage
//!
//! ```
//! use stackvm_vm::{run_with, Config};
//!
//! let mut out = Vec::new();
//! run_with("push_int 3\npush_int 4\nadd\nprint\nexit\n", &Config::new(), &mut out).unwrap();
//! assert_eq!(out, b"7\n");
//! ```

pub mod address_space;
pub mod error;
pub mod execute;
pub mod machine;
pub mod stack;

pub use address_space::AddressSpace;
pub use error::{ErrorKind, Fault, Stage, VmError};
pub use machine::{Config, Report, VM};
pub use stack::Stack;

use std::io::{self, Write};

use stackvm_common::Program;

/// Parse and check program text without running it.
///
/// # Errors
///
/// Returns the first parse error, or the first missing operand found by the
/// pre-run check.
pub fn load(text: &str) -> Result<Program, VmError> {
    let program =
        stackvm_assembler::assemble(text).map_err(|err| VmError::from_parse(&err, text))?;
    if let Err(errors) = stackvm_verifier::verify(&program) {
        if let Some(first) = errors.first() {
            return Err(VmError::from_verify(first, &program));
        }
    }
    Ok(program)
}

/// Run program text with output to stdout.
///
/// This is the primary entry point for the VM. It:
/// 1. Parses the text into instructions
/// 2. Checks every instruction for its required operand
/// 3. Executes until top-level `exit`
///
/// # Errors
///
/// Returns a classified [`VmError`] carrying the line number and source
/// text of the offending line.
pub fn run(text: &str) -> Result<(), VmError> {
    run_with(text, &Config::new(), &mut io::stdout().lock()).map(|_| ())
}

/// Run program text with an explicit configuration and output sink.
pub fn run_with<W: Write>(text: &str, config: &Config, out: &mut W) -> Result<Report, VmError> {
    let program = load(text)?;
    let mut vm = VM::new(&program, *config, out);
    vm.execute()
}
