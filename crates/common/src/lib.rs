//! stackvm common types.
//!
//! This crate provides the foundational data structures shared by the
//! assembler, verifier and virtual machine:
//!
//! - [`Opcode`]: the closed instruction set, decoded once at parse time
//! - [`Instruction`] / [`Operand`]: one decoded program line
//! - [`Program`]: the instruction sequence plus its source text
//! - [`Value`]: runtime values (integer, float, character, array)
//! - [`Array`]: fixed-size homogeneous arrays
//! - [`ArrayError`]: faults raised by array accesses

pub mod array;
pub mod error;
pub mod instruction;
pub mod opcode;
pub mod program;
pub mod value;

// Re-export commonly used types at the crate root.
pub use array::Array;
pub use error::ArrayError;
pub use instruction::{Instruction, Operand};
pub use opcode::{Opcode, OperandKind};
pub use program::Program;
pub use value::{ElementKind, Number, Value, ValueKind};
