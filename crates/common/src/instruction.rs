//! Decoded instructions.
//!
//! One instruction per program line:
//! ```text
//! opcode [operand ...]
//! ```
//! Operands are numbers (constants, lengths, line targets) or names,
//! depending on the opcode's [`OperandKind`](crate::OperandKind).

use std::fmt;

use crate::opcode::Opcode;

/// A single instruction argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A numeric literal, always held as `f64`.
    Number(f64),
    /// A variable name.
    Name(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Number(n) => write!(f, "{n}"),
            Operand::Name(name) => f.write_str(name),
        }
    }
}

/// A single decoded instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// The operation to perform.
    pub opcode: Opcode,
    /// Arguments in source order. Only the first is read by the machine.
    pub operands: Vec<Operand>,
}

impl Instruction {
    pub fn new(opcode: Opcode, operands: Vec<Operand>) -> Self {
        Self { opcode, operands }
    }

    /// An instruction with no operands.
    pub fn bare(opcode: Opcode) -> Self {
        Self::new(opcode, Vec::new())
    }

    /// An instruction with a single numeric operand.
    pub fn with_number(opcode: Opcode, value: f64) -> Self {
        Self::new(opcode, vec![Operand::Number(value)])
    }

    /// An instruction with a single name operand.
    pub fn with_name(opcode: Opcode, name: impl Into<String>) -> Self {
        Self::new(opcode, vec![Operand::Name(name.into())])
    }

    /// The first operand as a number, if it is one.
    pub fn number(&self) -> Option<f64> {
        match self.operands.first()? {
            Operand::Number(n) => Some(*n),
            Operand::Name(_) => None,
        }
    }

    /// The first operand as a name, if it is one.
    pub fn name(&self) -> Option<&str> {
        match self.operands.first()? {
            Operand::Name(name) => Some(name),
            Operand::Number(_) => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.opcode.mnemonic())?;
        for operand in &self.operands {
            write!(f, " {operand}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_operand() {
        let instr = Instruction::with_number(Opcode::PushInt, 3.0);
        assert_eq!(instr.number(), Some(3.0));
        assert_eq!(instr.name(), None);
    }

    #[test]
    fn name_operand() {
        let instr = Instruction::with_name(Opcode::StoreGlobal, "x");
        assert_eq!(instr.name(), Some("x"));
        assert_eq!(instr.number(), None);
    }

    #[test]
    fn bare_has_no_operands() {
        let instr = Instruction::bare(Opcode::Add);
        assert!(instr.operands.is_empty());
        assert_eq!(instr.number(), None);
        assert_eq!(instr.name(), None);
    }

    #[test]
    fn only_first_operand_is_read() {
        let instr = Instruction::new(
            Opcode::Jump,
            vec![Operand::Number(4.0), Operand::Number(9.0)],
        );
        assert_eq!(instr.number(), Some(4.0));
    }

    #[test]
    fn display() {
        assert_eq!(Instruction::with_number(Opcode::PushInt, 3.0).to_string(), "push_int 3");
        assert_eq!(
            Instruction::with_number(Opcode::PushFloat, 2.5).to_string(),
            "push_float 2.5"
        );
        assert_eq!(
            Instruction::with_name(Opcode::LoadLocal, "count").to_string(),
            "load_local count"
        );
        assert_eq!(Instruction::bare(Opcode::Print).to_string(), "print");
        assert_eq!(Instruction::bare(Opcode::Nop).to_string(), "");
    }
}
