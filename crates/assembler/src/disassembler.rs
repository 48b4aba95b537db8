//! Disassembler: parsed program → canonical program text.
//!
//! Output is flat text, one instruction per line. Comments are gone, runs
//! of whitespace collapse to one space and numbers print in their shortest
//! form. Blank lines stay blank so line targets keep pointing at the same
//! instructions.

use stackvm_common::Program;

/// Disassemble a program into canonical text.
///
/// Parsing the output yields a program with the same instructions.
pub fn disassemble(program: &Program) -> String {
    let mut text = String::new();
    for instr in &program.instructions {
        text.push_str(&instr.to_string());
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackvm_common::{Instruction, Opcode};

    #[test]
    fn one_line_per_instruction() {
        let program = Program::new(vec![
            Instruction::with_number(Opcode::PushInt, 3.0),
            Instruction::with_number(Opcode::PushFloat, 0.5),
            Instruction::bare(Opcode::Add),
            Instruction::bare(Opcode::Nop),
            Instruction::with_name(Opcode::StoreGlobal, "total"),
            Instruction::bare(Opcode::Exit),
        ]);
        assert_eq!(
            disassemble(&program),
            "push_int 3\npush_float 0.5\nadd\n\nstore_global total\nexit\n"
        );
    }

    #[test]
    fn empty_program() {
        assert_eq!(disassemble(&Program::new(vec![])), "");
    }
}
