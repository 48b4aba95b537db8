//! Operand presence pass.
//!
//! Every opcode whose operand kind is not `None` must carry at least one
//! operand. The machine reads only the first one.

use crate::error::VerifyError;
use stackvm_common::Instruction;

/// Check that every operand-requiring instruction has an operand.
///
/// Returns one error per offending instruction, in program order.
pub fn check_operands(instrs: &[Instruction]) -> Vec<VerifyError> {
    instrs
        .iter()
        .enumerate()
        .filter(|(_, instr)| instr.opcode.requires_operand() && instr.operands.is_empty())
        .map(|(pc, instr)| VerifyError::MissingOperand {
            line: pc + 1,
            opcode: instr.opcode.mnemonic(),
        })
        .collect()
}
