//! Parser for stackvm tokens → instructions.
//!
//! Dispatches on the opcode's operand kind to decide how operand tokens are
//! read. Operand presence is not checked here; that is the verifier's job.

use crate::error::ParseError;
use crate::lexer::Token;
use stackvm_common::{Instruction, Opcode, Operand, OperandKind};

/// Parse the tokens of a single line into an instruction.
///
/// An empty token list (blank or comment-only line) yields [`Opcode::Nop`].
pub(crate) fn parse_line(tokens: &[Token<'_>], line_num: usize) -> Result<Instruction, ParseError> {
    let Some((first, args)) = tokens.split_first() else {
        return Ok(Instruction::bare(Opcode::Nop));
    };

    let mnemonic = first.text();
    let opcode = Opcode::from_mnemonic(mnemonic)
        .filter(|op| *op != Opcode::Nop)
        .ok_or_else(|| ParseError::UndefinedOpcode {
            line: line_num,
            token: mnemonic.to_string(),
        })?;

    let operands = match opcode.operand_kind() {
        OperandKind::Number | OperandKind::Target => args
            .iter()
            .map(|tok| expect_number(tok, line_num))
            .collect::<Result<Vec<_>, _>>()?,
        OperandKind::Name => args
            .iter()
            .map(|tok| Operand::Name(tok.text().to_string()))
            .collect(),
        // Operands on operand-less opcodes are kept but never read.
        OperandKind::None => args.iter().map(loose_operand).collect(),
    };

    Ok(Instruction::new(opcode, operands))
}

/// Read a token that must be a numeric literal.
fn expect_number(token: &Token<'_>, line: usize) -> Result<Operand, ParseError> {
    match token {
        Token::Number { value, .. } => Ok(Operand::Number(*value)),
        Token::Word(word) => Err(ParseError::InvalidNumber {
            line,
            token: word.to_string(),
        }),
    }
}

fn loose_operand(token: &Token<'_>) -> Operand {
    match token {
        Token::Number { value, .. } => Operand::Number(*value),
        Token::Word(word) => Operand::Name(word.to_string()),
    }
}
