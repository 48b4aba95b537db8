//! Integration tests for the stackvm assembler.
//!
//! Tests cover:
//! - Line numbering across comments and blank lines
//! - Operand decoding per opcode kind
//! - Error cases (unknown opcode, unparseable number)
//! - Every opcode round-trips through disassemble → assemble

use stackvm_assembler::{assemble, disassemble, split_lines, ParseError};
use stackvm_common::opcode::ALL_OPCODES;
use stackvm_common::{Instruction, Opcode, OperandKind, Operand};

// ---- Test helpers ----

/// Assemble, disassemble and assemble again; the instructions must match.
fn assert_roundtrip(text: &str) {
    let first = assemble(text).expect("first assemble");
    let canonical = disassemble(&first);
    let second = assemble(&canonical).expect("second assemble");
    assert_eq!(first.instructions, second.instructions, "canonical:\n{canonical}");
}

/// A sample source line for each opcode.
fn sample_line(opcode: Opcode) -> String {
    match opcode.operand_kind() {
        OperandKind::None => opcode.mnemonic().to_string(),
        OperandKind::Number => format!("{} 2.5", opcode.mnemonic()),
        OperandKind::Target => format!("{} 12", opcode.mnemonic()),
        OperandKind::Name => format!("{} counter", opcode.mnemonic()),
    }
}

// ---- Programs ----

#[test]
fn assemble_arithmetic_program() {
    let program = assemble("push_int 3\npush_int 4\nadd\nprint\nexit\n").unwrap();
    assert_eq!(
        program.instructions,
        vec![
            Instruction::with_number(Opcode::PushInt, 3.0),
            Instruction::with_number(Opcode::PushInt, 4.0),
            Instruction::bare(Opcode::Add),
            Instruction::bare(Opcode::Print),
            Instruction::bare(Opcode::Exit),
        ]
    );
}

#[test]
fn assemble_without_trailing_newline() {
    let program = assemble("push_int 1\nexit").unwrap();
    assert_eq!(program.len(), 2);
}

#[test]
fn assemble_crlf_text() {
    let program = assemble("push_int 1\r\nprint\r\nexit\r\n").unwrap();
    assert_eq!(program.len(), 3);
    assert_eq!(program.source_line(1), Some("print"));
}

#[test]
fn empty_text_is_empty_program() {
    assert!(assemble("").unwrap().is_empty());
}

#[test]
fn every_line_is_an_instruction() {
    let text = "\
# counter
push_int 0

store_global n   # start
exit
";
    let program = assemble(text).unwrap();
    assert_eq!(program.len(), 5);
    assert_eq!(program.instructions[0].opcode, Opcode::Nop);
    assert_eq!(program.instructions[2].opcode, Opcode::Nop);
    assert_eq!(
        program.instructions[3],
        Instruction::with_name(Opcode::StoreGlobal, "n")
    );
}

#[test]
fn source_text_is_kept_verbatim() {
    let program = assemble("  push_int 1   # one\nexit\n").unwrap();
    assert_eq!(program.source_line(0), Some("  push_int 1   # one"));
    assert_eq!(program.source_line(2), None);
}

#[test]
fn split_lines_matches_instruction_count() {
    let text = "a\n\nb\n";
    assert_eq!(split_lines(text), vec!["a", "", "b"]);
}

// ---- Operands ----

#[test]
fn numeric_operands_accept_any_decimal() {
    let program = assemble("push_float -0.125\npush_int 1e3\npush_char 65\n").unwrap();
    assert_eq!(program.instructions[0].number(), Some(-0.125));
    assert_eq!(program.instructions[1].number(), Some(1000.0));
    assert_eq!(program.instructions[2].number(), Some(65.0));
}

#[test]
fn names_may_look_like_numbers() {
    let program = assemble("store_local 7\n").unwrap();
    assert_eq!(program.instructions[0].name(), Some("7"));
}

#[test]
fn targets_are_numbers() {
    let program = assemble("jump 3\ncall 1\nif_less 2\n").unwrap();
    for instr in &program.instructions {
        assert!(instr.number().is_some(), "{instr}");
    }
}

#[test]
fn missing_operand_is_not_a_parse_error() {
    let program = assemble("push_int\njump\n").unwrap();
    assert!(program.instructions[0].operands.is_empty());
    assert!(program.instructions[1].operands.is_empty());
}

#[test]
fn extra_operands_are_kept() {
    let program = assemble("add 1 2\n").unwrap();
    assert_eq!(
        program.instructions[0].operands,
        vec![Operand::Number(1.0), Operand::Number(2.0)]
    );
}

// ---- Errors ----

#[test]
fn unknown_opcode() {
    let err = assemble("push_int 1\nfrobnicate\n").unwrap_err();
    assert_eq!(
        err,
        ParseError::UndefinedOpcode {
            line: 2,
            token: "frobnicate".into()
        }
    );
}

#[test]
fn opcodes_are_case_sensitive() {
    let err = assemble("PRINT\n").unwrap_err();
    assert!(matches!(err, ParseError::UndefinedOpcode { line: 1, .. }));
}

#[test]
fn number_in_opcode_position() {
    let err = assemble("exit\n42\n").unwrap_err();
    assert_eq!(err.line(), 2);
    assert!(matches!(err, ParseError::UndefinedOpcode { .. }));
}

#[test]
fn invalid_number_operand() {
    let err = assemble("push_int three\n").unwrap_err();
    assert_eq!(
        err,
        ParseError::InvalidNumber {
            line: 1,
            token: "three".into()
        }
    );
}

#[test]
fn invalid_target_operand() {
    let err = assemble("exit\nexit\njump start\n").unwrap_err();
    assert!(matches!(err, ParseError::InvalidNumber { line: 3, .. }));
}

#[test]
fn first_error_wins() {
    let err = assemble("bogus\npush_int x\n").unwrap_err();
    assert_eq!(err.line(), 1);
}

#[test]
fn error_messages() {
    assert_eq!(
        assemble("nope\n").unwrap_err().to_string(),
        "line 1: undefined opcode 'nope'"
    );
    assert_eq!(
        assemble("new_array_int big\n").unwrap_err().to_string(),
        "line 1: invalid number 'big'"
    );
}

// ---- Disassembly ----

#[test]
fn disassemble_strips_comments_and_spacing() {
    let program = assemble("push_int    3.0   # three\n\n  print\nexit # done\n").unwrap();
    assert_eq!(disassemble(&program), "push_int 3\n\nprint\nexit\n");
}

#[test]
fn every_opcode_roundtrips() {
    for opcode in ALL_OPCODES {
        assert_roundtrip(&sample_line(opcode));
    }
}

#[test]
fn whole_program_roundtrips() {
    let text = "\
new_array_char 3
store_global s
push_char 104
push_int 0
store_global_array s   # s[0] = 'h'
push_int 0
load_global_array s
print_char

call 12
exit
push_float 0.1
print
exit
";
    assert_roundtrip(text);
}

#[test]
fn canonical_text_is_stable() {
    let program = assemble("push_float   0.50\nif_equal 7.0\n").unwrap();
    let canonical = disassemble(&program);
    assert_eq!(canonical, "push_float 0.5\nif_equal 7\n");
    assert_eq!(disassemble(&assemble(&canonical).unwrap()), canonical);
}
