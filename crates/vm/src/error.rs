//! Faults and their classification.
//!
//! Instruction handlers raise a [`Fault`]. The dispatch loop is the only
//! place that turns a fault into a [`VmError`]: it classifies the fault
//! into an [`ErrorKind`] and attaches the 1-based line number and the
//! original text of the offending line. Parse and verification errors are
//! classified into the same type so callers only ever see [`VmError`].

use stackvm_assembler::{split_lines, ParseError};
use stackvm_common::{ArrayError, Program, ValueKind};
use stackvm_verifier::VerifyError;
use thiserror::Error;

/// An internal fault raised while executing one instruction.
#[derive(Debug, Error)]
pub enum Fault {
    /// Pop from an empty stack.
    #[error("pop from empty stack")]
    StackUnderflow,

    /// Load or free of a name with no binding.
    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),

    /// Array index or element kind fault.
    #[error(transparent)]
    Array(#[from] ArrayError),

    /// The program counter left the instruction sequence.
    #[error("program counter {pc} is outside the program")]
    ProgramCounterOutOfRange { pc: i64 },

    /// An instruction reached the machine without its operand.
    #[error("{opcode} requires an operand")]
    MissingOperand { opcode: &'static str },

    /// An array instruction named a variable that does not hold an array.
    #[error("variable '{name}' holds a {found}, not an array")]
    NotAnArray { name: String, found: ValueKind },

    /// An operation was applied to values it does not support.
    #[error("cannot {op} {lhs} and {rhs}")]
    TypeMismatch {
        op: &'static str,
        lhs: ValueKind,
        rhs: ValueKind,
    },

    /// An array index that is not a whole number.
    #[error("invalid array index {0}")]
    InvalidIndex(String),

    /// An array length that is not a non-negative whole number.
    #[error("invalid array length {0}")]
    InvalidLength(f64),

    /// An integer operand that is not finite or does not fit in 64 bits.
    #[error("invalid integer operand {0}")]
    InvalidInteger(f64),

    /// A value with no character interpretation.
    #[error("invalid character code {0}")]
    InvalidCharacter(String),

    /// Writing to the output sink failed.
    #[error("output failed: {0}")]
    Output(#[from] std::io::Error),
}

impl Fault {
    /// Map this fault onto the reported error taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Fault::StackUnderflow => ErrorKind::StackUnderflow,
            Fault::UndefinedVariable(_) => ErrorKind::UndefinedVariable,
            Fault::Array(ArrayError::IndexOutOfRange { .. }) => ErrorKind::IndexOutOfRange,
            Fault::Array(ArrayError::MismatchedType { .. }) => ErrorKind::MismatchedArrayType,
            Fault::Array(ArrayError::TooLarge { .. }) => ErrorKind::UnknownError,
            Fault::ProgramCounterOutOfRange { .. } => ErrorKind::ProgramCounterOutOfRange,
            Fault::MissingOperand { .. } => ErrorKind::MissingOperand,
            Fault::NotAnArray { .. }
            | Fault::TypeMismatch { .. }
            | Fault::InvalidIndex(_)
            | Fault::InvalidLength(_)
            | Fault::InvalidInteger(_)
            | Fault::InvalidCharacter(_)
            | Fault::Output(_) => ErrorKind::UnknownError,
        }
    }
}

/// The closed set of externally reported error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ErrorKind {
    #[error("stack underflow")]
    StackUnderflow,
    #[error("missing operand")]
    MissingOperand,
    #[error("undefined opcode")]
    UndefinedOpcode,
    #[error("mismatched array type")]
    MismatchedArrayType,
    #[error("undefined variable")]
    UndefinedVariable,
    #[error("index out of range")]
    IndexOutOfRange,
    #[error("program counter out of range")]
    ProgramCounterOutOfRange,
    #[error("unknown error")]
    UnknownError,
}

/// When an error was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// While parsing the program text.
    Parse,
    /// During the pre-run check.
    Verify,
    /// While executing.
    Execute,
}

/// A classified, terminal error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at line {line}: {code}")]
pub struct VmError {
    /// Reported category.
    pub kind: ErrorKind,
    /// 1-based line number of the offending instruction.
    pub line: usize,
    /// Original text of the offending line, comments included. Empty when
    /// the line does not exist.
    pub code: String,
    /// Description of the underlying fault.
    pub message: String,
    /// When the error was detected.
    pub stage: Stage,
}

impl VmError {
    /// Classify a fault raised while the program counter was at `pc`.
    pub fn from_fault(fault: &Fault, pc: i64, program: &Program) -> Self {
        let code = usize::try_from(pc)
            .ok()
            .and_then(|index| program.source_line(index))
            .unwrap_or_default()
            .to_string();
        Self {
            kind: fault.kind(),
            line: usize::try_from(pc + 1).unwrap_or(0),
            code,
            message: fault.to_string(),
            stage: Stage::Execute,
        }
    }

    /// Classify a parse error against the text it came from.
    pub fn from_parse(err: &ParseError, text: &str) -> Self {
        let kind = match err {
            ParseError::UndefinedOpcode { .. } => ErrorKind::UndefinedOpcode,
            ParseError::InvalidNumber { .. } => ErrorKind::UnknownError,
        };
        let code = split_lines(text)
            .get(err.line() - 1)
            .copied()
            .unwrap_or_default()
            .to_string();
        Self {
            kind,
            line: err.line(),
            code,
            message: err.to_string(),
            stage: Stage::Parse,
        }
    }

    /// Classify a verification error.
    pub fn from_verify(err: &VerifyError, program: &Program) -> Self {
        let kind = match err {
            VerifyError::MissingOperand { .. } => ErrorKind::MissingOperand,
        };
        Self {
            kind,
            line: err.line(),
            code: program
                .source_line(err.line() - 1)
                .unwrap_or_default()
                .to_string(),
            message: err.to_string(),
            stage: Stage::Verify,
        }
    }

    /// True for errors found before any instruction ran.
    pub fn is_static(&self) -> bool {
        self.stage != Stage::Execute
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackvm_common::{ElementKind, Instruction, Opcode};

    fn program() -> Program {
        stackvm_assembler::assemble("push_int 1 # one\nadd\nexit\n").unwrap()
    }

    #[test]
    fn fault_classification() {
        assert_eq!(Fault::StackUnderflow.kind(), ErrorKind::StackUnderflow);
        assert_eq!(
            Fault::UndefinedVariable("x".into()).kind(),
            ErrorKind::UndefinedVariable
        );
        assert_eq!(
            Fault::from(ArrayError::IndexOutOfRange {
                index: 3,
                length: 1
            })
            .kind(),
            ErrorKind::IndexOutOfRange
        );
        assert_eq!(
            Fault::from(ArrayError::MismatchedType {
                expected: ElementKind::Integer,
                found: ValueKind::Float
            })
            .kind(),
            ErrorKind::MismatchedArrayType
        );
        assert_eq!(
            Fault::ProgramCounterOutOfRange { pc: 9 }.kind(),
            ErrorKind::ProgramCounterOutOfRange
        );
        assert_eq!(
            Fault::MissingOperand { opcode: "jump" }.kind(),
            ErrorKind::MissingOperand
        );
    }

    #[test]
    fn unlisted_faults_are_unknown() {
        let faults = [
            Fault::TypeMismatch {
                op: "add",
                lhs: ValueKind::Array,
                rhs: ValueKind::Integer,
            },
            Fault::InvalidIndex("0.5".into()),
            Fault::InvalidLength(-1.0),
            Fault::InvalidInteger(f64::NAN),
            Fault::from(ArrayError::TooLarge { length: 1 << 40 }),
            Fault::InvalidCharacter("-3".into()),
            Fault::NotAnArray {
                name: "x".into(),
                found: ValueKind::Integer,
            },
        ];
        for fault in &faults {
            assert_eq!(fault.kind(), ErrorKind::UnknownError, "{fault}");
        }
    }

    #[test]
    fn fault_reports_line_and_source() {
        let err = VmError::from_fault(&Fault::StackUnderflow, 1, &program());
        assert_eq!(err.kind, ErrorKind::StackUnderflow);
        assert_eq!(err.line, 2);
        assert_eq!(err.code, "add");
        assert_eq!(err.to_string(), "stack underflow at line 2: add");
        assert!(!err.is_static());
    }

    #[test]
    fn source_keeps_comments() {
        let err = VmError::from_fault(&Fault::StackUnderflow, 0, &program());
        assert_eq!(err.code, "push_int 1 # one");
    }

    #[test]
    fn pc_past_end_has_no_source() {
        let err = VmError::from_fault(&Fault::ProgramCounterOutOfRange { pc: 3 }, 3, &program());
        assert_eq!(err.line, 4);
        assert_eq!(err.code, "");
    }

    #[test]
    fn negative_pc_clamps_line() {
        let err = VmError::from_fault(&Fault::ProgramCounterOutOfRange { pc: -1 }, -1, &program());
        assert_eq!(err.line, 0);
        assert_eq!(err.code, "");
    }

    #[test]
    fn parse_errors_are_static() {
        let text = "push_int 1\nhalt now\n";
        let parse_err = stackvm_assembler::assemble(text).unwrap_err();
        let err = VmError::from_parse(&parse_err, text);
        assert_eq!(err.kind, ErrorKind::UndefinedOpcode);
        assert_eq!(err.line, 2);
        assert_eq!(err.code, "halt now");
        assert!(err.is_static());
    }

    #[test]
    fn invalid_number_is_unknown() {
        let text = "push_int seven\n";
        let parse_err = stackvm_assembler::assemble(text).unwrap_err();
        let err = VmError::from_parse(&parse_err, text);
        assert_eq!(err.kind, ErrorKind::UnknownError);
        assert_eq!(err.message, "line 1: invalid number 'seven'");
    }

    #[test]
    fn verify_errors_are_missing_operand() {
        let program = Program::new(vec![Instruction::bare(Opcode::Call)]);
        let verify_err = VerifyError::MissingOperand {
            line: 1,
            opcode: "call",
        };
        let err = VmError::from_verify(&verify_err, &program);
        assert_eq!(err.kind, ErrorKind::MissingOperand);
        assert_eq!(err.code, "call");
        assert_eq!(err.stage, Stage::Verify);
    }
}
