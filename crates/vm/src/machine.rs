//! VM state: stacks, address spaces, program counter, output sink.

use std::io::Write;
use std::time::Duration;

use crate::address_space::AddressSpace;
use crate::error::Fault;
use crate::stack::Stack;
use stackvm_common::{Instruction, Program, Value};

/// Run configuration, scoped to one VM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    /// Measure wall-clock time from the first instruction to top-level exit.
    pub timing: bool,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timing(mut self, timing: bool) -> Self {
        self.timing = timing;
        self
    }
}

/// Summary of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    /// Instructions dispatched, the final `exit` included.
    pub steps: u64,
    /// Elapsed time, present only when timing was enabled.
    pub elapsed: Option<Duration>,
}

/// Which address space a variable instruction addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    Global,
    Local,
}

/// The stackvm virtual machine.
pub struct VM<'a, W: Write> {
    /// The program being executed.
    pub(crate) program: &'a Program,
    pub(crate) config: Config,
    /// Destination of `print` and `print_char`.
    pub(crate) out: W,
    /// Data stack.
    pub(crate) stack: Stack<Value>,
    /// Program counters saved by `call`.
    pub(crate) return_stack: Stack<i64>,
    /// Local address spaces saved by `call`.
    pub(crate) frames: Stack<AddressSpace>,
    pub(crate) locals: AddressSpace,
    pub(crate) globals: AddressSpace,
    /// Index of the current instruction. Starts at -1 so the first
    /// increment lands on instruction 0.
    pub(crate) pc: i64,
    pub(crate) steps: u64,
}

impl<'a, W: Write> VM<'a, W> {
    /// Create a VM for `program`, writing output to `out`.
    pub fn new(program: &'a Program, config: Config, out: W) -> Self {
        Self {
            program,
            config,
            out,
            stack: Stack::new(),
            return_stack: Stack::new(),
            frames: Stack::new(),
            locals: AddressSpace::new(),
            globals: AddressSpace::new(),
            pc: -1,
            steps: 0,
        }
    }

    /// The global address space.
    pub fn globals(&self) -> &AddressSpace {
        &self.globals
    }

    /// The local address space of the current frame.
    pub fn locals(&self) -> &AddressSpace {
        &self.locals
    }

    /// Number of values on the data stack.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Consume the VM and return its output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    pub(crate) fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    pub(crate) fn pop(&mut self) -> Result<Value, Fault> {
        self.stack.pop()
    }

    /// Fetch the instruction at the current pc.
    pub(crate) fn fetch(&self) -> Result<&'a Instruction, Fault> {
        let program = self.program;
        usize::try_from(self.pc)
            .ok()
            .and_then(|index| program.get(index))
            .ok_or(Fault::ProgramCounterOutOfRange { pc: self.pc })
    }

    pub(crate) fn space(&self, scope: Scope) -> &AddressSpace {
        match scope {
            Scope::Global => &self.globals,
            Scope::Local => &self.locals,
        }
    }

    pub(crate) fn space_mut(&mut self, scope: Scope) -> &mut AddressSpace {
        match scope {
            Scope::Global => &mut self.globals,
            Scope::Local => &mut self.locals,
        }
    }

    /// Set the pc so the next increment lands on 1-based line `target`.
    pub(crate) fn branch_to(&mut self, target: i64) {
        self.pc = target.saturating_sub(2);
    }
}

/// The numeric operand of `instr`.
pub(crate) fn number_operand(instr: &Instruction) -> Result<f64, Fault> {
    instr.number().ok_or(Fault::MissingOperand {
        opcode: instr.opcode.mnemonic(),
    })
}

/// The variable-name operand of `instr`.
pub(crate) fn name_operand(instr: &Instruction) -> Result<&str, Fault> {
    instr.name().ok_or(Fault::MissingOperand {
        opcode: instr.opcode.mnemonic(),
    })
}

/// The numeric operand of `instr` truncated toward zero. Non-finite values
/// and values outside the `i64` range are rejected.
pub(crate) fn integer_operand(instr: &Instruction) -> Result<i64, Fault> {
    let n = number_operand(instr)?;
    // i64::MIN is exact as f64; i64::MAX rounds up to 2^63.
    if n.is_finite() && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        Ok(n.trunc() as i64)
    } else {
        Err(Fault::InvalidInteger(n))
    }
}

/// The 1-based line-number operand of `instr`, truncated toward zero.
pub(crate) fn target_operand(instr: &Instruction) -> Result<i64, Fault> {
    integer_operand(instr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackvm_common::Opcode;

    #[test]
    fn config_builder() {
        assert!(!Config::new().timing);
        assert!(Config::new().with_timing(true).timing);
    }

    #[test]
    fn fetch_before_start_is_out_of_range() {
        let program = Program::new(vec![Instruction::bare(Opcode::Exit)]);
        let vm = VM::new(&program, Config::new(), Vec::new());
        assert!(matches!(
            vm.fetch(),
            Err(Fault::ProgramCounterOutOfRange { pc: -1 })
        ));
    }

    #[test]
    fn branch_lands_before_target() {
        let program = Program::new(vec![]);
        let mut vm = VM::new(&program, Config::new(), Vec::new());
        vm.branch_to(5);
        assert_eq!(vm.pc + 1, 4);
    }

    #[test]
    fn operands() {
        let jump = Instruction::with_number(Opcode::Jump, 3.9);
        assert_eq!(target_operand(&jump).unwrap(), 3);
        let load = Instruction::with_name(Opcode::LoadGlobal, "x");
        assert_eq!(name_operand(&load).unwrap(), "x");
        assert!(matches!(
            number_operand(&Instruction::bare(Opcode::PushInt)),
            Err(Fault::MissingOperand { opcode: "push_int" })
        ));
    }

    #[test]
    fn integer_operands_must_fit() {
        let push = |n: f64| Instruction::with_number(Opcode::PushInt, n);
        assert_eq!(integer_operand(&push(-2.9)).unwrap(), -2);
        assert_eq!(integer_operand(&push(i64::MIN as f64)).unwrap(), i64::MIN);
        let rejected = [
            f64::NAN,
            f64::INFINITY,
            f64::NEG_INFINITY,
            1e30,
            -1e30,
            9.223372036854775807e18,
        ];
        for bad in rejected {
            assert!(
                matches!(integer_operand(&push(bad)), Err(Fault::InvalidInteger(_))),
                "{bad} should be rejected"
            );
        }
        assert!(matches!(
            target_operand(&Instruction::with_number(Opcode::Jump, f64::NAN)),
            Err(Fault::InvalidInteger(_))
        ));
    }
}
