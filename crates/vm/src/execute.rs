//! Main execution loop and opcode dispatch for the stackvm VM.

use std::cmp::Ordering;
use std::io::Write;
use std::mem;
use std::time::Instant;

use crate::error::{Fault, VmError};
use crate::machine::{
    integer_operand, name_operand, number_operand, target_operand, Report, Scope, VM,
};
use stackvm_common::value::char_from_code;
use stackvm_common::{Array, ElementKind, Instruction, Number, Opcode, Value};
use tracing::{debug, info, trace};

/// What the loop does after an instruction completes.
enum Flow {
    Continue,
    Halt,
}

impl<'a, W: Write> VM<'a, W> {
    /// Execute the program until top-level `exit` or a fault.
    pub fn execute(&mut self) -> Result<Report, VmError> {
        debug!(instructions = self.program.len(), "run started");
        let started = self.config.timing.then(Instant::now);

        loop {
            match self.step() {
                Ok(Flow::Continue) => {}
                Ok(Flow::Halt) => {
                    let report = Report {
                        steps: self.steps,
                        elapsed: started.map(|at| at.elapsed()),
                    };
                    match report.elapsed {
                        Some(elapsed) => info!(
                            steps = report.steps,
                            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                            "run finished"
                        ),
                        None => info!(steps = report.steps, "run finished"),
                    }
                    return Ok(report);
                }
                Err(fault) => {
                    let err = VmError::from_fault(&fault, self.pc, self.program);
                    debug!(kind = ?err.kind, line = err.line, %fault, "run failed");
                    return Err(err);
                }
            }
        }
    }

    /// Advance the pc and execute one instruction.
    fn step(&mut self) -> Result<Flow, Fault> {
        self.pc += 1;
        let instr = self.fetch()?;
        self.steps += 1;
        trace!(line = self.pc + 1, opcode = %instr.opcode, "dispatch");

        match instr.opcode {
            // Constants
            Opcode::PushInt => {
                let n = integer_operand(instr)?;
                self.push(Value::Integer(n));
            }
            Opcode::PushFloat => {
                let n = number_operand(instr)?;
                self.push(Value::Float(n));
            }
            Opcode::PushChar => {
                let n = number_operand(instr)?;
                let c = char_from_code(n).ok_or_else(|| Fault::InvalidCharacter(n.to_string()))?;
                self.push(Value::Character(c));
            }

            // Arithmetic
            Opcode::Add => self.exec_arith("add", i64::wrapping_add, |a, b| a + b)?,
            Opcode::Sub => self.exec_arith("sub", i64::wrapping_sub, |a, b| a - b)?,
            Opcode::Mul => self.exec_arith("mul", i64::wrapping_mul, |a, b| a * b)?,
            Opcode::Div => self.exec_div()?,
            Opcode::Dup => {
                let x = self.pop()?;
                self.push(x.clone());
                self.push(x);
            }

            // Arrays
            Opcode::NewArrayInt => self.exec_new_array(instr, ElementKind::Integer)?,
            Opcode::NewArrayFloat => self.exec_new_array(instr, ElementKind::Float)?,
            Opcode::NewArrayChar => self.exec_new_array(instr, ElementKind::Character)?,
            Opcode::StoreGlobalArray => self.exec_store_array(instr, Scope::Global)?,
            Opcode::StoreLocalArray => self.exec_store_array(instr, Scope::Local)?,
            Opcode::LoadGlobalArray => self.exec_load_array(instr, Scope::Global)?,
            Opcode::LoadLocalArray => self.exec_load_array(instr, Scope::Local)?,

            // Variables
            Opcode::StoreGlobal => self.exec_store(instr, Scope::Global)?,
            Opcode::StoreLocal => self.exec_store(instr, Scope::Local)?,
            Opcode::LoadGlobal => self.exec_load(instr, Scope::Global)?,
            Opcode::LoadLocal => self.exec_load(instr, Scope::Local)?,
            Opcode::FreeGlobal => {
                self.space_mut(Scope::Global).free(name_operand(instr)?)?;
            }
            Opcode::FreeLocal => {
                self.space_mut(Scope::Local).free(name_operand(instr)?)?;
            }

            // Control flow
            Opcode::IfEqual => self.exec_branch_if(instr, Ordering::Equal)?,
            Opcode::IfGreater => self.exec_branch_if(instr, Ordering::Greater)?,
            Opcode::IfLess => self.exec_branch_if(instr, Ordering::Less)?,
            Opcode::Jump => {
                let target = target_operand(instr)?;
                self.branch_to(target);
            }
            Opcode::Call => self.exec_call(instr)?,
            Opcode::Exit => return self.exec_exit(),

            // Output
            Opcode::Print => {
                let value = self.pop()?;
                writeln!(self.out, "{value}")?;
                self.out.flush()?;
            }
            Opcode::PrintChar => {
                let value = self.pop()?;
                let c = value
                    .as_char()
                    .ok_or_else(|| Fault::InvalidCharacter(value.to_string()))?;
                write!(self.out, "{c}")?;
                self.out.flush()?;
            }

            Opcode::Nop => {}
        }

        Ok(Flow::Continue)
    }

    // ================================================================
    // Arithmetic
    // ================================================================

    /// Pop x then y and push `x <op> y`. Integer pairs stay integer; any
    /// float operand promotes the operation to float.
    fn exec_arith(
        &mut self,
        op: &'static str,
        int_op: fn(i64, i64) -> i64,
        float_op: fn(f64, f64) -> f64,
    ) -> Result<(), Fault> {
        let (x, y) = self.pop_numbers(op)?;
        let result = match (x, y) {
            (Number::Int(a), Number::Int(b)) => Value::Integer(int_op(a, b)),
            (a, b) => Value::Float(float_op(a.to_f64(), b.to_f64())),
        };
        self.push(result);
        Ok(())
    }

    /// True division. Always yields a float; a zero divisor gives an IEEE
    /// infinity or NaN.
    fn exec_div(&mut self) -> Result<(), Fault> {
        let (x, y) = self.pop_numbers("div")?;
        self.push(Value::Float(x.to_f64() / y.to_f64()));
        Ok(())
    }

    fn pop_numbers(&mut self, op: &'static str) -> Result<(Number, Number), Fault> {
        let x = self.pop()?;
        let y = self.pop()?;
        match (x.as_number(), y.as_number()) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(Fault::TypeMismatch {
                op,
                lhs: x.kind(),
                rhs: y.kind(),
            }),
        }
    }

    // ================================================================
    // Variables and arrays
    // ================================================================

    fn exec_store(&mut self, instr: &Instruction, scope: Scope) -> Result<(), Fault> {
        let name = name_operand(instr)?;
        let value = self.pop()?;
        self.space_mut(scope).store(name, value);
        Ok(())
    }

    fn exec_load(&mut self, instr: &Instruction, scope: Scope) -> Result<(), Fault> {
        let name = name_operand(instr)?;
        let value = self.space(scope).load(name)?.clone();
        self.push(value);
        Ok(())
    }

    fn exec_new_array(&mut self, instr: &Instruction, kind: ElementKind) -> Result<(), Fault> {
        let n = number_operand(instr)?;
        // usize::MAX rounds up to 2^64, so the bound is exclusive.
        if !n.is_finite() || n < 0.0 || n.fract() != 0.0 || n >= usize::MAX as f64 {
            return Err(Fault::InvalidLength(n));
        }
        let array = Array::try_new(kind, n as usize)?;
        self.push(Value::Array(array));
        Ok(())
    }

    /// Pop index, then value, and store the value into the named array.
    fn exec_store_array(&mut self, instr: &Instruction, scope: Scope) -> Result<(), Fault> {
        let name = name_operand(instr)?;
        let index = self.pop()?;
        let value = self.pop()?;
        let index = array_index(&index)?;
        match self.space_mut(scope).load_mut(name)? {
            Value::Array(array) => array.store(index, value)?,
            other => {
                return Err(Fault::NotAnArray {
                    name: name.to_string(),
                    found: other.kind(),
                })
            }
        }
        Ok(())
    }

    /// Pop index and push the element of the named array at that index.
    fn exec_load_array(&mut self, instr: &Instruction, scope: Scope) -> Result<(), Fault> {
        let name = name_operand(instr)?;
        let index = self.pop()?;
        let index = array_index(&index)?;
        let element = match self.space(scope).load(name)? {
            Value::Array(array) => array.load(index)?.clone(),
            other => {
                return Err(Fault::NotAnArray {
                    name: name.to_string(),
                    found: other.kind(),
                })
            }
        };
        self.push(element);
        Ok(())
    }

    // ================================================================
    // Control flow
    // ================================================================

    /// Pop x then y; branch when `x` relates to `y` as `wanted`.
    fn exec_branch_if(&mut self, instr: &Instruction, wanted: Ordering) -> Result<(), Fault> {
        let target = target_operand(instr)?;
        let x = self.pop()?;
        let y = self.pop()?;

        let taken = match (x.as_number(), y.as_number()) {
            (Some(a), Some(b)) => a.compare(b) == Some(wanted),
            _ if wanted == Ordering::Equal => x == y,
            _ => {
                return Err(Fault::TypeMismatch {
                    op: instr.opcode.mnemonic(),
                    lhs: x.kind(),
                    rhs: y.kind(),
                })
            }
        };

        if taken {
            self.branch_to(target);
        }
        Ok(())
    }

    fn exec_call(&mut self, instr: &Instruction) -> Result<(), Fault> {
        let target = target_operand(instr)?;
        self.frames.push(mem::take(&mut self.locals));
        self.return_stack.push(self.pc);
        debug!(
            depth = self.frames.len(),
            from = self.pc + 1,
            target,
            "call"
        );
        self.branch_to(target);
        Ok(())
    }

    /// Return from the current call, or halt at top level.
    fn exec_exit(&mut self) -> Result<Flow, Fault> {
        if self.return_stack.is_empty() {
            return Ok(Flow::Halt);
        }
        let return_pc = self.return_stack.pop()?;
        self.locals = self.frames.pop()?;
        debug!(
            depth = self.frames.len(),
            resume = return_pc + 2,
            "exit"
        );
        self.pc = return_pc;
        Ok(Flow::Continue)
    }
}

/// Convert a popped value to an array index. Negative whole numbers pass
/// through so the array reports them as out of range.
fn array_index(value: &Value) -> Result<i64, Fault> {
    value
        .as_whole()
        .ok_or_else(|| Fault::InvalidIndex(value.to_string()))
}
