//! Opcode definitions for the stackvm instruction set.
//!
//! Every mnemonic that may appear at the start of a program line maps to
//! exactly one [`Opcode`]. A blank line (after comment stripping) decodes to
//! [`Opcode::Nop`].

/// What kind of operand an opcode expects as its first argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandKind {
    /// No operand.
    None,
    /// A numeric literal (constant value or array length).
    Number,
    /// A variable name.
    Name,
    /// A 1-based line number used as a branch or call target.
    Target,
}

/// Identifies the operation to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Constants
    /// Push the operand as an Integer (truncated toward zero).
    PushInt,
    /// Push the operand as a Float.
    PushFloat,
    /// Push the operand as a Character (the operand is a code point).
    PushChar,

    // Arithmetic
    /// Pop x, pop y, push x + y.
    Add,
    /// Pop x, pop y, push x - y.
    Sub,
    /// Pop x, pop y, push x * y.
    Mul,
    /// Pop x, pop y, push x / y (true division, always Float).
    Div,
    /// Pop x, push x twice.
    Dup,

    // Arrays
    /// Push a fresh Integer array of the operand's length.
    NewArrayInt,
    /// Push a fresh Float array of the operand's length.
    NewArrayFloat,
    /// Push a fresh Character array of the operand's length.
    NewArrayChar,

    // Variables
    /// Pop a value and bind it in the global space.
    StoreGlobal,
    /// Pop a value and bind it in the local space.
    StoreLocal,
    /// Push the value bound in the global space.
    LoadGlobal,
    /// Push the value bound in the local space.
    LoadLocal,
    /// Remove a global binding.
    FreeGlobal,
    /// Remove a local binding.
    FreeLocal,
    /// Pop index, pop value, store into a global array.
    StoreGlobalArray,
    /// Pop index, pop value, store into a local array.
    StoreLocalArray,
    /// Pop index, push the element of a global array.
    LoadGlobalArray,
    /// Pop index, push the element of a local array.
    LoadLocalArray,

    // Control flow
    /// Pop x, pop y, branch if x == y.
    IfEqual,
    /// Pop x, pop y, branch if x > y.
    IfGreater,
    /// Pop x, pop y, branch if x < y.
    IfLess,
    /// Unconditional branch.
    Jump,
    /// Enter a subroutine with a fresh local space.
    Call,
    /// Return from a subroutine, or stop the program at top level.
    Exit,

    // Output
    /// Pop a value and print it followed by a newline.
    Print,
    /// Pop a value and print it as a single character.
    PrintChar,

    /// Blank line.
    Nop,
}

/// All opcodes, in definition order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 30] = [
    Opcode::PushInt,
    Opcode::PushFloat,
    Opcode::PushChar,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Div,
    Opcode::Dup,
    Opcode::NewArrayInt,
    Opcode::NewArrayFloat,
    Opcode::NewArrayChar,
    Opcode::StoreGlobal,
    Opcode::StoreLocal,
    Opcode::LoadGlobal,
    Opcode::LoadLocal,
    Opcode::FreeGlobal,
    Opcode::FreeLocal,
    Opcode::StoreGlobalArray,
    Opcode::StoreLocalArray,
    Opcode::LoadGlobalArray,
    Opcode::LoadLocalArray,
    Opcode::IfEqual,
    Opcode::IfGreater,
    Opcode::IfLess,
    Opcode::Jump,
    Opcode::Call,
    Opcode::Exit,
    Opcode::Print,
    Opcode::PrintChar,
    Opcode::Nop,
];

impl Opcode {
    /// Returns the textual mnemonic. [`Opcode::Nop`] has the empty mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::PushInt => "push_int",
            Opcode::PushFloat => "push_float",
            Opcode::PushChar => "push_char",
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Mul => "mul",
            Opcode::Div => "div",
            Opcode::Dup => "dup",
            Opcode::NewArrayInt => "new_array_int",
            Opcode::NewArrayFloat => "new_array_float",
            Opcode::NewArrayChar => "new_array_char",
            Opcode::StoreGlobal => "store_global",
            Opcode::StoreLocal => "store_local",
            Opcode::LoadGlobal => "load_global",
            Opcode::LoadLocal => "load_local",
            Opcode::FreeGlobal => "free_global",
            Opcode::FreeLocal => "free_local",
            Opcode::StoreGlobalArray => "store_global_array",
            Opcode::StoreLocalArray => "store_local_array",
            Opcode::LoadGlobalArray => "load_global_array",
            Opcode::LoadLocalArray => "load_local_array",
            Opcode::IfEqual => "if_equal",
            Opcode::IfGreater => "if_greater",
            Opcode::IfLess => "if_less",
            Opcode::Jump => "jump",
            Opcode::Call => "call",
            Opcode::Exit => "exit",
            Opcode::Print => "print",
            Opcode::PrintChar => "print_char",
            Opcode::Nop => "",
        }
    }

    /// Look up an opcode by mnemonic. The empty string yields [`Opcode::Nop`].
    pub fn from_mnemonic(mnemonic: &str) -> Option<Opcode> {
        ALL_OPCODES
            .iter()
            .find(|op| op.mnemonic() == mnemonic)
            .copied()
    }

    /// The kind of operand this opcode reads.
    pub fn operand_kind(self) -> OperandKind {
        match self {
            Opcode::PushInt
            | Opcode::PushFloat
            | Opcode::PushChar
            | Opcode::NewArrayInt
            | Opcode::NewArrayFloat
            | Opcode::NewArrayChar => OperandKind::Number,

            Opcode::StoreGlobal
            | Opcode::StoreLocal
            | Opcode::LoadGlobal
            | Opcode::LoadLocal
            | Opcode::FreeGlobal
            | Opcode::FreeLocal
            | Opcode::StoreGlobalArray
            | Opcode::StoreLocalArray
            | Opcode::LoadGlobalArray
            | Opcode::LoadLocalArray => OperandKind::Name,

            Opcode::IfEqual | Opcode::IfGreater | Opcode::IfLess | Opcode::Jump | Opcode::Call => {
                OperandKind::Target
            }

            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div
            | Opcode::Dup
            | Opcode::Exit
            | Opcode::Print
            | Opcode::PrintChar
            | Opcode::Nop => OperandKind::None,
        }
    }

    /// Returns true if a line using this opcode must carry an operand.
    pub fn requires_operand(self) -> bool {
        self.operand_kind() != OperandKind::None
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}
