//! Name-keyed variable storage.
//!
//! One address space holds the globals for the whole run; another holds the
//! locals of the current call frame and is swapped out wholesale on `call`
//! and back in on `exit`.

use std::collections::HashMap;

use crate::error::Fault;
use stackvm_common::Value;

/// A table of variable bindings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressSpace {
    bindings: HashMap<String, Value>,
}

impl AddressSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`, replacing any previous binding.
    pub fn store(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// The value bound to `name`.
    pub fn load(&self, name: &str) -> Result<&Value, Fault> {
        self.bindings
            .get(name)
            .ok_or_else(|| Fault::UndefinedVariable(name.to_string()))
    }

    /// Mutable access to the value bound to `name`, for in-place array stores.
    pub fn load_mut(&mut self, name: &str) -> Result<&mut Value, Fault> {
        self.bindings
            .get_mut(name)
            .ok_or_else(|| Fault::UndefinedVariable(name.to_string()))
    }

    /// Remove the binding for `name` and return its value.
    ///
    /// Freeing an unbound name is an `UndefinedVariable` fault, the same as
    /// loading one.
    pub fn free(&mut self, name: &str) -> Result<Value, Fault> {
        self.bindings
            .remove(name)
            .ok_or_else(|| Fault::UndefinedVariable(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
