//! Fixed-size, homogeneously typed arrays.

use std::fmt;

use crate::error::ArrayError;
use crate::value::{ElementKind, Value};

/// A fixed-length array whose elements all share one [`ElementKind`].
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    kind: ElementKind,
    elements: Vec<Value>,
}

/// Longest array a program may create.
pub const MAX_LEN: usize = 1 << 24;

impl Array {
    /// Create an array of `len` zero values of the given kind.
    ///
    /// # Panics
    ///
    /// Panics if the storage cannot be allocated. Use [`Array::try_new`] for
    /// lengths that come from program input.
    pub fn new(kind: ElementKind, len: usize) -> Self {
        Self {
            kind,
            elements: vec![kind.zero(); len],
        }
    }

    /// Create an array of `len` zero values, failing instead of aborting when
    /// `len` exceeds [`MAX_LEN`] or the storage cannot be allocated.
    pub fn try_new(kind: ElementKind, len: usize) -> Result<Self, ArrayError> {
        let too_large = ArrayError::TooLarge { length: len };
        if len > MAX_LEN {
            return Err(too_large);
        }
        let mut elements = Vec::new();
        elements.try_reserve_exact(len).map_err(|_| too_large)?;
        elements.resize(len, kind.zero());
        Ok(Self { kind, elements })
    }

    pub fn element_kind(&self) -> ElementKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Read the element at `index`.
    pub fn load(&self, index: i64) -> Result<&Value, ArrayError> {
        let slot = self.slot(index)?;
        Ok(&self.elements[slot])
    }

    /// Overwrite the element at `index`.
    ///
    /// The range check runs before the kind check, so an out-of-range index
    /// is reported as such whatever the value. On error the array is left
    /// untouched.
    pub fn store(&mut self, index: i64, value: Value) -> Result<(), ArrayError> {
        let slot = self.slot(index)?;
        if value.kind() != self.kind.value_kind() {
            return Err(ArrayError::MismatchedType {
                expected: self.kind,
                found: value.kind(),
            });
        }
        self.elements[slot] = value;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.elements.iter()
    }

    fn slot(&self, index: i64) -> Result<usize, ArrayError> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.elements.len())
            .ok_or(ArrayError::IndexOutOfRange {
                index,
                length: self.elements.len(),
            })
    }
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{element}")?;
        }
        f.write_str("]")
    }
}
