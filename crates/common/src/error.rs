//! Errors raised by the shared value model.

use thiserror::Error;

use crate::value::{ElementKind, ValueKind};

/// Errors raised by [`Array`](crate::Array) accesses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArrayError {
    /// Index outside `[0, length)`.
    #[error("array index {index} out of range (length {length})")]
    IndexOutOfRange { index: i64, length: usize },

    /// Stored value's kind differs from the array's element kind.
    #[error("cannot store {found} in {expected} array")]
    MismatchedType {
        expected: ElementKind,
        found: ValueKind,
    },

    /// Requested length exceeds the array limit or available memory.
    #[error("array length {length} is too large")]
    TooLarge { length: usize },
}
