use thiserror::Error;

use crate::fork_name::ForkName;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("Index {index} out of range for {field} of length {len}")]
    IndexOutOfRange {
        field: &'static str,
        index: u64,
        len: u64,
    },
    #[error("Field {field} is not present in the {fork} state schema")]
    SchemaMismatch {
        field: &'static str,
        fork: ForkName,
    },
    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Resolve ``index`` against a collection of length ``len``.
pub fn checked_index(field: &'static str, index: u64, len: usize) -> Result<usize, StateError> {
    if index < len as u64 {
        Ok(index as usize)
    } else {
        Err(StateError::IndexOutOfRange {
            field,
            index,
            len: len as u64,
        })
    }
}
