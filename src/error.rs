//! Buffer error types.

use thiserror::Error;

/// Errors that can occur while positioning a buffer.
///
/// Reads and writes have no recoverable failure mode: running out of data is
/// reported through [`ReadOutcome`](crate::buffer::ReadOutcome), and running out of
/// memory aborts the process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("Seek out of range: cannot set offset to {offset}, requires 0 <= offset <= {length}")]
    OutOfRange { offset: i128, length: usize },

    #[error("Invalid seek origin: {0}")]
    InvalidOrigin(i32),
}

impl From<BufferError> for std::io::Error {
    fn from(err: BufferError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err)
    }
}

/// Result type for buffer operations.
pub type BufferResult<T> = Result<T, BufferError>;
