//! Buffer storage for the demonstrations
//!
//! Two storage shapes are contrasted here:
//!
//! - [`Frame`]: a fixed-size array followed by an adjacent spill region, written
//!   through raw pointers with no capacity check. Used by the unsafe variants.
//! - [`BoundedBuffer`]: a heap-backed container whose capacity is fixed at
//!   construction and whose every write and read is validated. Used by the
//!   safe variants.

pub mod bounded;
pub mod frame;

pub use bounded::BoundedBuffer;
pub use frame::{Frame, BYTE_CANARY, INT_CANARY, SPILL_SLOTS};

use thiserror::Error;

/// Buffer errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("index {index} is outside [0, {capacity})")]
    IndexOutOfRange { index: i64, capacity: usize },

    #[error("write of {requested} slot(s) would escape the demonstration frame (reach {reach})")]
    ReachExceeded { requested: usize, reach: usize },
}

/// Result type for buffer operations.
pub type BufferResult<T> = Result<T, BufferError>;

/// Integer buffer capacity used by the scalar-index demonstrations.
pub const INT_CAPACITY: usize = 2;

/// Text buffer capacity used by the string-copy demonstrations.
pub const STRING_CAPACITY: usize = 10;

/// Array buffer capacity used by the array-copy demonstrations.
pub const ARRAY_CAPACITY: usize = 5;

/// Sequence capacity used by the read demonstrations.
pub const READ_CAPACITY: usize = 100;

/// Length of `bytes` up to (not including) the first NUL, or the whole slice
/// when it holds none.
pub fn c_strlen(bytes: &[u8]) -> usize {
    bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len())
}
