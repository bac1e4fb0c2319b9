//! Bounded Buffer Type
//!
//! Heap-backed buffer whose capacity is fixed at construction. Every slot is
//! initialised up front, writes and reads are validated against the capacity,
//! and bulk copies truncate instead of overflowing.

use super::{c_strlen, BufferError, BufferResult};
use std::collections::TryReserveError;

/// Memory-safe buffer with a fixed capacity
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundedBuffer<T> {
    data: Vec<T>,
}

impl<T: Clone + Default> BoundedBuffer<T> {
    /// Create a buffer of `capacity` slots, each set to `T::default()`
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![T::default(); capacity],
        }
    }

    /// Create a buffer of `capacity` slots, reporting allocator failure
    /// instead of aborting
    pub fn try_new(capacity: usize) -> Result<Self, TryReserveError> {
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)?;
        data.resize(capacity, T::default());
        Ok(Self { data })
    }
}

impl<T> BoundedBuffer<T> {
    /// Get the capacity of the buffer
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer has no slots at all
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the buffer as a slice
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get a mutable view of the slots; the length stays fixed
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Validate `index` against `[0, capacity)`
    pub fn check_index(&self, index: i64) -> BufferResult<usize> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.data.len())
            .ok_or(BufferError::IndexOutOfRange {
                index,
                capacity: self.data.len(),
            })
    }

    /// Get the slot at an index
    pub fn get(&self, index: i64) -> BufferResult<&T> {
        let i = self.check_index(index)?;
        Ok(&self.data[i])
    }

    /// Set the slot at an index; no write happens when the index is rejected
    pub fn write(&mut self, index: i64, value: T) -> BufferResult<()> {
        let i = self.check_index(index)?;
        self.data[i] = value;
        Ok(())
    }
}

impl<T: Clone> BoundedBuffer<T> {
    /// Copy at most `capacity` elements of `src` from slot 0. Slots past the
    /// copied prefix keep their current value. Returns the number of source
    /// elements dropped.
    pub fn copy_from(&mut self, src: &[T]) -> usize {
        let n = src.len().min(self.data.len());
        self.data[..n].clone_from_slice(&src[..n]);
        src.len() - n
    }
}

impl BoundedBuffer<u8> {
    /// Copy text in `strncpy(dst, src, capacity - 1)` fashion and terminate it.
    ///
    /// At most `capacity - 1` bytes of `src` (up to its first NUL) are copied,
    /// a NUL is written right after them and every later slot is zeroed.
    /// Returns the number of source bytes dropped.
    pub fn copy_terminated(&mut self, src: &[u8]) -> usize {
        let len = c_strlen(src);
        let Some(limit) = self.data.len().checked_sub(1) else {
            return len;
        };
        let n = len.min(limit);
        self.data[..n].copy_from_slice(&src[..n]);
        self.data[n..].fill(0);
        len - n
    }

    /// Bytes up to the first NUL
    pub fn c_str(&self) -> &[u8] {
        &self.data[..c_strlen(&self.data)]
    }

    /// Contents up to the first NUL as text
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(self.c_str()).into_owned()
    }
}

impl<T> AsRef<[T]> for BoundedBuffer<T> {
    fn as_ref(&self) -> &[T] {
        &self.data
    }
}

impl<T> std::ops::Deref for BoundedBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_buffer_creation() {
        let buf: BoundedBuffer<i32> = BoundedBuffer::new(5);
        assert_eq!(buf.capacity(), 5);
        assert_eq!(buf.as_slice(), &[0, 0, 0, 0, 0]);

        let buf: BoundedBuffer<u8> = BoundedBuffer::try_new(10).unwrap();
        assert_eq!(buf.capacity(), 10);
        assert!(buf.c_str().is_empty());
    }

    #[test]
    fn test_write_rejects_out_of_range() {
        let mut buf: BoundedBuffer<i32> = BoundedBuffer::new(2);
        assert!(buf.write(1, 42).is_ok());
        assert_eq!(
            buf.write(2, 42),
            Err(BufferError::IndexOutOfRange {
                index: 2,
                capacity: 2
            })
        );
        assert!(buf.write(-1, 42).is_err());
        assert_eq!(buf.as_slice(), &[0, 42]);
    }

    #[test]
    fn test_copy_from_truncates() {
        let mut buf: BoundedBuffer<i32> = BoundedBuffer::new(5);
        assert_eq!(buf.copy_from(&[1, 2, 3, 4, 5, 6]), 1);
        assert_eq!(buf.as_slice(), &[1, 2, 3, 4, 5]);

        let mut buf: BoundedBuffer<i32> = BoundedBuffer::new(5);
        assert_eq!(buf.copy_from(&[1, 2, 3]), 0);
        assert_eq!(buf.as_slice(), &[1, 2, 3, 0, 0]);
    }

    #[test]
    fn test_copy_terminated() {
        let mut buf: BoundedBuffer<u8> = BoundedBuffer::new(10);
        assert_eq!(buf.copy_terminated(b"SafeInput"), 0);
        assert_eq!(buf.c_str(), b"SafeInput");
        assert_eq!(buf[9], 0);

        assert_eq!(buf.copy_terminated(b"ThisIsAVeryLongInputThatWillOverflow"), 27);
        assert_eq!(buf.to_string_lossy(), "ThisIsAVe");
        assert_eq!(buf[9], 0);

        // A shorter copy leaves nothing of the previous contents behind
        buf.copy_terminated(b"abc");
        assert_eq!(&buf[..], b"abc\0\0\0\0\0\0\0");
    }

    #[test]
    fn test_copy_terminated_zero_capacity() {
        let mut buf: BoundedBuffer<u8> = BoundedBuffer::new(0);
        assert_eq!(buf.copy_terminated(b"abc"), 3);
        assert!(buf.is_empty());
    }
}
