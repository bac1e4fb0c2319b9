//! Size-checked, scoped heap allocation
//!
//! The buffer lives in a [`ScopedAllocation`] guard owned by the operation.
//! Whichever way the operation ends, the guard is dropped before it returns
//! and the memory goes back to the allocator.

use super::{Contents, OpError, OpKind, OpResult, Outcome, Variant};
use crate::buffer::BoundedBuffer;
use std::cell::Cell;

thread_local! {
    static LIVE: Cell<usize> = const { Cell::new(0) };
}

/// Number of scoped allocations currently alive on this thread.
pub fn live_allocations() -> usize {
    LIVE.with(|live| live.get())
}

/// Heap buffer tied to the scope that acquired it.
pub struct ScopedAllocation {
    buffer: BoundedBuffer<i32>,
}

impl ScopedAllocation {
    /// Acquire `elements` zeroed slots, reporting allocator failure as an error.
    pub fn acquire(elements: usize) -> OpResult<Self> {
        let buffer = BoundedBuffer::try_new(elements).map_err(|e| OpError::Allocation {
            requested: elements,
            reason: e.to_string(),
        })?;
        LIVE.with(|live| live.set(live.get() + 1));
        log::debug!("acquired {} element(s)", elements);
        Ok(Self { buffer })
    }

    pub fn buffer(&self) -> &BoundedBuffer<i32> {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut BoundedBuffer<i32> {
        &mut self.buffer
    }
}

impl Drop for ScopedAllocation {
    fn drop(&mut self) {
        LIVE.with(|live| live.set(live.get().saturating_sub(1)));
        log::debug!("released {} element(s)", self.buffer.capacity());
    }
}

/// Value stored in slot `index`, saturating at `i32::MAX`.
fn index_value(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}

/// Allocate `size` elements if `0 <= size <= ceiling`, fill them with their
/// own index and report a checksum.
pub fn scoped_allocation(size: i64, ceiling: usize) -> OpResult<Outcome> {
    let reject = |reason: String| {
        Outcome::rejected(
            OpKind::Alloc,
            Variant::Safe,
            format!("Rejected allocation of {} element(s): {}.", size, reason),
        )
    };

    let Ok(elements) = usize::try_from(size) else {
        return Ok(reject("size must be non-negative".to_string()));
    };
    if elements > ceiling {
        return Ok(reject(format!(
            "exceeds the limit of {} element(s)",
            ceiling
        )));
    }

    let mut scope = ScopedAllocation::acquire(elements)?;
    for (i, slot) in scope.buffer_mut().as_mut_slice().iter_mut().enumerate() {
        *slot = index_value(i);
    }
    let checksum: i64 = scope.buffer().iter().map(|&v| v as i64).sum();

    Ok(Outcome::new(
        OpKind::Alloc,
        Variant::Safe,
        Contents::Allocation { elements, checksum },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_succeeds_and_releases() {
        let outcome = scoped_allocation(1024, 1 << 20).unwrap();
        assert_eq!(
            outcome.contents,
            Contents::Allocation {
                elements: 1024,
                checksum: 523_776
            }
        );
        assert_eq!(live_allocations(), 0);
    }

    #[test]
    fn test_negative_size_rejected() {
        let outcome = scoped_allocation(-1, 1 << 20).unwrap();
        assert_eq!(
            outcome.rejection.as_deref(),
            Some("Rejected allocation of -1 element(s): size must be non-negative.")
        );
        assert_eq!(live_allocations(), 0);
    }

    #[test]
    fn test_oversized_request_rejected() {
        let outcome = scoped_allocation(i64::MAX, 1 << 20).unwrap();
        assert!(outcome.is_rejected());
        assert_eq!(live_allocations(), 0);

        // Still usable afterwards
        assert!(!scoped_allocation(3, 1 << 20).unwrap().is_rejected());
    }

    #[test]
    fn test_allocator_failure_is_an_error() {
        let err = scoped_allocation(i64::MAX, usize::MAX).unwrap_err();
        assert!(matches!(err, OpError::Allocation { .. }));
        assert_eq!(live_allocations(), 0);
    }

    #[test]
    fn test_index_value_saturates() {
        assert_eq!(index_value(7), 7);
        assert_eq!(index_value(i32::MAX as usize), i32::MAX);
        assert_eq!(index_value(i32::MAX as usize + 1), i32::MAX);
        assert_eq!(index_value(usize::MAX), i32::MAX);
    }

    #[test]
    fn test_guard_counts_live_allocations() {
        let guard = ScopedAllocation::acquire(4).unwrap();
        assert_eq!(live_allocations(), 1);
        assert_eq!(guard.buffer().capacity(), 4);
        drop(guard);
        assert_eq!(live_allocations(), 0);
    }
}
