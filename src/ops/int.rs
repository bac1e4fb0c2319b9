//! Scalar-index writes into a two-slot integer buffer

use super::{Contents, OpKind, OpResult, Outcome, Variant};
use crate::buffer::{BoundedBuffer, Frame, INT_CANARY, INT_CAPACITY};

/// Write `value` at `index` of a two-slot frame with no capacity check.
///
/// Intentionally hazardous: any `index >= 2` overwrites the memory after the
/// buffer. Only the in-bounds slots are reported, so the overflow is invisible
/// in the main status line. The only refusal is an index that would leave the
/// frame entirely.
pub fn unsafe_write(value: i32, index: usize) -> OpResult<Outcome> {
    let mut frame: Frame<i32, INT_CAPACITY> = Frame::new(0, INT_CANARY);
    frame.ensure_reach(index.saturating_add(1))?;

    // SAFETY: index < reach was checked above; capacity was not.
    unsafe { frame.write_unchecked(index, value) };

    Ok(Outcome::new(
        OpKind::Int,
        Variant::Unsafe,
        Contents::Ints {
            values: frame.slots().to_vec(),
        },
    )
    .with_clobbered(frame.clobbered(INT_CANARY)))
}

/// Write `sentinel` at `index` only if `0 <= index < 2`.
pub fn safe_write(index: i64, sentinel: i32) -> Outcome {
    let mut buffer: BoundedBuffer<i32> = BoundedBuffer::new(INT_CAPACITY);
    match buffer.write(index, sentinel) {
        Ok(()) => Outcome::new(
            OpKind::Int,
            Variant::Safe,
            Contents::Ints {
                values: buffer.as_slice().to_vec(),
            },
        ),
        Err(_) => Outcome::rejected(OpKind::Int, Variant::Safe, "Invalid index."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{BufferError, SPILL_SLOTS};
    use crate::ops::OpError;

    #[test]
    fn test_unsafe_write_clobbers_adjacent_slot() {
        let outcome = unsafe_write(999, 3).unwrap();
        assert_eq!(
            outcome.contents,
            Contents::Ints {
                values: vec![0, 0]
            }
        );
        assert_eq!(outcome.clobbered, 1);
        assert_eq!(
            outcome.lines()[0],
            "[Unsafe Function Int] Buffer values: 0, 0"
        );
    }

    #[test]
    fn test_unsafe_write_in_bounds() {
        let outcome = unsafe_write(7, 0).unwrap();
        assert_eq!(outcome.contents, Contents::Ints { values: vec![7, 0] });
        assert_eq!(outcome.clobbered, 0);
    }

    #[test]
    fn test_unsafe_write_outside_frame_is_refused() {
        let err = unsafe_write(1, INT_CAPACITY + SPILL_SLOTS).unwrap_err();
        assert!(matches!(
            err,
            OpError::Buffer(BufferError::ReachExceeded { .. })
        ));
    }

    #[test]
    fn test_safe_write() {
        let outcome = safe_write(1, 42);
        assert_eq!(
            outcome.contents,
            Contents::Ints {
                values: vec![0, 42]
            }
        );

        let outcome = safe_write(5, 42);
        assert_eq!(outcome.rejection.as_deref(), Some("Invalid index."));
        assert_eq!(outcome.contents, Contents::Empty);

        assert!(safe_write(-1, 42).is_rejected());
    }
}
