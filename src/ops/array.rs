//! Element copies into a five-slot integer buffer

use super::{Contents, OpKind, OpResult, Outcome, Variant};
use crate::buffer::{BoundedBuffer, Frame, ARRAY_CAPACITY, INT_CANARY};

/// Copy every element of `src` into a five-slot frame, one by one, with the
/// loop bound taken from the source alone.
///
/// Intentionally hazardous: a source longer than five elements runs into the
/// memory after the buffer.
pub fn unsafe_copy(src: &[i32]) -> OpResult<Outcome> {
    let mut frame: Frame<i32, ARRAY_CAPACITY> = Frame::new(0, INT_CANARY);
    frame.ensure_reach(src.len())?;

    for (i, &value) in src.iter().enumerate() {
        // SAFETY: src.len() <= reach was checked above.
        unsafe { frame.write_unchecked(i, value) };
    }

    Ok(Outcome::new(
        OpKind::Array,
        Variant::Unsafe,
        Contents::Ints {
            values: frame.slots().to_vec(),
        },
    )
    .with_clobbered(frame.clobbered(INT_CANARY)))
}

/// Copy `min(src.len(), 5)` elements; untouched slots stay zero.
pub fn safe_copy(src: &[i32]) -> Outcome {
    let mut buffer: BoundedBuffer<i32> = BoundedBuffer::new(ARRAY_CAPACITY);
    let dropped = buffer.copy_from(src);
    Outcome::new(
        OpKind::Array,
        Variant::Safe,
        Contents::Ints {
            values: buffer.as_slice().to_vec(),
        },
    )
    .with_dropped(dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsafe_copy_six_into_five() {
        let outcome = unsafe_copy(&[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(
            outcome.contents,
            Contents::Ints {
                values: vec![1, 2, 3, 4, 5]
            }
        );
        assert_eq!(outcome.clobbered, 1);
        assert_eq!(
            outcome.lines()[0],
            "[Unsafe Function Array] Buffer values: 1 2 3 4 5"
        );
    }

    #[test]
    fn test_safe_copy_short_source_keeps_defaults() {
        let outcome = safe_copy(&[1, 2, 3]);
        assert_eq!(
            outcome.lines(),
            vec!["[Safe Function Array] Buffer values: 1 2 3 0 0".to_string()]
        );
    }

    #[test]
    fn test_safe_copy_long_source_truncates() {
        let outcome = safe_copy(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(
            outcome.contents,
            Contents::Ints {
                values: vec![1, 2, 3, 4, 5]
            }
        );
        assert_eq!(outcome.dropped, 1);
        assert_eq!(outcome.clobbered, 0);
    }
}
