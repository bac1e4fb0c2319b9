//! Element reads from a sequence

use super::{Contents, OpError, OpKind, OpResult, Outcome, Variant};
use crate::buffer::{Frame, INT_CANARY, READ_CAPACITY};

/// Read `index` from a growable sequence, only if it is below the current length.
pub fn checked_read(sequence: &[i32], index: i64) -> Outcome {
    let mut items: Vec<i32> = Vec::with_capacity(READ_CAPACITY);
    items.extend_from_slice(sequence);

    match usize::try_from(index).ok().and_then(|i| items.get(i)) {
        Some(&value) => Outcome::new(
            OpKind::Read,
            Variant::Safe,
            Contents::Element { index, value },
        ),
        None => Outcome::rejected(
            OpKind::Read,
            Variant::Safe,
            format!("Index {} out of bounds (length {}).", index, items.len()),
        ),
    }
}

/// Load `sequence` into a 100-slot frame and read `index` without comparing it
/// to the sequence length or the capacity.
///
/// Past the length this returns whatever the slot held; past the capacity it
/// returns adjacent memory.
pub fn unchecked_read(sequence: &[i32], index: i64) -> OpResult<Outcome> {
    let mut frame: Frame<i32, READ_CAPACITY> = Frame::new(0, INT_CANARY);
    frame.ensure_reach(sequence.len())?;
    let slot = usize::try_from(index).map_err(|_| OpError::InvalidInput {
        kind: OpKind::Read,
        input: index.to_string(),
        reason: "a negative index would read before the frame".to_string(),
    })?;
    frame.ensure_reach(slot.saturating_add(1))?;

    // SAFETY: both the load and the read stay below reach.
    let value = unsafe {
        frame.copy_unchecked(sequence);
        frame.read_unchecked(slot)
    };

    Ok(Outcome::new(
        OpKind::Read,
        Variant::Unsafe,
        Contents::Element { index, value },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_read() {
        let outcome = checked_read(&[10, 20, 30], 1);
        assert_eq!(outcome.contents, Contents::Element { index: 1, value: 20 });

        let outcome = checked_read(&[10, 20, 30], 5);
        assert_eq!(
            outcome.lines(),
            vec!["[Safe Function Read] Index 5 out of bounds (length 3).".to_string()]
        );
        assert!(checked_read(&[10, 20, 30], -1).is_rejected());
        assert!(checked_read(&[], 0).is_rejected());
    }

    #[test]
    fn test_unchecked_read_past_length() {
        let outcome = unchecked_read(&[10, 20, 30], 5).unwrap();
        assert_eq!(outcome.contents, Contents::Element { index: 5, value: 0 });
        assert!(!outcome.is_rejected());
    }

    #[test]
    fn test_unchecked_read_past_capacity() {
        let outcome = unchecked_read(&[10, 20, 30], READ_CAPACITY as i64).unwrap();
        assert_eq!(
            outcome.contents,
            Contents::Element {
                index: READ_CAPACITY as i64,
                value: INT_CANARY
            }
        );
    }

    #[test]
    fn test_unchecked_read_negative_index() {
        assert!(unchecked_read(&[10, 20, 30], -1).is_err());
    }
}
