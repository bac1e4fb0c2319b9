//! Text copies into a ten-byte buffer

use super::{Contents, OpKind, OpResult, Outcome, Variant};
use crate::buffer::{c_strlen, BoundedBuffer, Frame, BYTE_CANARY, STRING_CAPACITY};

/// `strcpy` `src` into a ten-byte frame.
///
/// Intentionally hazardous: the whole source and its terminator are written
/// regardless of the capacity, and the result is read back the same way, up to
/// the first NUL wherever it landed.
pub fn unsafe_copy(src: &[u8]) -> OpResult<Outcome> {
    let mut frame: Frame<u8, STRING_CAPACITY> = Frame::new(0, BYTE_CANARY);
    frame.ensure_reach(c_strlen(src) + 1)?;

    // SAFETY: the copy plus terminator fits the frame's reach.
    unsafe { frame.strcpy(src) };

    Ok(Outcome::new(
        OpKind::String,
        Variant::Unsafe,
        Contents::Text {
            text: String::from_utf8_lossy(frame.c_str()).into_owned(),
        },
    )
    .with_clobbered(frame.clobbered(BYTE_CANARY)))
}

/// Copy at most nine bytes of `src` into a ten-byte buffer and terminate it.
///
/// Longer input is truncated; the dropped byte count is reported, not treated
/// as a failure.
pub fn safe_copy(src: &[u8]) -> Outcome {
    let mut buffer: BoundedBuffer<u8> = BoundedBuffer::new(STRING_CAPACITY);
    let dropped = buffer.copy_terminated(src);
    Outcome::new(
        OpKind::String,
        Variant::Safe,
        Contents::Text {
            text: buffer.to_string_lossy(),
        },
    )
    .with_dropped(dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG: &str = "ThisIsAVeryLongInputThatWillOverflow";

    #[test]
    fn test_unsafe_copy_overflows() {
        let outcome = unsafe_copy(LONG.as_bytes()).unwrap();
        assert_eq!(
            outcome.contents,
            Contents::Text {
                text: LONG.to_string()
            }
        );
        assert_eq!(outcome.clobbered, LONG.len() + 1 - STRING_CAPACITY);
        assert_eq!(
            outcome.lines()[0],
            format!("[Unsafe Function String] Buffer contains: {}", LONG)
        );
    }

    #[test]
    fn test_unsafe_copy_that_fits() {
        let outcome = unsafe_copy(b"short").unwrap();
        assert_eq!(outcome.clobbered, 0);
        assert_eq!(outcome.verdict(), "ok");
    }

    #[test]
    fn test_unsafe_copy_beyond_frame_is_refused() {
        let huge = vec![b'x'; 1024];
        assert!(unsafe_copy(&huge).is_err());
    }

    #[test]
    fn test_safe_copy() {
        let outcome = safe_copy(b"SafeInput");
        assert_eq!(
            outcome.lines(),
            vec!["[Safe Function String] Buffer contains: SafeInput".to_string()]
        );
        assert_eq!(outcome.dropped, 0);

        let outcome = safe_copy(LONG.as_bytes());
        assert_eq!(
            outcome.contents,
            Contents::Text {
                text: "ThisIsAVe".to_string()
            }
        );
        assert_eq!(outcome.dropped, LONG.len() - 9);
        assert_eq!(outcome.verdict(), "truncated");
    }
}
