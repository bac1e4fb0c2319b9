//! Fixed-size frames with an adjacent spill region
//!
//! A [`Frame`] models a stack buffer of `N` slots together with the memory that
//! happens to sit right after it. The layout is `#[repr(C)]`, so the `G` spill
//! slots follow the declared slots contiguously and a raw pointer derived from
//! the whole frame may walk past slot `N - 1` into them.
//!
//! Every write through this type is unchecked against the capacity. The only
//! limit is the frame's reach (`N + G`): past that, a write would leave the
//! frame altogether and hit real process memory.

use super::{c_strlen, BufferError, BufferResult};
use std::ptr;

/// Default number of spill slots placed after the declared buffer.
pub const SPILL_SLOTS: usize = 64;

/// Fill value for the spill region of integer frames.
pub const INT_CANARY: i32 = 0x5A5A_5A5A;

/// Fill value for the spill region of byte frames (INT3, as in freshly reset code pages).
pub const BYTE_CANARY: u8 = 0xCC;

/// Fixed-capacity storage followed by `G` slots of adjacent memory.
#[repr(C)]
#[derive(Clone, Debug)]
pub struct Frame<T, const N: usize, const G: usize = SPILL_SLOTS> {
    slots: [T; N],
    spill: [T; G],
}

impl<T: Copy + PartialEq, const N: usize, const G: usize> Frame<T, N, G> {
    /// Declared capacity.
    pub const CAPACITY: usize = N;

    /// Number of slots a raw write may reach before leaving the frame.
    pub const REACH: usize = N + G;

    /// Create a frame with every declared slot set to `fill` and every spill
    /// slot set to `canary`.
    pub fn new(fill: T, canary: T) -> Self {
        Self {
            slots: [fill; N],
            spill: [canary; G],
        }
    }

    pub fn capacity(&self) -> usize {
        N
    }

    pub fn reach(&self) -> usize {
        N + G
    }

    /// The declared (in-bounds) slots.
    pub fn slots(&self) -> &[T] {
        &self.slots
    }

    /// The adjacent memory after the declared slots.
    pub fn spill(&self) -> &[T] {
        &self.spill
    }

    /// Count spill slots that no longer hold `canary`.
    pub fn clobbered(&self, canary: T) -> usize {
        self.spill.iter().filter(|&&v| v != canary).count()
    }

    /// Confirm that `len` slots counted from the frame base stay inside the frame.
    ///
    /// This is not a capacity check: any length up to `reach()` passes,
    /// including lengths that run through the whole spill region.
    pub fn ensure_reach(&self, len: usize) -> BufferResult<()> {
        if len > N + G {
            return Err(BufferError::ReachExceeded {
                requested: len,
                reach: N + G,
            });
        }
        Ok(())
    }

    fn base_mut(&mut self) -> *mut T {
        (self as *mut Self).cast::<T>()
    }

    fn base(&self) -> *const T {
        (self as *const Self).cast::<T>()
    }

    /// Write `value` at `index` without comparing `index` to the capacity.
    ///
    /// # Safety
    /// `index` must be below `reach()`. Indices in `[capacity, reach)` overwrite
    /// the spill region.
    pub unsafe fn write_unchecked(&mut self, index: usize, value: T) {
        self.base_mut().add(index).write(value);
    }

    /// Read the slot at `index` without comparing `index` to the capacity.
    ///
    /// # Safety
    /// `index` must be below `reach()`.
    pub unsafe fn read_unchecked(&self, index: usize) -> T {
        self.base().add(index).read()
    }

    /// Copy all of `src` into the frame starting at slot 0, without truncating
    /// to the capacity.
    ///
    /// # Safety
    /// `src.len()` must not exceed `reach()`.
    pub unsafe fn copy_unchecked(&mut self, src: &[T]) {
        ptr::copy_nonoverlapping(src.as_ptr(), self.base_mut(), src.len());
    }
}

impl<const N: usize, const G: usize> Frame<u8, N, G> {
    /// Copy `src` up to its first NUL and then write a terminator, with no
    /// regard for the capacity. Returns the number of bytes written, terminator
    /// included.
    ///
    /// # Safety
    /// `c_strlen(src) + 1` must not exceed `reach()`.
    pub unsafe fn strcpy(&mut self, src: &[u8]) -> usize {
        let len = c_strlen(src);
        self.copy_unchecked(&src[..len]);
        self.write_unchecked(len, 0);
        len + 1
    }

    /// Read the frame as a C string: every byte up to the first NUL, running
    /// past the capacity when no terminator sits inside it. Stops at the reach.
    pub fn c_str(&self) -> &[u8] {
        let whole = self.as_bytes();
        &whole[..c_strlen(whole)]
    }

    fn as_bytes(&self) -> &[u8] {
        // repr(C) over two u8 arrays: N + G contiguous bytes, no padding.
        unsafe { std::slice::from_raw_parts(self.base(), N + G) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_within_capacity() {
        let mut frame: Frame<i32, 2> = Frame::new(0, INT_CANARY);
        unsafe { frame.write_unchecked(1, 7) };
        assert_eq!(frame.slots(), &[0, 7]);
        assert_eq!(frame.clobbered(INT_CANARY), 0);
    }

    #[test]
    fn test_write_past_capacity_lands_in_spill() {
        let mut frame: Frame<i32, 2> = Frame::new(0, INT_CANARY);
        unsafe { frame.write_unchecked(3, 999) };
        assert_eq!(frame.slots(), &[0, 0]);
        assert_eq!(frame.spill()[1], 999);
        assert_eq!(frame.clobbered(INT_CANARY), 1);
    }

    #[test]
    fn test_strcpy_overflows_into_spill() {
        let mut frame: Frame<u8, 10> = Frame::new(0, BYTE_CANARY);
        let src = b"ThisIsAVeryLongInputThatWillOverflow";
        frame.ensure_reach(src.len() + 1).unwrap();
        let written = unsafe { frame.strcpy(src) };

        assert_eq!(written, 37);
        assert_eq!(frame.c_str(), &src[..]);
        assert_eq!(frame.clobbered(BYTE_CANARY), 27);
    }

    #[test]
    fn test_c_str_without_terminator_stops_at_reach() {
        let frame: Frame<u8, 4, 4> = Frame::new(b'a', b'b');
        assert_eq!(frame.c_str(), b"aaaabbbb");
    }

    #[test]
    fn test_ensure_reach() {
        let frame: Frame<i32, 5> = Frame::new(0, INT_CANARY);
        assert_eq!(frame.reach(), 5 + SPILL_SLOTS);
        assert!(frame.ensure_reach(frame.reach()).is_ok());
        assert_eq!(
            frame.ensure_reach(frame.reach() + 1),
            Err(BufferError::ReachExceeded {
                requested: 5 + SPILL_SLOTS + 1,
                reach: 5 + SPILL_SLOTS,
            })
        );
    }

    #[test]
    fn test_read_unchecked_sees_spill() {
        let frame: Frame<i32, 2> = Frame::new(0, INT_CANARY);
        assert_eq!(unsafe { frame.read_unchecked(1) }, 0);
        assert_eq!(unsafe { frame.read_unchecked(2) }, INT_CANARY);
    }
}
