//! Random Source
//!
//! Generation draws from an injected [`RngCore`] rather than a process-wide
//! generator, so callers decide seeding and tests can script every draw.
//! [`Entropy`] adds the modulo-style helpers the generator is written
//! against; each helper consumes exactly one `next_u32` draw.

use rand::RngCore;

/// Draw helpers over any [`RngCore`].
pub trait Entropy: RngCore {
    /// Random 32-bit value.
    #[inline]
    fn word(&mut self) -> u32 {
        self.next_u32()
    }

    /// Uniform value in `0..n`.
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero.
    #[inline]
    fn below(&mut self, n: u32) -> u32 {
        self.word() % n
    }

    /// `true` with probability `1/n`. Always `false` without drawing when
    /// `n` is zero.
    #[inline]
    fn one_in(&mut self, n: u32) -> bool {
        n != 0 && self.below(n) == 0
    }

    /// Random byte.
    #[inline]
    fn byte(&mut self) -> u8 {
        self.word() as u8
    }

    /// Random 16-bit value.
    #[inline]
    fn half_word(&mut self) -> u16 {
        self.word() as u16
    }

    /// Uniform element of a non-empty table.
    ///
    /// # Panics
    ///
    /// Panics if `table` is empty.
    #[inline]
    fn pick<T: Copy>(&mut self, table: &[T]) -> T {
        table[self.below(table.len() as u32) as usize]
    }
}

impl<R: RngCore + ?Sized> Entropy for R {}
