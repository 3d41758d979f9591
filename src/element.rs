//! Element types accepted by the device algorithms

use num_traits::{PrimInt, WrappingAdd};
use std::fmt::Debug;

/// A fixed-width primitive integer that can live in a device buffer.
///
/// Additions performed by the scans wrap on overflow, matching the integer
/// semantics of the device. Sums that fit in the element width are exact.
pub trait Element: PrimInt + WrappingAdd + Send + Sync + Debug + 'static {
    /// Width of the key in bits
    fn key_bits() -> u32 {
        (std::mem::size_of::<Self>() * 8) as u32
    }

    /// Whether the value is below zero (always false for unsigned types)
    fn is_negative(&self) -> bool {
        *self < Self::zero()
    }

    /// Returns bit `bit` of the value as 0 or 1
    fn bit(&self, bit: u32) -> usize {
        if (*self >> bit as usize) & Self::one() == Self::one() {
            1
        } else {
            0
        }
    }
}

impl<T> Element for T where T: PrimInt + WrappingAdd + Send + Sync + Debug + 'static {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bits() {
        assert_eq!(<u8 as Element>::key_bits(), 8);
        assert_eq!(<i32 as Element>::key_bits(), 32);
        assert_eq!(<u64 as Element>::key_bits(), 64);
    }

    #[test]
    fn test_bit_extraction() {
        assert_eq!(5i32.bit(0), 1);
        assert_eq!(5i32.bit(1), 0);
        assert_eq!(5i32.bit(2), 1);
        assert_eq!(u32::MAX.bit(31), 1);
        assert_eq!(i32::MAX.bit(31), 0);
    }

    #[test]
    fn test_negative_detection() {
        assert!((-1i32).is_negative());
        assert!(!0i32.is_negative());
        assert!(!u32::MAX.is_negative());
    }
}
