//! Power-of-two padding of logical arrays
//!
//! The tree-shaped passes operate on a padded length `n′`, the next power of
//! two at or above the logical length `n`. Padding cells hold a fill value
//! that cannot change the first `n` results (0 for scans, the largest key for
//! sorting) and are cut off again before results leave the device.

use crate::device::{Device, DeviceBuffer};
use crate::error::{Result, ScanError};

/// Next power of two at or above `n`; zero stays zero.
pub fn padded_len(n: usize) -> Result<usize> {
    if n == 0 {
        return Ok(0);
    }
    n.checked_next_power_of_two()
        .ok_or(ScanError::LengthOverflow { len: n })
}

/// Number of doubling steps needed to cover `n` elements (`⌈log2 n⌉`)
pub fn log2_ceil(n: usize) -> u32 {
    if n <= 1 {
        0
    } else {
        usize::BITS - (n - 1).leading_zeros()
    }
}

/// The first `n` elements of `input`, or an error when `n` is too large
pub fn logical_input<T>(n: usize, input: &[T]) -> Result<&[T]> {
    input.get(..n).ok_or(ScanError::LengthMismatch {
        requested: n,
        available: input.len(),
    })
}

/// Upload `input` into a buffer of its padded length, filling the tail.
pub fn upload_padded<'d, T: Copy>(
    device: &'d Device,
    input: &[T],
    fill: T,
) -> Result<DeviceBuffer<'d, T>> {
    let padded = padded_len(input.len())?;
    device.upload_padded(input, padded, fill)
}

/// Copy the logical prefix of a padded buffer back to the host.
pub fn truncate<T: Copy>(buffer: &DeviceBuffer<'_, T>, n: usize) -> Vec<T> {
    buffer.to_host(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceConfig;

    #[test]
    fn test_padded_len() {
        assert_eq!(padded_len(0).unwrap(), 0);
        assert_eq!(padded_len(1).unwrap(), 1);
        assert_eq!(padded_len(5).unwrap(), 8);
        assert_eq!(padded_len(8).unwrap(), 8);
        assert_eq!(padded_len((1 << 20) - 3).unwrap(), 1 << 20);
        assert_eq!(
            padded_len(usize::MAX),
            Err(ScanError::LengthOverflow { len: usize::MAX })
        );
    }

    #[test]
    fn test_log2_ceil() {
        assert_eq!(log2_ceil(0), 0);
        assert_eq!(log2_ceil(1), 0);
        assert_eq!(log2_ceil(2), 1);
        assert_eq!(log2_ceil(5), 3);
        assert_eq!(log2_ceil(8), 3);
        assert_eq!(log2_ceil(9), 4);
    }

    #[test]
    fn test_logical_input() {
        let data = [1, 2, 3];
        assert_eq!(logical_input(2, &data).unwrap(), &[1, 2]);
        assert_eq!(logical_input(0, &data).unwrap(), &[] as &[i32]);
        assert_eq!(
            logical_input(4, &data),
            Err(ScanError::LengthMismatch {
                requested: 4,
                available: 3
            })
        );
    }

    #[test]
    fn test_upload_and_truncate() {
        let device = Device::new(DeviceConfig::default().with_threads(1)).unwrap();
        let buffer = upload_padded(&device, &[4, 2, 0, 7, 1], 0).unwrap();
        assert_eq!(buffer.len(), 8);
        assert_eq!(&buffer[5..], &[0, 0, 0]);
        assert_eq!(truncate(&buffer, 5), vec![4, 2, 0, 7, 1]);
    }
}
