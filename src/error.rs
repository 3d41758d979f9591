//! Error types for scan, compaction and sort operations

use std::fmt;

/// Errors that can occur while running an operation on the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// The logical length is larger than the input that was supplied
    LengthMismatch {
        /// Logical length requested by the caller
        requested: usize,
        /// Number of elements actually available
        available: usize,
    },
    /// Radix sort only accepts non-negative keys
    NegativeKey {
        /// Position of the first negative key
        index: usize,
    },
    /// The most significant bit lies outside the key width
    BitOutOfRange {
        /// Requested most significant bit
        msb: u32,
        /// Width of the key type in bits
        key_bits: u32,
    },
    /// A device allocation would exceed the memory budget
    OutOfDeviceMemory {
        /// Bytes requested by the allocation
        requested: usize,
        /// Bytes still free when the allocation was attempted
        available: usize,
    },
    /// The padded length cannot be represented
    LengthOverflow {
        /// Logical length that could not be padded
        len: usize,
    },
    /// The device worker pool could not be created
    DeviceInit(String),
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::LengthMismatch { requested, available } => write!(
                f,
                "logical length {} exceeds input length {}",
                requested, available
            ),
            ScanError::NegativeKey { index } => {
                write!(f, "negative key at index {} cannot be radix sorted", index)
            }
            ScanError::BitOutOfRange { msb, key_bits } => write!(
                f,
                "most significant bit {} is outside a {}-bit key",
                msb, key_bits
            ),
            ScanError::OutOfDeviceMemory { requested, available } => write!(
                f,
                "device allocation of {} bytes failed ({} bytes available)",
                requested, available
            ),
            ScanError::LengthOverflow { len } => {
                write!(f, "length {} cannot be padded to a power of two", len)
            }
            ScanError::DeviceInit(msg) => write!(f, "device initialization failed: {}", msg),
        }
    }
}

impl std::error::Error for ScanError {}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = ScanError::LengthMismatch {
            requested: 10,
            available: 4,
        };
        assert_eq!(err.to_string(), "logical length 10 exceeds input length 4");

        let err = ScanError::BitOutOfRange { msb: 32, key_bits: 32 };
        assert!(err.to_string().contains("32-bit key"));
    }
}
