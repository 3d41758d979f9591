//! # Stream compaction: parallel scan and the algorithms built on it
//!
//! This crate computes exclusive prefix sums (scans) over integer arrays on a
//! SIMT-style data-parallel [`Device`], and uses the scan as the building
//! block for stream compaction and radix sort.
//!
//! ## Overview
//!
//! - **Naive scan**: Hillis-Steele, `O(log n)` passes, `O(n log n)` work
//! - **Work-efficient scan**: Blelloch up-sweep/down-sweep, `O(log n)` passes,
//!   `O(n)` work
//! - **Stream compaction**: map to 0/1 flags, scan, scatter
//! - **Radix sort**: one stable scan-based split per bit
//!
//! A sequential [`reference`] implementation serves as the correctness
//! oracle, and [`library`] calls straight through to optimized routines.
//! All scans are interchangeable through [`ExclusiveScan`].
//!
//! ## Usage
//!
//! ```
//! use stream_compaction::{compact_with_scan, Device, DeviceConfig, RadixSort, WorkEfficientScan};
//!
//! let device = Device::new(DeviceConfig::default()).unwrap();
//!
//! let scan = WorkEfficientScan::new(&device).scan(8, &[3u32, 1, 7, 0, 4, 1, 6, 3]).unwrap();
//! assert_eq!(scan, vec![0, 3, 4, 11, 11, 15, 16, 22]);
//!
//! let compacted = compact_with_scan(&device, 6, &[0u32, 3, 0, 5, 0, 2]).unwrap();
//! assert_eq!(compacted.kept(), &[3, 5, 2]);
//!
//! let sorted = RadixSort::new(&device).sort(6, &[5u32, 1, 4, 1, 3, 2], 3).unwrap();
//! assert_eq!(sorted, vec![1, 1, 2, 3, 4, 5]);
//! ```

pub mod compact;
pub mod constants;
pub mod device;
pub mod element;
pub mod error;
pub mod harness;
pub mod library;
pub mod padding;
pub mod radix;
pub mod reference;
pub mod scan;
pub mod timing;

// Re-export primary components
pub use compact::{compact_by, compact_with_scan, Compaction};
pub use device::{Device, DeviceBuffer, DeviceConfig, DoubleBuffer, KernelStats, SystemParameters};
pub use element::Element;
pub use error::{Result, ScanError};
pub use radix::RadixSort;
pub use scan::{create_scanner, ExclusiveScan, NaiveScan, ScanKind, SweepLevel, WorkEfficientScan};
pub use timing::{averaged, timed, Timed};

/// Version information for the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
