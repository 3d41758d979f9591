//! Exclusive prefix sum implementations
//!
//! All scans share one contract: for a logical length `n` and input `x`,
//! `scan(n, x)[i]` is the sum of `x[0..i]`, so the first element is always
//! zero and `n = 0` yields an empty result. Implementations differ only in how
//! the work is scheduled, which makes them interchangeable behind
//! [`ExclusiveScan`].

pub mod efficient;
pub mod naive;

use crate::device::Device;
use crate::element::Element;
use crate::error::Result;
use crate::library::LibraryScan;
use crate::reference::ReferenceScan;

pub use efficient::{SweepLevel, WorkEfficientScan};
pub use naive::NaiveScan;

/// Trait for exclusive prefix sum implementations
pub trait ExclusiveScan<T: Element> {
    /// Short name used in logs and benchmark output
    fn name(&self) -> &'static str;

    /// Exclusive scan of the first `n` elements of `input`.
    ///
    /// Returns exactly `n` elements. Fails if `n` exceeds `input.len()` or the
    /// device runs out of memory; no partial result is produced.
    fn scan(&self, n: usize, input: &[T]) -> Result<Vec<T>>;
}

/// The available scan implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKind {
    /// Sequential CPU oracle
    Reference,
    /// Hillis-Steele scan, step-efficient
    Naive,
    /// Blelloch up-sweep/down-sweep scan, work-efficient
    WorkEfficient,
    /// Call-through to the optimized library routine
    Library,
}

impl ScanKind {
    /// Every kind, in the order the harness reports them
    pub const ALL: [ScanKind; 4] = [
        ScanKind::Reference,
        ScanKind::Naive,
        ScanKind::WorkEfficient,
        ScanKind::Library,
    ];
}

/// Create a scanner of the given kind bound to `device`
///
/// # Arguments
///
/// * `kind` - Which implementation to use
/// * `device` - Device that runs the kernel passes (unused by the CPU kinds)
///
/// # Returns
///
/// A boxed scanner trait object.
pub fn create_scanner<'d, T: Element>(
    kind: ScanKind,
    device: &'d Device,
) -> Box<dyn ExclusiveScan<T> + 'd> {
    match kind {
        ScanKind::Reference => Box::new(ReferenceScan),
        ScanKind::Naive => Box::new(NaiveScan::new(device)),
        ScanKind::WorkEfficient => Box::new(WorkEfficientScan::new(device)),
        ScanKind::Library => Box::new(LibraryScan),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceConfig;

    #[test]
    fn test_all_scanners_agree() {
        let device = Device::new(DeviceConfig::default().with_threads(2)).unwrap();
        let input = [3u32, 1, 7, 0, 4, 1, 6, 3];
        let expected = vec![0, 3, 4, 11, 11, 15, 16, 22];

        for kind in ScanKind::ALL {
            let scanner = create_scanner::<u32>(kind, &device);
            assert_eq!(
                scanner.scan(input.len(), &input).unwrap(),
                expected,
                "{} disagrees",
                scanner.name()
            );
        }
    }
}
