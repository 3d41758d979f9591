//! Device memory: budgeted allocations and ping-pong buffers
//!
//! Every [`DeviceBuffer`] reserves its bytes from the device's
//! [`MemoryLedger`] when it is created and returns them when it is dropped,
//! so memory is released on every exit path of an operation, including early
//! returns through `?`.

use aligned_vec::AVec;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::constants::DEVICE_BUFFER_ALIGN;
use crate::error::{Result, ScanError};

/// Accounting of device memory against a fixed budget
#[derive(Debug)]
pub struct MemoryLedger {
    budget: usize,
    in_use: AtomicUsize,
    peak: AtomicUsize,
}

impl MemoryLedger {
    pub(crate) fn new(budget: usize) -> Self {
        Self {
            budget,
            in_use: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Claim `bytes` from the budget or fail without claiming anything
    pub(crate) fn reserve(&self, bytes: usize) -> Result<()> {
        let budget = self.budget;
        match self
            .in_use
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |used| {
                used.checked_add(bytes).filter(|&total| total <= budget)
            }) {
            Ok(previous) => {
                self.peak.fetch_max(previous + bytes, Ordering::SeqCst);
                Ok(())
            }
            Err(used) => Err(ScanError::OutOfDeviceMemory {
                requested: bytes,
                available: budget.saturating_sub(used),
            }),
        }
    }

    pub(crate) fn release(&self, bytes: usize) {
        self.in_use.fetch_sub(bytes, Ordering::SeqCst);
    }

    /// Total bytes that may be allocated at once
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Bytes currently held by live buffers
    pub fn in_use(&self) -> usize {
        self.in_use.load(Ordering::SeqCst)
    }

    /// Largest number of bytes held at the same time
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// An aligned buffer in device memory
pub struct DeviceBuffer<'d, T> {
    data: AVec<T>,
    bytes: usize,
    ledger: &'d MemoryLedger,
}

impl<'d, T: Copy> DeviceBuffer<'d, T> {
    /// Allocate `len` elements taken from `values`.
    ///
    /// The budget is checked before any memory is touched.
    pub(crate) fn from_iter<I>(ledger: &'d MemoryLedger, len: usize, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let bytes = len
            .checked_mul(std::mem::size_of::<T>())
            .ok_or(ScanError::LengthOverflow { len })?;
        ledger.reserve(bytes)?;

        let data = AVec::from_iter(DEVICE_BUFFER_ALIGN, values.into_iter().take(len));
        debug_assert_eq!(data.len(), len, "device buffer initialized short");

        Ok(Self { data, bytes, ledger })
    }

    /// Copy the first `n` elements back to host memory
    pub fn to_host(&self, n: usize) -> Vec<T> {
        self.data[..n].to_vec()
    }

    /// Size of the allocation in bytes
    pub fn bytes(&self) -> usize {
        self.bytes
    }
}

impl<T> Deref for DeviceBuffer<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.data
    }
}

impl<T> DerefMut for DeviceBuffer<'_, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T> Drop for DeviceBuffer<'_, T> {
    fn drop(&mut self) {
        self.ledger.release(self.bytes);
    }
}

impl<T> fmt::Debug for DeviceBuffer<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceBuffer")
            .field("len", &self.data.len())
            .field("bytes", &self.bytes)
            .finish()
    }
}

/// Two equally sized buffers whose roles swap after every pass.
///
/// A pass reads only from `current` and writes only to `next`; the borrow
/// returned by [`split`](Self::split) makes reading a value written in the
/// same pass impossible.
#[derive(Debug)]
pub struct DoubleBuffer<'d, T> {
    current: DeviceBuffer<'d, T>,
    next: DeviceBuffer<'d, T>,
}

impl<'d, T: Copy> DoubleBuffer<'d, T> {
    /// Pair `current` (holding the data) with scratch space `next`
    pub fn new(current: DeviceBuffer<'d, T>, next: DeviceBuffer<'d, T>) -> Self {
        assert_eq!(
            current.len(),
            next.len(),
            "double buffer halves must have equal length"
        );
        Self { current, next }
    }

    /// The buffer holding the latest data
    pub fn current(&self) -> &[T] {
        &self.current
    }

    /// Borrow the source and destination of the next pass
    pub fn split(&mut self) -> (&[T], &mut [T]) {
        (&self.current, &mut self.next)
    }

    /// Make the buffer written by the last pass current
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }

    /// Give up the scratch half and keep the current data
    pub fn into_current(self) -> DeviceBuffer<'d, T> {
        self.current
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}
