//! Write-only view of a buffer for scatter kernels

use std::marker::PhantomData;

/// Destination of a scatter pass.
///
/// Threads of a scatter kernel write to addresses computed by a scan. The
/// addresses are unique by construction, which slices alone cannot express,
/// so this view hands out unchecked-aliasing writes with bounds checks.
pub(crate) struct ScatterTarget<'a, T> {
    ptr: *mut T,
    len: usize,
    _marker: PhantomData<&'a mut [T]>,
}

// Safety: writes go to disjoint indices (see `write`) and the view holds the
// exclusive borrow of the destination for its whole lifetime.
unsafe impl<T: Send> Send for ScatterTarget<'_, T> {}
unsafe impl<T: Send> Sync for ScatterTarget<'_, T> {}

impl<'a, T: Copy> ScatterTarget<'a, T> {
    pub(crate) fn new(dst: &'a mut [T]) -> Self {
        Self {
            ptr: dst.as_mut_ptr(),
            len: dst.len(),
            _marker: PhantomData,
        }
    }

    /// Store `value` at `index`.
    ///
    /// # Safety
    ///
    /// No other thread may write `index` during the same pass.
    pub(crate) unsafe fn write(&self, index: usize, value: T) {
        assert!(
            index < self.len,
            "scatter address {} out of bounds for length {}",
            index,
            self.len
        );
        self.ptr.add(index).write(value);
    }
}
