//! Host-owned `f64` buffers

use crate::runtime::abi::{FillFn, GetFn, Handle};

/// C setter writing into a contiguous `f64` buffer.
///
/// An index that does not fit in `usize` cannot address any buffer on this
/// target, so the write is skipped.
///
/// # Safety
/// `handle` must point at an `f64` array with more than `index` elements,
/// valid for writes.
pub unsafe extern "C" fn write_f64(handle: Handle, index: u64, value: f64) {
    let Ok(index) = usize::try_from(index) else {
        return;
    };
    let base = handle.as_ptr().cast::<f64>();
    unsafe { base.add(index).write(value) };
}

/// Fill every element of `buf` through `fill`, using `write_f64` as setter.
///
/// The count is the slice length, so `fill` can never be asked to write
/// past the end.
///
/// # Safety
/// `fill` must follow the exported `fill` contract and `get` must be safe to
/// call `buf.len()` times.
pub unsafe fn fill_slice(fill: FillFn, buf: &mut [f64], get: GetFn) {
    let handle = Handle::from_ptr(buf.as_mut_ptr().cast());
    unsafe { fill(handle, write_f64, get, buf.len() as u64) };
}
