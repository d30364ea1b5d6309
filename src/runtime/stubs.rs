//! Exported extern "C" entry points
//!
//! This is the only place the extension touches the C ABI. Hosts resolve
//! these symbols by name after loading the library and call them by address,
//! so parameter order, types and widths must match `abi.rs` exactly.
//!
//! The calling convention is:
//! - The handle is an untyped pointer, forwarded and never read
//! - Indices and counts are u64
//! - Values are f64 (C `double`)

use super::abi::{ABI_VERSION, GetFn, Handle, SetFn};
use super::fill::fill_with;

/// Fill `count` slots of `handle` with values produced by `get`.
///
/// Calls `get()` then `set(handle, i, value)` for each `i` in `0..count`.
/// Returns immediately when `count` is zero.
///
/// # Safety
/// - `set` and `get` must be valid, non-null function pointers.
/// - `get` must be safe to call `count` times.
/// - `set` must accept `handle` and every index in `0..count`. No bounds are
///   checked here.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn fill(handle: Handle, set: SetFn, get: GetFn, count: u64) {
    fill_with(
        handle,
        // SAFETY: validity of both capabilities is the caller's contract.
        |h, index, value| unsafe { set(h, index, value) },
        || unsafe { get() },
        count,
    );
}

/// ABI version implemented by this library.
#[unsafe(no_mangle)]
pub extern "C" fn vecfill_abi_version() -> u32 {
    ABI_VERSION
}
