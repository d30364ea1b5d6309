//! The fill loop
//!
//! Pure sequencing over host-owned state: one getter call, then one setter
//! call, per index, in ascending order. Nothing here knows about C; the
//! exported boundary in `stubs.rs` adapts function pointers into closures.

/// Fill `count` slots of `handle`.
///
/// For each `index` in `0..count`, calls `get()` once and passes the result
/// to `set(handle, index, value)`. The handle is forwarded verbatim and never
/// inspected. With `count == 0` neither callable runs.
#[inline]
pub fn fill_with<H, S, G>(handle: H, mut set: S, mut get: G, count: u64)
where
    H: Copy,
    S: FnMut(H, u64, f64),
    G: FnMut() -> f64,
{
    for index in 0..count {
        let value = get();
        set(handle, index, value);
    }
}
