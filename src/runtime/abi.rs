//! C ABI types shared by the extension and its hosts
//!
//! Everything that crosses the dynamic-library boundary is declared here so
//! the contract is auditable in one place:
//! - `Handle`: opaque destination pointer, owned by the host
//! - `SetFn` / `GetFn`: host-supplied capabilities
//! - `FillFn`: type of the exported `fill` symbol
//!
//! C view of the exported surface:
//!
//! ```c
//! void fill(void *handle,
//!           void (*set)(void *handle, uint64_t index, double value),
//!           double (*get)(void),
//!           uint64_t count);
//! uint32_t vecfill_abi_version(void);
//! ```

use std::ffi::c_void;

/// Name of this ABI, reported by host tooling.
pub const ABI_NAME: &str = "vecfill";

/// Bumped whenever any exported signature changes.
pub const ABI_VERSION: u32 = 1;

/// Exported symbol of the fill routine.
pub const FILL_SYMBOL: &str = "fill";

/// Exported symbol returning `ABI_VERSION`.
pub const ABI_VERSION_SYMBOL: &str = "vecfill_abi_version";

/// Opaque reference to a host-owned destination.
///
/// The runtime never dereferences it, it is only forwarded to the setter.
/// `repr(transparent)` keeps it ABI-identical to `void *`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Handle(*mut c_void);

impl Handle {
    /// Wrap a raw pointer.
    #[inline]
    pub const fn from_ptr(ptr: *mut c_void) -> Self {
        Self(ptr)
    }

    /// Handle pointing at a host value. The borrow is not tracked past this call.
    #[inline]
    pub fn from_mut<T>(target: &mut T) -> Self {
        Self((target as *mut T).cast())
    }

    /// The null handle.
    #[inline]
    pub const fn null() -> Self {
        Self(std::ptr::null_mut())
    }

    #[inline]
    pub const fn as_ptr(self) -> *mut c_void {
        self.0
    }

    #[inline]
    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

impl std::fmt::Debug for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Handle({:p})", self.0)
    }
}

/// Setter capability: writes `value` at `index` into whatever `handle` names.
pub type SetFn = unsafe extern "C" fn(handle: Handle, index: u64, value: f64);

/// Getter capability: produces the next value.
pub type GetFn = unsafe extern "C" fn() -> f64;

/// Signature of the exported `fill` symbol.
pub type FillFn = unsafe extern "C" fn(handle: Handle, set: SetFn, get: GetFn, count: u64);

/// Signature of the exported `vecfill_abi_version` symbol.
pub type AbiVersionFn = unsafe extern "C" fn() -> u32;
