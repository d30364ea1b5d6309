//! Loading the extension as a host would
//!
//! Opens the shared library with `dlopen`, checks the ABI version it reports
//! and resolves `fill` to a typed function pointer.

use std::ffi::{CStr, CString, c_void};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::runtime::abi::{
    ABI_VERSION, ABI_VERSION_SYMBOL, AbiVersionFn, FILL_SYMBOL, FillFn, GetFn, Handle, SetFn,
};

#[derive(Debug, Error)]
pub enum ExtensionError {
    #[error("library path contains a NUL byte: {}", .0.display())]
    NulInPath(PathBuf),
    #[error("failed to open {}: {reason}", path.display())]
    Open { path: PathBuf, reason: String },
    #[error("symbol '{symbol}' not found in {}: {reason}", path.display())]
    MissingSymbol {
        path: PathBuf,
        symbol: &'static str,
        reason: String,
    },
    #[error("ABI version mismatch in {}: expected {expected}, found {found}", path.display())]
    AbiMismatch {
        path: PathBuf,
        expected: u32,
        found: u32,
    },
}

/// A loaded extension library. Unloaded on drop.
#[derive(Debug)]
pub struct Extension {
    lib: *mut c_void,
    path: PathBuf,
    fill: FillFn,
    abi_version: u32,
}

/// Text of the most recent dl* failure on this thread.
fn last_dl_error() -> String {
    // SAFETY: dlerror returns null or a NUL-terminated thread-local string.
    let msg = unsafe { libc::dlerror() };
    if msg.is_null() {
        "unknown error".to_string()
    } else {
        unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned()
    }
}

/// Reject a library whose reported ABI version differs from ours.
fn check_abi(path: &Path, found: u32) -> Result<(), ExtensionError> {
    if found == ABI_VERSION {
        return Ok(());
    }
    warn!(
        path = %path.display(),
        expected = ABI_VERSION,
        found,
        "refusing extension with incompatible ABI"
    );
    Err(ExtensionError::AbiMismatch {
        path: path.to_path_buf(),
        expected: ABI_VERSION,
        found,
    })
}

impl Extension {
    /// Open the library at `path` and resolve its exports.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ExtensionError> {
        let path = path.as_ref().to_path_buf();
        let c_path = CString::new(path.as_os_str().as_encoded_bytes())
            .map_err(|_| ExtensionError::NulInPath(path.clone()))?;

        let lib = unsafe { libc::dlopen(c_path.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL) };
        if lib.is_null() {
            return Err(ExtensionError::Open {
                reason: last_dl_error(),
                path,
            });
        }
        debug!(path = %path.display(), "opened extension");

        // Wrap first so dlclose runs on every error path below.
        let mut ext = Extension {
            lib,
            path,
            fill: crate::runtime::stubs::fill,
            abi_version: 0,
        };

        let version_sym = ext.symbol(ABI_VERSION_SYMBOL)?;
        // SAFETY: the symbol is exported with the `AbiVersionFn` signature.
        let version_fn = unsafe { std::mem::transmute::<*mut c_void, AbiVersionFn>(version_sym) };
        ext.abi_version = unsafe { version_fn() };
        check_abi(&ext.path, ext.abi_version)?;

        let fill_sym = ext.symbol(FILL_SYMBOL)?;
        // SAFETY: same ABI version, so `fill` has the `FillFn` signature.
        ext.fill = unsafe { std::mem::transmute::<*mut c_void, FillFn>(fill_sym) };
        debug!(path = %ext.path.display(), abi_version = ext.abi_version, "resolved fill");
        Ok(ext)
    }

    fn symbol(&self, name: &'static str) -> Result<*mut c_void, ExtensionError> {
        let missing = |reason: String| ExtensionError::MissingSymbol {
            path: self.path.clone(),
            symbol: name,
            reason,
        };
        let c_name = CString::new(name).map_err(|_| missing("symbol name contains NUL".into()))?;

        // Clear any stale error so a null result can be told apart from a null symbol.
        unsafe { libc::dlerror() };
        let sym = unsafe { libc::dlsym(self.lib, c_name.as_ptr()) };
        if sym.is_null() {
            return Err(missing(last_dl_error()));
        }
        Ok(sym)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn abi_version(&self) -> u32 {
        self.abi_version
    }

    /// The resolved `fill` entry point.
    ///
    /// # Safety
    /// The pointer is code inside the loaded library. It must not be called
    /// after `self` is dropped, since dropping unloads the library.
    pub unsafe fn fill_fn(&self) -> FillFn {
        self.fill
    }

    /// Call the extension's `fill`.
    ///
    /// # Safety
    /// Same contract as the exported `fill`.
    pub unsafe fn fill(&self, handle: Handle, set: SetFn, get: GetFn, count: u64) {
        unsafe { (self.fill)(handle, set, get, count) }
    }

    /// Fill every element of `buf` through the extension.
    ///
    /// # Safety
    /// `get` must be safe to call `buf.len()` times.
    pub unsafe fn fill_slice(&self, buf: &mut [f64], get: GetFn) {
        unsafe { super::buffer::fill_slice(self.fill, buf, get) }
    }
}

impl Drop for Extension {
    fn drop(&mut self) {
        if unsafe { libc::dlclose(self.lib) } != 0 {
            warn!(path = %self.path.display(), error = %last_dl_error(), "dlclose failed");
        } else {
            debug!(path = %self.path.display(), "closed extension");
        }
    }
}
