//! ABI Compatibility Tests
//!
//! These tests pin the exported surface of the extension. Any change to a
//! symbol name, signature or layout should cause one of them to fail.

#[cfg(test)]
mod tests {
    use crate::runtime::ABI_VERSION;
    use crate::runtime::abi::{ABI_NAME, ABI_VERSION_SYMBOL, FILL_SYMBOL};

    /// Test that ABI version is set to the expected value.
    #[test]
    fn test_abi_version() {
        assert_eq!(ABI_VERSION, 1, "ABI version must be 1");
    }

    /// Test that the ABI name is correct.
    #[test]
    fn test_abi_name() {
        assert_eq!(ABI_NAME, "vecfill", "ABI name must be 'vecfill'");
    }

    /// Hosts resolve these names with dlsym; they must never drift.
    #[test]
    fn test_symbol_names() {
        assert_eq!(FILL_SYMBOL, "fill");
        assert_eq!(ABI_VERSION_SYMBOL, "vecfill_abi_version");
    }
}

#[cfg(test)]
mod layout_tests {
    use crate::runtime::abi::{AbiVersionFn, FillFn, GetFn, Handle, SetFn};
    use std::ffi::c_void;
    use std::mem::{align_of, size_of};

    /// The handle must be passed exactly like `void *`.
    #[test]
    fn test_handle_layout() {
        assert_eq!(size_of::<Handle>(), size_of::<*mut c_void>());
        assert_eq!(align_of::<Handle>(), align_of::<*mut c_void>());
    }

    /// Capabilities are plain code pointers.
    #[test]
    fn test_function_pointer_layout() {
        assert_eq!(size_of::<SetFn>(), size_of::<usize>());
        assert_eq!(size_of::<GetFn>(), size_of::<usize>());
        assert_eq!(size_of::<FillFn>(), size_of::<usize>());
    }

    /// Index and count are 64-bit on every target, values are C doubles.
    #[test]
    fn test_scalar_widths() {
        assert_eq!(size_of::<u64>(), 8, "u64 must be 8 bytes");
        assert_eq!(size_of::<f64>(), size_of::<std::ffi::c_double>());
    }

    /// The exported functions must coerce to the published pointer types.
    #[test]
    fn test_exports_match_published_signatures() {
        let fill: FillFn = crate::runtime::stubs::fill;
        let version: AbiVersionFn = crate::runtime::stubs::vecfill_abi_version;
        assert_eq!(unsafe { version() }, crate::runtime::ABI_VERSION);
        let _ = fill;
    }
}
