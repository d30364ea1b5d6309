//! Loads the built cdylib the way a host does and drives `fill` through it.
//!
//! The library is looked up next to the test executable's target directory.
//! If it has not been built (e.g. `--no-default-features` test runs on a
//! non-cdylib target) the tests report that and return early.

#![cfg(all(unix, feature = "host"))]

use std::cell::RefCell;
use std::path::PathBuf;

use vecfill::host::{Extension, Generator, fill_slice};
use vecfill::runtime::{ABI_VERSION, Handle};

fn cdylib_path() -> Option<PathBuf> {
    let name = format!(
        "{}vecfill{}",
        std::env::consts::DLL_PREFIX,
        std::env::consts::DLL_SUFFIX
    );
    // target/<profile>/deps/<test-exe> -> target/<profile>
    let exe = std::env::current_exe().ok()?;
    exe.ancestors()
        .skip(1)
        .take(3)
        .map(|dir| dir.join(&name))
        .find(|candidate| candidate.is_file())
}

fn open() -> Option<Extension> {
    let Some(path) = cdylib_path() else {
        eprintln!("cdylib not found next to test binary; skipping");
        return None;
    };
    Some(Extension::open(&path).expect("built cdylib must load"))
}

thread_local! {
    static WRITES: RefCell<Vec<(u64, f64)>> = const { RefCell::new(Vec::new()) };
}

unsafe extern "C" fn record(_handle: Handle, index: u64, value: f64) {
    WRITES.with(|w| w.borrow_mut().push((index, value)));
}

#[test]
fn test_loaded_abi_version() {
    let Some(ext) = open() else { return };
    assert_eq!(ext.abi_version(), ABI_VERSION);
}

#[test]
fn test_loaded_fill_slice() {
    let Some(ext) = open() else { return };
    let mut buf = [0.0f64; 5];
    Generator::constant(7.5).install(|get| unsafe { ext.fill_slice(&mut buf, get) });
    assert_eq!(buf, [7.5; 5]);
}

#[test]
fn test_loaded_fill_order() {
    let Some(ext) = open() else { return };
    WRITES.with(|w| w.borrow_mut().clear());

    Generator::ramp(1.0, 1.0).install(|get| unsafe { ext.fill(Handle::null(), record, get, 3) });

    let writes = WRITES.with(|w| w.borrow().clone());
    assert_eq!(writes, vec![(0, 1.0), (1, 2.0), (2, 3.0)]);
}

#[test]
fn test_loaded_fill_zero_count() {
    let Some(ext) = open() else { return };
    WRITES.with(|w| w.borrow_mut().clear());

    Generator::constant(1.0).install(|get| unsafe { ext.fill(Handle::null(), record, get, 0) });

    assert!(WRITES.with(|w| w.borrow().is_empty()));
}

#[test]
fn test_loaded_fill_fn_while_open() {
    let Some(ext) = open() else { return };
    let mut buf = [0.0f64; 3];
    // SAFETY: `ext` is alive for the whole call.
    let fill = unsafe { ext.fill_fn() };
    Generator::ramp(0.5, 0.5).install(|get| unsafe { fill_slice(fill, &mut buf, get) });
    assert_eq!(buf, [0.5, 1.0, 1.5]);
}
