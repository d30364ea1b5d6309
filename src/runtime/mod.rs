//! Runtime kernel exported to hosts
//!
//! This module is everything the loaded library does. It separates:
//! - C ABI types and version constants (abi.rs)
//! - The fill loop itself, free of any C types (fill.rs)
//! - Extern "C" symbols resolved by hosts after dlopen (stubs.rs)
//!
//! Nothing in here allocates, logs or reports errors; hosts own every
//! resource the exported routine touches.

pub mod abi;
pub mod abi_tests;
pub mod fill;
pub mod stubs;

pub use abi::{ABI_VERSION, FillFn, GetFn, Handle, SetFn};
pub use fill::fill_with;
