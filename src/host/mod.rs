//! Host-side collaborators
//!
//! The extension itself never uses this module. It exists for the `vecfill`
//! binary, tests and benches, which play the part of the host process:
//! - Loading the extension and resolving its symbols (library.rs, unix only)
//! - A setter that writes into `f64` buffers (buffer.rs)
//! - Zero-argument value producers exposed as C getters (generator.rs)

pub mod buffer;
pub mod generator;
#[cfg(unix)]
pub mod library;

pub use buffer::{fill_slice, write_f64};
pub use generator::{Generator, GeneratorError};
#[cfg(unix)]
pub use library::{Extension, ExtensionError};
