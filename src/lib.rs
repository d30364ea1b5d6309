//! Native extension that fills host-owned buffers through host callbacks
//!
//! Built as a `cdylib`, this library exports a single C-ABI routine, `fill`,
//! that a host process resolves by name after `dlopen` and calls by address.
//! The rlib target is used by the `vecfill` binary, tests and benches.

// Runtime is always included (it's all the cdylib exports)
pub mod runtime;

// Host-side tooling, only with the `host` feature
#[cfg(feature = "host")]
pub mod host;

pub use runtime::*;
