//! blasr-configure - build configuration for the blasr C++ libraries
//!
//! Resolves the shell environment, `KEY=VALUE` arguments and OS defaults
//! into `defines.mk` and `pbdata/libconfig.h`, fetching vendored HDF5
//! headers when no HDF5 install is available.

pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for unit tests.
///
/// Only available under `cfg(test)`. Provides a recording mock
/// executor and a lock for tests that change the working directory.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{env::ResolvedEnv, error::ConfigureError, platform::OsKind, profile::Profile};
pub use ops::configure::{configure, ConfigureOutcome};
pub use util::context::ConfigureContext;
