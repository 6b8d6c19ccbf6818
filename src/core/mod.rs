//! Configuration resolution: environment merging, platform defaults and
//! profile selection.

pub mod env;
pub mod error;
pub mod platform;
pub mod profile;
