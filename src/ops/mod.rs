//! High-level operations

pub mod compose;
pub mod configure;
pub mod fetch;
pub mod update;

pub use configure::{configure, resolve, ConfigureOutcome, Resolution};
