//! Configuration error types.

use thiserror::Error;

/// Fatal error raised while resolving the build configuration.
#[derive(Debug, Error)]
pub enum ConfigureError {
    #[error("`{command}` failed with exit code {}\n{output}", display_status(.status))]
    CommandFailed {
        command: String,
        /// `None` when the process was terminated by a signal.
        status: Option<i32>,
        output: String,
    },

    #[error("missing required configuration key `{key}`: {hint}")]
    MissingKey { key: String, hint: String },
}

fn display_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "<signal>".to_string(),
    }
}
