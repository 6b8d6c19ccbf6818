//! Test utilities and mocks for configure unit tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use blasr_configure::test_support::MockExecutor;
//!
//! let exec = MockExecutor::new().with_output("uname -s", "Darwin\n");
//! let os = detect_and_apply(&exec, &mut env)?;
//! assert_eq!(exec.calls(), vec!["uname -s"]);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use anyhow::Result;

use crate::core::error::ConfigureError;
use crate::util::process::Executor;

/// Canned result for one command line.
#[derive(Debug, Clone)]
enum MockResponse {
    Success(String),
    Failure { status: i32, output: String },
}

/// Mock executor that records every command it is asked to run.
///
/// Commands without a registered response succeed with empty output.
#[derive(Default)]
pub struct MockExecutor {
    responses: HashMap<String, MockResponse>,
    calls: Mutex<Vec<(String, PathBuf)>>,
    hook: Option<Box<dyn Fn() + Send + Sync>>,
}

impl MockExecutor {
    /// Create a new mock executor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `command` with successful `output`.
    pub fn with_output(mut self, command: &str, output: &str) -> Self {
        self.responses
            .insert(command.to_string(), MockResponse::Success(output.to_string()));
        self
    }

    /// Respond to `command` with a nonzero exit `status`.
    pub fn with_failure(mut self, command: &str, status: i32, output: &str) -> Self {
        self.responses.insert(
            command.to_string(),
            MockResponse::Failure {
                status,
                output: output.to_string(),
            },
        );
        self
    }

    /// Run `hook` on every successful command (e.g. to fake its side effects).
    pub fn on_run(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Commands run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.lock_calls().iter().map(|(cmd, _)| cmd.clone()).collect()
    }

    /// Working directory at the time of each call.
    pub fn call_dirs(&self) -> Vec<PathBuf> {
        self.lock_calls().iter().map(|(_, dir)| dir.clone()).collect()
    }

    fn lock_calls(&self) -> MutexGuard<'_, Vec<(String, PathBuf)>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl fmt::Debug for MockExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockExecutor")
            .field("responses", &self.responses)
            .field("calls", &self.calls())
            .finish_non_exhaustive()
    }
}

impl Executor for MockExecutor {
    fn run(&self, command: &str) -> Result<String> {
        let cwd = std::env::current_dir().unwrap_or_default();
        self.lock_calls().push((command.to_string(), cwd));

        match self.responses.get(command) {
            Some(MockResponse::Failure { status, output }) => Err(ConfigureError::CommandFailed {
                command: command.to_string(),
                status: Some(*status),
                output: output.clone(),
            }
            .into()),
            Some(MockResponse::Success(output)) => {
                if let Some(hook) = &self.hook {
                    hook();
                }
                Ok(output.clone())
            }
            None => {
                if let Some(hook) = &self.hook {
                    hook();
                }
                Ok(String::new())
            }
        }
    }
}

static CWD_LOCK: Mutex<()> = Mutex::new(());

/// Serialize tests that read or change the process working directory.
pub fn cwd_lock() -> MutexGuard<'static, ()> {
    CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}
