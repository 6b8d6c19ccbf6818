//! Subprocess execution utilities.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use anyhow::{Context, Result};

use crate::core::error::ConfigureError;

/// Runs shell command lines on behalf of the configure pipeline.
///
/// The OS detector and the header fetcher only talk to the outside world
/// through this trait, so tests can substitute canned output.
pub trait Executor {
    /// Run `command` and return its combined stdout/stderr.
    ///
    /// A nonzero exit status is an error ([`ConfigureError::CommandFailed`]).
    fn run(&self, command: &str) -> Result<String>;
}

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
        }
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Execute the command and wait for completion.
    pub fn exec(&self) -> Result<Output> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        cmd.output()
            .with_context(|| format!("failed to execute `{}`", self.display_command()))
    }

    /// Execute and require success, returning stdout followed by stderr.
    pub fn exec_combined(&self) -> Result<String> {
        let output = self.exec()?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(ConfigureError::CommandFailed {
                command: self.display_command(),
                status: output.status.code(),
                output: combined,
            }
            .into());
        }

        Ok(combined)
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Executor that runs command lines through the system `sh`.
#[derive(Debug, Clone)]
pub struct SystemShell {
    shell: PathBuf,
}

impl SystemShell {
    /// Locate `sh` on `PATH`, falling back to `/bin/sh`.
    pub fn new() -> Self {
        let shell = find_executable("sh").unwrap_or_else(|| PathBuf::from("/bin/sh"));
        SystemShell { shell }
    }
}

impl Default for SystemShell {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for SystemShell {
    fn run(&self, command: &str) -> Result<String> {
        tracing::debug!("{}", command);

        let output = ProcessBuilder::new(&self.shell)
            .args(["-c", command])
            .exec_combined()
            .map_err(|err| match err.downcast::<ConfigureError>() {
                // Report the command line the caller asked for, not `sh -c ...`
                Ok(ConfigureError::CommandFailed { status, output, .. }) => {
                    ConfigureError::CommandFailed {
                        command: command.to_string(),
                        status,
                        output,
                    }
                    .into()
                }
                Ok(other) => other.into(),
                Err(err) => err,
            })?;

        Ok(output)
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}
