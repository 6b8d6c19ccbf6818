//! Host platform detection and OS-specific link defaults.

use std::fmt;

use anyhow::Result;

use crate::core::env::ResolvedEnv;
use crate::util::process::Executor;

/// Command used to identify the host kernel.
pub const PLATFORM_QUERY: &str = "uname -s";

/// Shared-library filename suffix.
pub const SH_LIB_EXT: &str = "SH_LIB_EXT";
/// Linker flag spelling used to embed the library name.
pub const SET_LIB_NAME: &str = "SET_LIB_NAME";
/// Extra flags appended to shared-library link lines.
pub const EXTRA_LDFLAGS: &str = "EXTRA_LDFLAGS";

/// Keys the OS detector may fill, in emission order.
pub const PLATFORM_KEYS: &[&str] = &[EXTRA_LDFLAGS, SET_LIB_NAME, SH_LIB_EXT];

/// Operating systems the native build knows how to link for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsKind {
    Linux,
    Darwin,
    Unknown,
}

impl OsKind {
    /// Classify the output of [`PLATFORM_QUERY`].
    ///
    /// `Darwin` is checked before `Linux`.
    pub fn classify(output: &str) -> OsKind {
        if output.contains("Darwin") {
            OsKind::Darwin
        } else if output.contains("Linux") {
            OsKind::Linux
        } else {
            OsKind::Unknown
        }
    }

    /// Default link settings for this OS.
    pub fn defaults(self) -> &'static [(&'static str, &'static str)] {
        match self {
            OsKind::Darwin => &[
                (SH_LIB_EXT, ".dylib"),
                (SET_LIB_NAME, "-install_name"),
                (EXTRA_LDFLAGS, "-flat_namespace"),
            ],
            OsKind::Linux | OsKind::Unknown => &[(SH_LIB_EXT, ".so"), (SET_LIB_NAME, "-soname")],
        }
    }

    /// Fill this OS's defaults into `env` without touching keys already set.
    pub fn apply_defaults(self, env: &mut ResolvedEnv) {
        for (key, value) in self.defaults() {
            if !env.fill(*key, *value) {
                tracing::debug!("keeping {}={:?}", key, env.get(key).unwrap_or_default());
            }
        }
    }
}

impl fmt::Display for OsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsKind::Linux => write!(f, "linux"),
            OsKind::Darwin => write!(f, "darwin"),
            OsKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Query the host OS once and fill its defaults into `env`.
///
/// A failing platform query aborts; no partial defaults are applied.
pub fn detect_and_apply(executor: &dyn Executor, env: &mut ResolvedEnv) -> Result<OsKind> {
    let output = executor.run(PLATFORM_QUERY)?;
    let os = OsKind::classify(&output);
    tracing::debug!("detected host OS: {}", os);

    os.apply_defaults(env);
    Ok(os)
}
