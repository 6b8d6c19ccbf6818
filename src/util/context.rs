//! Paths and locations for a configure run.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::util::fs::normalize_path;

/// Name of the generated makefile fragment.
pub const DEFINES_MK: &str = "defines.mk";

/// Name of the generated feature header.
pub const LIBCONFIG_H: &str = "libconfig.h";

/// Subdirectories whose makefiles include `defines.mk`.
pub const SUBDIRS: &[&str] = &["pbdata", "hdf", "alignment", "unittest"];

/// Root directory and working directory of one configure invocation.
#[derive(Debug, Clone)]
pub struct ConfigureContext {
    /// Source tree root; outputs are written relative to it.
    root: PathBuf,

    /// Current working directory
    cwd: PathBuf,
}

impl ConfigureContext {
    /// Create a context rooted at `root`, using the process working directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(root, cwd))
    }

    /// Create a context with an explicit working directory.
    pub fn with_cwd(root: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
        let cwd = cwd.into();
        let root = root.into();
        let root = if root.is_absolute() {
            root
        } else {
            cwd.join(root)
        };
        ConfigureContext { root, cwd }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/defines.mk`
    pub fn defines_path(&self) -> PathBuf {
        self.root.join(DEFINES_MK)
    }

    /// `<root>/pbdata/libconfig.h`
    pub fn libconfig_path(&self) -> PathBuf {
        self.root.join("pbdata").join(LIBCONFIG_H)
    }

    /// `<root>/hdf`, parent of the vendored header directory.
    pub fn hdf_dir(&self) -> PathBuf {
        self.root.join("hdf")
    }

    /// Subdirectories that should carry a `defines.mk` link.
    pub fn subdirs(&self) -> impl Iterator<Item = PathBuf> + '_ {
        SUBDIRS.iter().map(|sub| self.root.join(sub))
    }

    /// Fail unless the root holds at least one of the library subdirectories.
    pub fn ensure_source_tree(&self) -> Result<()> {
        if self.subdirs().any(|sub| sub.is_dir()) {
            return Ok(());
        }
        bail!(
            "{} does not look like a blasr source tree (none of {} found); \
             run from the tree root or pass --root",
            self.root.display(),
            SUBDIRS.join(", ")
        )
    }

    /// Whether the invocation runs from the root itself.
    pub fn runs_from_root(&self) -> bool {
        normalize_path(&self.cwd) == normalize_path(&self.root)
    }
}
