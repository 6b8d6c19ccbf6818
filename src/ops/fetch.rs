//! Fetching of the vendored HDF5 header bundle.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::fs::{ensure_dir, WorkingDirGuard};
use crate::util::process::Executor;

/// Version-pinned name of the header bundle directory.
pub const HDF5_HEADERS_VERSION: &str = "hdf5-1.8.12-headers";

/// Where the header bundle is downloaded from.
pub const HDF5_HEADERS_URL: &str =
    "https://www.dropbox.com/s/8971bcyy5o42rxb/hdf5-1.8.12-headers.tar.bz2?dl=0";

/// Ensures the vendored HDF5 headers exist under a given `hdf/` directory.
#[derive(Debug, Clone)]
pub struct HeaderFetcher {
    hdf_dir: PathBuf,
    version: String,
    url: String,
}

impl HeaderFetcher {
    /// Fetcher for the pinned header bundle, extracted into `hdf_dir`.
    pub fn new(hdf_dir: impl Into<PathBuf>) -> Self {
        HeaderFetcher {
            hdf_dir: hdf_dir.into(),
            version: HDF5_HEADERS_VERSION.to_string(),
            url: HDF5_HEADERS_URL.to_string(),
        }
    }

    /// Directory the bundle unpacks into.
    pub fn target_dir(&self) -> PathBuf {
        self.hdf_dir.join(&self.version)
    }

    /// Path of the bundle as seen from the sibling library directories.
    pub fn make_relative_path(&self) -> String {
        format!("../hdf/{}", self.version)
    }

    /// The download-and-unpack command line.
    ///
    /// `curl -f` sends nothing down the pipe on an HTTP error, so tar fails
    /// instead of unpacking an error page.
    pub fn fetch_command(&self) -> String {
        format!("curl -f -k -L '{}' | tar xjf -", self.url)
    }

    /// Fetch the bundle unless it is already present.
    ///
    /// Returns the make-relative path of the header directory. A failing
    /// fetch is not retried.
    pub fn ensure(&self, executor: &dyn Executor) -> Result<String> {
        let target = self.target_dir();
        if target.is_dir() {
            tracing::debug!("vendored headers present at {}", target.display());
            return Ok(self.make_relative_path());
        }

        ensure_dir(&self.hdf_dir)?;
        tracing::info!("fetching {} into {}", self.version, self.hdf_dir.display());
        fetch_in(&self.hdf_dir, executor, &self.fetch_command())
            .with_context(|| format!("failed to fetch {}", self.version))?;

        Ok(self.make_relative_path())
    }
}

/// Run `command` from inside `dir`, returning to the original directory
/// afterwards whether or not it succeeds.
fn fetch_in(dir: &Path, executor: &dyn Executor, command: &str) -> Result<()> {
    let _cwd = WorkingDirGuard::enter(dir)?;
    executor.run(command)?;
    Ok(())
}
