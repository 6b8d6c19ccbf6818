//! Writing generated artifacts without disturbing unchanged files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::ops::compose::Artifacts;
use crate::util::context::{ConfigureContext, DEFINES_MK};
use crate::util::fs::{entry_exists, read_if_exists, relative_path, symlink, write_string};

/// What [`write_if_changed`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Unchanged,
}

/// What happened to one subdirectory's `defines.mk` link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    Created(PathBuf),
    /// Something is already there; it is left alone.
    Exists(PathBuf),
    /// The subdirectory itself does not exist.
    MissingDir(PathBuf),
}

/// Summary of one [`update`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub defines_mk: WriteOutcome,
    pub libconfig_h: WriteOutcome,
    /// Empty unless run from the root directory.
    pub links: Vec<LinkOutcome>,
}

/// Write `content` to `path` unless the file already holds exactly that.
///
/// Parent directories are created as needed. An unchanged file keeps its
/// modification time.
pub fn write_if_changed(path: &Path, content: &str) -> Result<WriteOutcome> {
    if let Some(current) = read_if_exists(path)? {
        if current == content.as_bytes() {
            tracing::debug!("{} is up to date", path.display());
            return Ok(WriteOutcome::Unchanged);
        }
    }

    tracing::info!("writing to {}", path.display());
    tracing::debug!("\"\"\"\n{}\"\"\"", content);
    write_string(path, content)?;
    Ok(WriteOutcome::Written)
}

/// Write both artifacts, then link `defines.mk` into the library
/// subdirectories when running from the root.
pub fn update(ctx: &ConfigureContext, artifacts: &Artifacts) -> Result<UpdateReport> {
    let defines_mk = write_if_changed(&ctx.defines_path(), &artifacts.defines_mk)?;
    let libconfig_h = write_if_changed(&ctx.libconfig_path(), &artifacts.libconfig_h)?;

    let links = if ctx.runs_from_root() {
        link_subdirs(ctx)?
    } else {
        Vec::new()
    };

    Ok(UpdateReport {
        defines_mk,
        libconfig_h,
        links,
    })
}

/// Create `<sub>/defines.mk -> ../defines.mk` wherever nothing exists yet.
pub fn link_subdirs(ctx: &ConfigureContext) -> Result<Vec<LinkOutcome>> {
    let canonical = ctx.defines_path();
    let mut outcomes = Vec::new();

    for sub in ctx.subdirs() {
        let link = sub.join(DEFINES_MK);

        if !sub.is_dir() {
            tracing::debug!("skipping link in missing directory {}", sub.display());
            outcomes.push(LinkOutcome::MissingDir(sub));
            continue;
        }
        if entry_exists(&link) {
            outcomes.push(LinkOutcome::Exists(link));
            continue;
        }

        let target = relative_path(&sub, &canonical);
        symlink(&target, &link).with_context(|| {
            format!(
                "failed to link {} -> {}",
                link.display(),
                target.display()
            )
        })?;
        tracing::info!("linked {} -> {}", link.display(), target.display());
        outcomes.push(LinkOutcome::Created(link));
    }

    Ok(outcomes)
}
