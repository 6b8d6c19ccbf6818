//! The configure pipeline.
//!
//! Stages run strictly in order, each owning the environment in turn:
//!
//! 1. merge ambient environment and `KEY=VALUE` tokens (tokens win)
//! 2. fill OS defaults (fill-if-absent)
//! 3. select the profile (may overwrite `HDF5_INC` from its alias)
//! 4. fill profile defaults (fill-if-absent)
//! 5. fetch vendored headers if the profile needs them (overwrites
//!    `HDF_HEADERS`)
//! 6. compose both artifacts
//! 7. write them
//!
//! Nothing is written until every earlier stage has succeeded.

use anyhow::Result;

use crate::core::env::ResolvedEnv;
use crate::core::platform::{self, OsKind};
use crate::core::profile::{select_profile, Profile, HDF_HEADERS};
use crate::ops::compose::{compose, Artifacts};
use crate::ops::fetch::HeaderFetcher;
use crate::ops::update::{update, UpdateReport};
use crate::util::context::ConfigureContext;
use crate::util::process::Executor;

/// Everything decided before anything is written.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub os: OsKind,
    pub profile: Profile,
    pub warnings: Vec<String>,
    pub env: ResolvedEnv,
    pub artifacts: Artifacts,
}

/// Outcome of a full configure run.
#[derive(Debug, Clone)]
pub struct ConfigureOutcome {
    pub resolution: Resolution,
    pub report: UpdateReport,
}

/// Resolve the configuration and compose both artifacts.
///
/// May fetch the vendored headers; writes nothing else.
pub fn resolve(
    ctx: &ConfigureContext,
    executor: &dyn Executor,
    mut env: ResolvedEnv,
) -> Result<Resolution> {
    let os = platform::detect_and_apply(executor, &mut env)?;

    let selection = select_profile(&mut env)?;
    let profile = selection.profile;
    profile.apply_defaults(&mut env);

    if profile.needs_vendored_headers() {
        let headers = HeaderFetcher::new(ctx.hdf_dir()).ensure(executor)?;
        env.set(HDF_HEADERS, headers);
    }

    let artifacts = compose(profile, &env);

    Ok(Resolution {
        os,
        profile,
        warnings: selection.warnings,
        env,
        artifacts,
    })
}

/// Run the whole pipeline from ambient environment and command tokens.
pub fn configure<A, K, V, T, S>(
    ctx: &ConfigureContext,
    executor: &dyn Executor,
    ambient: A,
    tokens: T,
) -> Result<ConfigureOutcome>
where
    A: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
    T: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tracing::info!("configuring {}", ctx.root().display());
    let env = ResolvedEnv::merge(ambient, tokens);
    let resolution = resolve(ctx, executor, env)?;
    let report = update(ctx, &resolution.artifacts)?;

    Ok(ConfigureOutcome { resolution, report })
}
