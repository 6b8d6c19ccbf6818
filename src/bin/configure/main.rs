//! configure - writes the build configuration for the blasr C++ libraries

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use blasr_configure::ops::update::WriteOutcome;
use blasr_configure::util::{ConfigureContext, SystemShell};

mod cli;

use cli::Cli;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("blasr_configure=debug")
    } else {
        EnvFilter::new("blasr_configure=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // The only read of the process environment.
    let ambient: Vec<(String, String)> = std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect();

    let ctx = ConfigureContext::new(&cli.root)?;
    ctx.ensure_source_tree()?;
    let executor = SystemShell::new();

    let outcome = blasr_configure::configure(&ctx, &executor, ambient, &cli.vars)?;

    let status = |w: WriteOutcome| match w {
        WriteOutcome::Written => "updated",
        WriteOutcome::Unchanged => "unchanged",
    };
    eprintln!(
        "  Configured {} for {} (defines.mk {}, libconfig.h {})",
        outcome.resolution.profile,
        outcome.resolution.os,
        status(outcome.report.defines_mk),
        status(outcome.report.libconfig_h)
    );

    Ok(())
}
