//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;

/// Configure the blasr C++ libraries: fetch HDF5 headers if needed and
/// write defines.mk and pbdata/libconfig.h
#[derive(Parser)]
#[command(name = "configure")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Source tree root that receives the generated files
    #[arg(long, env = "BLASR_CONFIGURE_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Make-style overrides; they take precedence over the environment.
    /// Arguments without `=` (such as make flags) are ignored
    #[arg(value_name = "KEY=VALUE", trailing_var_arg = true, allow_hyphen_values = true)]
    pub vars: Vec<String>,
}
