//! gobuild CLI entry point

use anyhow::Context;
use clap::Parser;
use gobuild_core::{Arch, ToolchainConfig};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "gobuild", version)]
#[command(about = "Build a Go program from its local imports, then run it", long_about = None)]
struct Cli {
    /// Entry module; a trailing .go is ignored
    entry: String,

    /// Arguments passed on to the built program
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<OsString>,

    /// Directory holding the compiler and linker (looked up in PATH if unset)
    #[arg(short, long, env = "GOBIN")]
    bin_dir: Option<PathBuf>,

    /// Target architecture: 5|arm, 6|amd64, 8|386
    #[arg(short, long, env = "GOARCH", default_value = "6")]
    arch: Arch,

    /// Source tree root
    #[arg(short = 'C', long, default_value = ".")]
    root: PathBuf,

    /// Print the build plan as JSON without compiling, linking or running
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Report compile and link steps
    #[arg(short, long)]
    verbose: bool,

    /// Report every spawned command
    #[arg(short, long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_env("GOBUILD_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("gobuild={}", log_level)));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("gobuild v{}", env!("CARGO_PKG_VERSION"));

    // The compiler runs inside module directories, so a relative toolchain
    // path has to be pinned first.
    let bin_dir = cli
        .bin_dir
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(std::path::absolute)
        .transpose()
        .context("resolving toolchain directory")?;
    let toolchain = ToolchainConfig::new(bin_dir, cli.arch);
    tracing::debug!("toolchain: {:?}", toolchain);

    commands::build(cli.root, &cli.entry, cli.args, &toolchain, cli.dry_run)
}
