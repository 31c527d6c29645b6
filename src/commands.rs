//! CLI command implementations

use anyhow::Context;
use gobuild_builder::Builder;
use gobuild_core::{ModulePath, ToolchainConfig};
use gobuild_indexer::{GoImportExtractor, collect};
use std::ffi::OsString;
use std::path::PathBuf;

/// Collect, compile and link `entry`, then replace this process with it.
///
/// In dry-run mode the build report is printed instead and nothing runs.
pub fn build(
    root: PathBuf,
    entry: &str,
    args: Vec<OsString>,
    toolchain: &ToolchainConfig,
    dry_run: bool,
) -> anyhow::Result<()> {
    let root = std::path::absolute(&root)
        .with_context(|| format!("resolving source root {}", root.display()))?;
    let entry = ModulePath::from_arg(entry);
    tracing::info!("building {} in {}", entry, root.display());

    let mut extractor = GoImportExtractor::new(&root)?;
    let graph = collect(&mut extractor, &entry)
        .with_context(|| format!("collecting imports of {}", entry))?;

    tracing::info!(
        "{} module(s) to consider: {}",
        graph.table.live_count(),
        graph
            .build_order()
            .map(ModulePath::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    );

    let report = Builder::new(&root, toolchain)
        .dry_run(dry_run)
        .build(&entry, &graph)?;

    if dry_run {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    if report.is_noop() {
        tracing::info!("{} is up to date", report.target.display());
    }

    match gobuild_builder::run(&root, &report.target, &args)? {}
}
