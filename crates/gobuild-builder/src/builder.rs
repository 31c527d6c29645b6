//! Incremental compile and link over a collected dependency graph

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use gobuild_core::{
    BuildError, BuildResult, ModulePath, Staleness, ToolchainConfig, check, check_any,
};
use gobuild_indexer::DependencyGraph;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::executor::{Invocation, execute};

/// What a build did, or would do in dry-run mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub entry: ModulePath,
    /// Executable path relative to the build root.
    pub target: PathBuf,
    /// Compile order, dependencies first.
    pub order: Vec<ModulePath>,
    pub compiled: Vec<ModulePath>,
    pub up_to_date: Vec<ModulePath>,
    pub linked: bool,
    pub dry_run: bool,
}

impl BuildReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn is_noop(&self) -> bool {
        self.compiled.is_empty() && !self.linked
    }
}

/// Drives the toolchain for one source tree.
pub struct Builder<'a> {
    root: PathBuf,
    toolchain: &'a ToolchainConfig,
    dry_run: bool,
}

impl<'a> Builder<'a> {
    pub fn new(root: impl Into<PathBuf>, toolchain: &'a ToolchainConfig) -> Self {
        Self {
            root: root.into(),
            toolchain,
            dry_run: false,
        }
    }

    /// Decide every step but spawn nothing.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Compile every stale module in build order, then link `entry` if any
    /// object changed.
    ///
    /// The first compile failure stops the build; nothing is linked after it.
    pub fn build(&self, entry: &ModulePath, graph: &DependencyGraph) -> BuildResult<BuildReport> {
        let mut report = BuildReport {
            entry: entry.clone(),
            target: entry.executable(),
            order: graph.build_order().cloned().collect(),
            compiled: Vec::new(),
            up_to_date: Vec::new(),
            linked: false,
            dry_run: self.dry_run,
        };

        let mut processed: HashSet<&ModulePath> = HashSet::new();
        let mut compiled: HashSet<&ModulePath> = HashSet::new();

        for module in graph.build_order() {
            let staleness = self.module_staleness(module, graph, &processed, &compiled)?;
            if staleness.must_rebuild() {
                info!("compiling {} ({:?})", module, staleness);
                if !self.dry_run {
                    self.compile(module)?;
                }
                compiled.insert(module);
                report.compiled.push(module.clone());
            } else {
                debug!("{} is up to date", module);
                report.up_to_date.push(module.clone());
            }
            processed.insert(module);
        }

        let objects: Vec<PathBuf> = graph
            .link_order()
            .map(|module| module.object_file(self.toolchain.object_tag()))
            .collect();

        let link = if report.compiled.is_empty() {
            let inputs: Vec<PathBuf> =
                objects.iter().map(|object| self.root.join(object)).collect();
            check_any(inputs.iter().map(PathBuf::as_path), &self.root.join(&report.target))?
        } else {
            Staleness::SourceNewer
        };

        if link.must_rebuild() {
            info!("linking {} ({:?})", report.target.display(), link);
            if !self.dry_run {
                self.link(&report.target, &objects)?;
            }
            report.linked = true;
        } else {
            debug!("{} is up to date", report.target.display());
        }

        Ok(report)
    }

    /// A module is stale when its own source is newer than its object, or
    /// when a dependency built earlier in this run changed.
    ///
    /// Imports not yet processed are back edges of an import cycle and are
    /// ignored.
    fn module_staleness(
        &self,
        module: &ModulePath,
        graph: &DependencyGraph,
        processed: &HashSet<&ModulePath>,
        compiled: &HashSet<&ModulePath>,
    ) -> BuildResult<Staleness> {
        let tag = self.toolchain.object_tag();
        let object = self.root.join(module.object_file(tag));

        let own = check(&self.root.join(module.source_file()), &object)?;
        if own.must_rebuild() {
            return Ok(own);
        }

        for import in graph.imports_of(module) {
            if !processed.contains(import) {
                continue;
            }
            if compiled.contains(import) {
                debug!("{} depends on freshly built {}", module, import);
                return Ok(Staleness::SourceNewer);
            }
            let newer = check(&self.root.join(import.object_file(tag)), &object)?;
            if newer.must_rebuild() {
                debug!("{} is older than {}", module, import);
                return Ok(newer);
            }
        }

        Ok(Staleness::UpToDate)
    }

    /// `<bin>/<arch>g <name>.go`, run inside the module's directory.
    fn compile(&self, module: &ModulePath) -> BuildResult<()> {
        let invocation = Invocation::new(self.toolchain.compiler())
            .arg(module.source_file_name())
            .current_dir(module.work_dir(&self.root));

        let status = execute(&invocation)?;
        if !status.success() {
            error!("error compiling {}", module.source_file().display());
            return Err(BuildError::CompileFailed {
                module: module.clone(),
                code: status.code(),
            });
        }
        Ok(())
    }

    /// `<bin>/<arch>l -o <target> <objects...>`, run at the build root.
    fn link(&self, target: &Path, objects: &[PathBuf]) -> BuildResult<()> {
        let invocation = Invocation::new(self.toolchain.linker())
            .arg("-o")
            .arg(target)
            .args(objects)
            .current_dir(&self.root);

        let status = execute(&invocation)?;
        if !status.success() {
            error!("error linking {}", target.display());
            return Err(BuildError::LinkFailed {
                target: target.to_path_buf(),
                code: status.code(),
            });
        }
        Ok(())
    }
}
