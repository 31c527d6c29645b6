//! Local import extraction

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::PathBuf;

use gobuild_core::{BuildError, BuildResult, ModulePath, is_local_import};

use crate::parser::{GoParser, ImportSpec};

/// Yields the local modules a module imports directly.
pub trait ImportExtractor {
    /// Resolved, normalized paths of the local imports of `module`.
    fn local_imports(&mut self, module: &ModulePath) -> BuildResult<BTreeSet<ModulePath>>;
}

/// Reads `<root>/<module>.go` and extracts its relative imports.
pub struct GoImportExtractor {
    root: PathBuf,
    parser: GoParser,
}

impl GoImportExtractor {
    pub fn new(root: impl Into<PathBuf>) -> BuildResult<Self> {
        Ok(Self {
            root: root.into(),
            parser: GoParser::new()?,
        })
    }
}

impl ImportExtractor for GoImportExtractor {
    fn local_imports(&mut self, module: &ModulePath) -> BuildResult<BTreeSet<ModulePath>> {
        let relative = module.source_file();
        let bytes = fs::read(self.root.join(&relative))
            .map_err(|e| BuildError::read(&relative, e))?;
        let source = String::from_utf8(bytes).map_err(|e| {
            BuildError::read(&relative, io::Error::new(io::ErrorKind::InvalidData, e))
        })?;

        let specs = self.parser.parse_imports(&relative, &source)?;
        let imports = resolve_local(module, &specs);

        tracing::debug!(
            "{}: {} import(s), {} local",
            relative.display(),
            specs.len(),
            imports.len()
        );
        Ok(imports)
    }
}

/// Keep the relative imports of `module` and resolve them against its
/// directory.
pub fn resolve_local(module: &ModulePath, specs: &[ImportSpec]) -> BTreeSet<ModulePath> {
    specs
        .iter()
        .filter(|spec| is_local_import(&spec.path))
        .map(|spec| module.resolve(&spec.path))
        .collect()
}
