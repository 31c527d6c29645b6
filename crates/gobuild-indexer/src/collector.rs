//! Dependency graph collection
//!
//! Depth-first walk from the entry module. The first visit appends the
//! module to the [`DependencyTable`]. Reaching a finished module again from
//! an importer with a higher slot (a diamond) tombstones its earlier slot and
//! moves it, together with whatever it imports, above that importer; when its
//! slot is already higher nothing changes. A module that is still being
//! expanded further up the stack closes an import cycle and is not entered
//! again. Each source file is parsed at most once per collection.

use std::collections::{BTreeSet, HashMap, HashSet};

use gobuild_core::{BuildResult, DependencyTable, ModulePath};

use crate::extractor::ImportExtractor;

/// Modules needed to build an entry, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    pub table: DependencyTable,
    imports: HashMap<ModulePath, BTreeSet<ModulePath>>,
}

impl DependencyGraph {
    /// Direct local imports of `module`, empty if it was never collected.
    pub fn imports_of(&self, module: &ModulePath) -> impl Iterator<Item = &ModulePath> {
        self.imports.get(module).into_iter().flatten()
    }

    /// Compile order: highest discovery index first.
    pub fn build_order(&self) -> impl Iterator<Item = &ModulePath> {
        self.table.build_order().map(|(_, path)| path)
    }

    /// Link order: discovery index 0 first.
    pub fn link_order(&self) -> impl Iterator<Item = &ModulePath> {
        self.table.live().map(|(_, path)| path)
    }
}

/// Collect the entry module and everything it transitively imports.
///
/// The first read or parse failure aborts the collection.
pub fn collect<E: ImportExtractor>(
    extractor: &mut E,
    entry: &ModulePath,
) -> BuildResult<DependencyGraph> {
    let mut collector = Collector {
        extractor,
        graph: DependencyGraph::default(),
        expanding: HashSet::new(),
    };
    collector.visit(entry, None)?;

    let graph = collector.graph;
    tracing::debug!(
        "collected {} module(s) from {} ({} slot(s))",
        graph.table.live_count(),
        entry,
        graph.table.len()
    );
    Ok(graph)
}

struct Collector<'a, E> {
    extractor: &'a mut E,
    graph: DependencyGraph,
    expanding: HashSet<ModulePath>,
}

impl<E: ImportExtractor> Collector<'_, E> {
    /// `importer` is the slot of the module whose import led here.
    fn visit(&mut self, path: &ModulePath, importer: Option<usize>) -> BuildResult<()> {
        if self.expanding.contains(path) {
            tracing::warn!("import cycle through {}", path);
            return Ok(());
        }

        if let Some(index) = self.graph.table.index_of(path) {
            if importer.is_none_or(|importer| index > importer) {
                return Ok(());
            }
            tracing::trace!("revisiting {}, dropping slot {}", path, index);
            self.graph.table.tombstone(index);
        }

        let imports = match self.graph.imports.get(path) {
            Some(imports) => imports.clone(),
            None => {
                let imports = self.extractor.local_imports(path)?;
                self.graph.imports.insert(path.clone(), imports.clone());
                imports
            }
        };

        let index = self.graph.table.push(path.clone());
        tracing::trace!("{} -> slot {}", path, index);

        self.expanding.insert(path.clone());
        for import in &imports {
            self.visit(import, Some(index))?;
        }
        self.expanding.remove(path);

        Ok(())
    }
}
