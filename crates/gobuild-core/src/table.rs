//! Dependency table: discovery-ordered module log with tombstones

use std::collections::HashMap;

use crate::model::ModulePath;

/// Append-only log of discovered modules plus a reverse lookup.
///
/// Slots are never removed. A module revisited during collection has its
/// earlier slot emptied (tombstoned) so indices already handed out stay
/// valid. Consumers build from the highest index down to 0 and skip empty
/// slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyTable {
    entries: Vec<Option<ModulePath>>,
    lookup: HashMap<ModulePath, usize>,
}

impl DependencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` at the next discovery index and return that index.
    pub fn push(&mut self, path: ModulePath) -> usize {
        let index = self.entries.len();
        self.lookup.insert(path.clone(), index);
        self.entries.push(Some(path));
        index
    }

    /// Discovery index of the live slot holding `path`.
    pub fn index_of(&self, path: &ModulePath) -> Option<usize> {
        self.lookup.get(path).copied()
    }

    /// Empty the slot at `index`, returning the module it held.
    pub fn tombstone(&mut self, index: usize) -> Option<ModulePath> {
        let path = self.entries.get_mut(index)?.take()?;
        if self.lookup.get(&path) == Some(&index) {
            self.lookup.remove(&path);
        }
        Some(path)
    }

    /// Number of slots, tombstones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    /// Live slots in discovery order (index 0 first). This is link order.
    pub fn live(&self) -> impl Iterator<Item = (usize, &ModulePath)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|path| (i, path)))
    }

    /// Live slots from the highest index down to 0. This is compile order.
    pub fn build_order(&self) -> impl Iterator<Item = (usize, &ModulePath)> {
        self.entries
            .iter()
            .enumerate()
            .rev()
            .filter_map(|(i, slot)| slot.as_ref().map(|path| (i, path)))
    }
}
