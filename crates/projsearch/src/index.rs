//! The live project collection, keyed by path.
//!
//! The primary map is keyed by path (the identity key); a secondary map
//! keyed by name backs O(1) lookup for the host contract. Both maps are
//! mutated together inside each operation, so callers holding the lock
//! never observe them out of step.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::types::Project;

#[derive(Debug, Default)]
pub struct ProjectIndex {
    by_path: BTreeMap<PathBuf, Project>,
    by_name: HashMap<String, PathBuf>,
}

impl ProjectIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the project at `path`.
    ///
    /// Last-write-wins: a rename delivered as a change event for the same
    /// path replaces the old name, and a second directory claiming an
    /// already-used name takes over that name in the lookup map.
    pub fn upsert(&mut self, path: PathBuf, name: String) {
        if let Some(previous) = self.by_path.remove(&path) {
            if self.by_name.get(&previous.name).is_some_and(|p| *p == path) {
                self.by_name.remove(&previous.name);
            }
        }
        self.by_name.insert(name.clone(), path.clone());
        self.by_path.insert(path.clone(), Project { name, path });
    }

    /// Removes the project at `path`. Absence is a no-op.
    pub fn remove(&mut self, path: &Path) {
        if let Some(previous) = self.by_path.remove(path) {
            if self.by_name.get(&previous.name).is_some_and(|p| p.as_path() == path) {
                self.by_name.remove(&previous.name);
            }
        }
    }

    /// Looks up a project by its externally visible name.
    ///
    /// When two paths have claimed the same name, this resolves to the most
    /// recent writer.
    pub fn lookup(&self, name: &str) -> Option<&Project> {
        self.by_name.get(name).and_then(|path| self.by_path.get(path))
    }

    /// Iterates projects in path order.
    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.by_path.values()
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }
}
