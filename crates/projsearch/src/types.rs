//! Core types shared across the indexing and search modules.
//!
//! `Project` and `ResultMeta` cross the host API boundary and are
//! serde-derived; the watch event types stay internal to the crate.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// An indexed project directory.
///
/// `path` is the identity key: the index holds at most one project per
/// distinct path. `name` is the directory base name and doubles as the
/// externally visible identifier in the host contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub path: PathBuf,
}

/// The kind of a filesystem change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchKind {
    Created,
    Changed,
    ChangesDoneHint,
    Deleted,
}

/// A single filesystem change notification.
///
/// Live notify callbacks and the synthetic events of the initial scan both
/// take this shape, so cold start and live update share one handling path.
#[derive(Debug, Clone)]
pub struct WatchEvent {
    pub path: PathBuf,
    pub kind: WatchKind,
}

/// Display metadata for one search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultMeta {
    /// The project name, as returned from the result set.
    pub id: String,
    /// Display name, word-wrapped for the result tile.
    pub name: String,
    pub path: PathBuf,
}
