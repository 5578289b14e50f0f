//! Project directory indexing and search.
//!
//! This crate watches a fixed root directory, indexes its immediate
//! subdirectories as projects, answers multi-term searches against their
//! names, and launches a terminal editor session for a selected project:
//! - Watch-driven incremental index unified with the initial scan
//! - Case-insensitive conjunctive term matching
//! - Host-facing result metadata and activation contract

pub mod activate;
pub mod error;
pub mod format;
pub mod index;
pub mod provider;
pub mod search;
pub mod types;

mod watcher;

// Re-export main types
pub use activate::{LaunchRequest, Launcher, LauncherConfig, TerminalLauncher};
pub use error::{ProviderError, Result};
pub use format::{filter_results, result_metas, wrap_text, RESULT_NAME_WRAP_WIDTH};
pub use index::ProjectIndex;
pub use provider::{default_projects_root, ProjectProvider};
pub use search::{search_projects, QueryTerms};
pub use types::{Project, ResultMeta, WatchEvent, WatchKind};
