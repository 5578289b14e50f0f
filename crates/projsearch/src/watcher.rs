//! Filesystem watching and the initial directory scan.
//!
//! The notify callback applies events straight to the shared index under
//! its write lock. The initial scan synthesizes `Created` events for
//! pre-existing children and feeds them through the same `apply_change`
//! path as live events, so cold start and live update share one code path.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use notify::{recommended_watcher, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;

use crate::error::{ProviderError, Result};
use crate::index::ProjectIndex;
use crate::types::{WatchEvent, WatchKind};

/// Children enumerated per page during the initial scan.
pub(crate) const SCAN_PAGE_SIZE: usize = 100;

/// Index state shared between the watcher callback, the scan task, and the
/// provider's query methods.
///
/// Every event applies under the write lock as one step, so readers never
/// observe a half-applied upsert.
#[derive(Debug)]
pub(crate) struct SharedIndex {
    pub(crate) root: PathBuf,
    pub(crate) data: RwLock<ProjectIndex>,
    closed: AtomicBool,
}

impl SharedIndex {
    pub(crate) fn new(root: PathBuf) -> Self {
        Self {
            root,
            data: RwLock::new(ProjectIndex::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Marks the index closed. Live callbacks and scan continuations check
    /// this and drop their events instead of applying them.
    pub(crate) fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Establishes the notify subscription on the root.
///
/// Called before the initial scan starts, so changes landing during the
/// listing are not lost. Setup failure is fatal to the provider.
pub(crate) fn subscribe(shared: Arc<SharedIndex>) -> Result<RecommendedWatcher> {
    let callback_shared = shared.clone();
    let mut watcher =
        recommended_watcher(move |event_result: notify::Result<Event>| match event_result {
            Ok(event) => apply_notify_event(callback_shared.as_ref(), event),
            Err(error) => {
                log::warn!(
                    "watch error on {}: {error}",
                    callback_shared.root.display()
                );
            }
        })
        .map_err(|error| {
            ProviderError::Watch(format!(
                "failed to create filesystem watcher for {}: {error}",
                shared.root.display()
            ))
        })?;

    // Only immediate children of the root are indexed
    watcher
        .watch(&shared.root, RecursiveMode::NonRecursive)
        .map_err(|error| {
            ProviderError::Watch(format!(
                "failed to watch {}: {error}",
                shared.root.display()
            ))
        })?;

    Ok(watcher)
}

fn apply_notify_event(shared: &SharedIndex, event: Event) {
    let Some(kind) = map_event_kind(&event.kind) else {
        return;
    };
    for path in event.paths {
        apply_change(shared, WatchEvent { path, kind });
    }
}

/// Maps a notify event kind onto the watch event vocabulary.
///
/// `Access` is noise and dropped; `Any`/`Other` carry no detail beyond
/// "something happened here" and are treated as a changes-done hint.
pub(crate) fn map_event_kind(kind: &EventKind) -> Option<WatchKind> {
    match kind {
        EventKind::Access(_) => None,
        EventKind::Create(_) => Some(WatchKind::Created),
        EventKind::Modify(_) => Some(WatchKind::Changed),
        EventKind::Remove(_) => Some(WatchKind::Deleted),
        _ => Some(WatchKind::ChangesDoneHint),
    }
}

/// Applies a single event to the shared index.
///
/// Created/changed events must resolve to a directory right now; deletions
/// are accepted unconditionally since the type can no longer be queried.
pub(crate) fn apply_change(shared: &SharedIndex, event: WatchEvent) {
    if shared.is_closed() {
        return;
    }
    if !is_direct_child(&shared.root, &event.path) {
        return;
    }

    match event.kind {
        WatchKind::Created | WatchKind::Changed | WatchKind::ChangesDoneHint => {
            if !event.path.is_dir() {
                return;
            }
            let Some(name) = base_name(&event.path) else {
                return;
            };
            shared.data.write().upsert(event.path, name);
        }
        WatchKind::Deleted => {
            shared.data.write().remove(&event.path);
        }
    }
}

pub(crate) fn is_direct_child(root: &Path, candidate: &Path) -> bool {
    candidate.parent().is_some_and(|parent| parent == root)
}

fn base_name(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}

/// Enumerates existing children of the root in pages, feeding each child
/// through `apply_change` as a synthetic `Created` event.
///
/// A listing failure is fatal to the scan only; the live subscription
/// keeps running on whatever was indexed so far. A scan that observes the
/// closed flag between pages abandons without applying further events.
pub(crate) async fn run_initial_scan(shared: &SharedIndex) -> Result<()> {
    let mut entries = tokio::fs::read_dir(&shared.root).await?;

    loop {
        if shared.is_closed() {
            return Ok(());
        }

        let mut page = Vec::with_capacity(SCAN_PAGE_SIZE);
        while page.len() < SCAN_PAGE_SIZE {
            match entries.next_entry().await? {
                Some(entry) => page.push(entry.path()),
                None => break,
            }
        }
        let exhausted = page.len() < SCAN_PAGE_SIZE;

        for path in page {
            apply_change(
                shared,
                WatchEvent {
                    path,
                    kind: WatchKind::Created,
                },
            );
        }

        if exhausted {
            return Ok(());
        }
        tokio::task::yield_now().await;
    }
}
