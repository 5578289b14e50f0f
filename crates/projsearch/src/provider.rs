//! The provider context object and the host-facing contract.
//!
//! One `ProjectProvider` owns the shared index, the watcher handle, and
//! the initial-scan task. The host constructs it on enable and closes it
//! on disable; there is no process-wide state.

use std::path::PathBuf;
use std::sync::Arc;

use notify::{RecommendedWatcher, Watcher};
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::activate::{activate, Launcher, LauncherConfig, TerminalLauncher};
use crate::error::{ProviderError, Result};
use crate::format::{filter_results, result_metas};
use crate::search::search_projects;
use crate::types::ResultMeta;
use crate::watcher::{run_initial_scan, subscribe, SharedIndex};

/// The conventional projects root: a `dev` directory under the user's
/// home.
pub fn default_projects_root() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join("dev"))
        .ok_or_else(|| ProviderError::InvalidRoot("home directory not resolvable".to_string()))
}

/// Watch-driven project index with the search/activation contract on top.
pub struct ProjectProvider {
    shared: Arc<SharedIndex>,
    watcher: Mutex<Option<RecommendedWatcher>>,
    scan_task: Mutex<Option<JoinHandle<()>>>,
    launcher: Box<dyn Launcher + Send + Sync>,
    launcher_config: LauncherConfig,
}

impl std::fmt::Debug for ProjectProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectProvider")
            .field("shared", &self.shared)
            .field("watcher", &"<watcher>")
            .finish()
    }
}

impl ProjectProvider {
    /// Starts a provider over `root` with the default terminal launcher.
    ///
    /// Must run inside a tokio runtime; the initial scan is spawned onto
    /// it.
    pub fn start(root: PathBuf) -> Result<Self> {
        let config = LauncherConfig::default();
        let launcher = TerminalLauncher::new(config.clone());
        Self::start_with_launcher(root, Box::new(launcher), config)
    }

    /// Starts a provider with a caller-supplied launch collaborator.
    ///
    /// The subscription is established before the initial listing begins,
    /// so changes landing during the listing are not lost. A subscription
    /// failure is fatal; a later scan failure only leaves the index
    /// partially populated.
    pub fn start_with_launcher(
        root: PathBuf,
        launcher: Box<dyn Launcher + Send + Sync>,
        launcher_config: LauncherConfig,
    ) -> Result<Self> {
        let metadata = std::fs::metadata(&root).map_err(|error| {
            ProviderError::InvalidRoot(format!(
                "unable to access root path {}: {error}",
                root.display()
            ))
        })?;
        if !metadata.is_dir() {
            return Err(ProviderError::InvalidRoot(format!(
                "root path {} is not a directory",
                root.display()
            )));
        }

        let shared = Arc::new(SharedIndex::new(root));
        let watcher = subscribe(shared.clone())?;

        let scan_shared = shared.clone();
        let scan_task = tokio::spawn(async move {
            if let Err(error) = run_initial_scan(&scan_shared).await {
                log::warn!(
                    "initial scan of {} aborted: {error}",
                    scan_shared.root.display()
                );
            }
        });

        Ok(Self {
            shared,
            watcher: Mutex::new(Some(watcher)),
            scan_task: Mutex::new(Some(scan_task)),
            launcher,
            launcher_config,
        })
    }

    /// Returns the ids of all projects whose name matches every term.
    pub fn get_initial_result_set(&self, terms: &[String]) -> Vec<String> {
        search_projects(&self.shared.data.read(), terms)
    }

    /// Narrows a previous result set.
    ///
    /// Defined as a full re-run against the whole index rather than a
    /// filter of `_previous_results`, so a result stays correct when the
    /// index changed between calls.
    pub fn get_subsearch_result_set(
        &self,
        _previous_results: &[String],
        terms: &[String],
    ) -> Vec<String> {
        self.get_initial_result_set(terms)
    }

    /// Maps result ids to display metadata; unknown ids are skipped.
    pub fn get_result_metas(&self, ids: &[String]) -> Vec<ResultMeta> {
        result_metas(&self.shared.data.read(), ids)
    }

    /// Truncates a result set to at most `max` entries.
    pub fn filter_results(&self, results: Vec<String>, max: usize) -> Vec<String> {
        filter_results(results, max)
    }

    /// Launches the project selected by `id`. Unknown ids and launch
    /// failures are logged, never raised.
    pub fn activate_result(&self, id: &str) {
        activate(
            &self.shared.data.read(),
            self.launcher.as_ref(),
            &self.launcher_config,
            id,
        );
    }

    /// Number of projects currently indexed.
    pub fn len(&self) -> usize {
        self.shared.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.data.read().is_empty()
    }

    /// Waits for the initial scan to finish. Queries issued earlier are
    /// valid; they just observe a partially populated index.
    pub async fn wait_for_initial_scan(&self) {
        let task = self.scan_task.lock().take();
        if let Some(task) = task {
            let _ = task.await;
        }
    }

    /// Releases the watch subscription and abandons any in-flight scan.
    ///
    /// The OS-level watch handle leaks for the process lifetime if this is
    /// skipped; `Drop` also calls it.
    pub fn close(&self) {
        self.shared.close();
        if let Some(task) = self.scan_task.lock().take() {
            task.abort();
        }
        if let Some(mut watcher) = self.watcher.lock().take() {
            if let Err(error) = watcher.unwatch(&self.shared.root) {
                log::debug!(
                    "unwatch of {} failed: {error}",
                    self.shared.root.display()
                );
            }
        }
    }
}

impl Drop for ProjectProvider {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activate::LaunchRequest;
    use std::fs;

    #[derive(Default)]
    struct RecordingLauncher {
        requests: Mutex<Vec<LaunchRequest>>,
    }

    impl Launcher for RecordingLauncher {
        fn launch(&self, request: &LaunchRequest) -> Result<()> {
            self.requests.lock().push(request.clone());
            Ok(())
        }
    }

    fn start_over(dir: &std::path::Path) -> (ProjectProvider, Arc<RecordingLauncher>) {
        let launcher = Arc::new(RecordingLauncher::default());
        let provider = ProjectProvider::start_with_launcher(
            dir.to_path_buf(),
            Box::new(launcher.clone()),
            LauncherConfig::default(),
        )
        .unwrap();
        (provider, launcher)
    }

    impl Launcher for Arc<RecordingLauncher> {
        fn launch(&self, request: &LaunchRequest) -> Result<()> {
            self.as_ref().launch(request)
        }
    }

    #[tokio::test]
    async fn initial_scan_populates_index() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("api")).unwrap();
        fs::create_dir(dir.path().join("web")).unwrap();

        let (provider, _) = start_over(dir.path());
        provider.wait_for_initial_scan().await;

        assert_eq!(provider.len(), 2);
        let metas = provider.get_result_metas(&["api".to_string()]);
        assert_eq!(metas[0].path, dir.path().join("api"));
    }

    #[tokio::test]
    async fn search_contract_matches_terms_conjunctively() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["api", "api-server", "web"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }

        let (provider, _) = start_over(dir.path());
        provider.wait_for_initial_scan().await;

        let results = provider.get_initial_result_set(&["ap".to_string()]);
        assert_eq!(results, vec!["api", "api-server"]);

        let narrowed = provider
            .get_subsearch_result_set(&results, &["ap".to_string(), "serv".to_string()]);
        assert_eq!(narrowed, vec!["api-server"]);
    }

    #[tokio::test]
    async fn filter_results_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let (provider, _) = start_over(dir.path());
        let results = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(provider.filter_results(results, 2), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn activation_launches_selected_project() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("api")).unwrap();

        let (provider, launcher) = start_over(dir.path());
        provider.wait_for_initial_scan().await;

        provider.activate_result("api");
        let requests = launcher.requests.lock();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].workdir, dir.path().join("api"));
        assert_eq!(requests[0].title, "Neovim api");
    }

    #[tokio::test]
    async fn activation_of_unknown_id_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let (provider, launcher) = start_over(dir.path());
        provider.wait_for_initial_scan().await;

        provider.activate_result("missing");
        assert!(launcher.requests.lock().is_empty());
    }

    #[tokio::test]
    async fn start_fails_on_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            ProjectProvider::start(missing),
            Err(ProviderError::InvalidRoot(_))
        ));
    }

    #[tokio::test]
    async fn start_fails_on_file_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("root.txt");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            ProjectProvider::start(file),
            Err(ProviderError::InvalidRoot(_))
        ));
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let (provider, _) = start_over(dir.path());
        provider.close();
        provider.close();
        assert!(provider.get_initial_result_set(&[]).is_empty());
    }
}
