//! Activation: translating a selected result into a process launch.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::{ProviderError, Result};
use crate::index::ProjectIndex;

/// A request to open a project in an external process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    /// Working directory the launched process starts in.
    pub workdir: PathBuf,
    /// Window title derived from the project name.
    pub title: String,
}

/// Collaborator that performs the actual launch.
///
/// The production implementation spawns a terminal emulator; tests swap in
/// a recording fake.
pub trait Launcher {
    fn launch(&self, request: &LaunchRequest) -> Result<()>;
}

/// Command-line shape of the terminal launch.
///
/// The exact command string is deployment configuration; the defaults
/// mirror the conventional alacritty + nvim setup.
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    pub terminal: String,
    pub window_class: String,
    pub title_prefix: String,
    pub editor: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            terminal: "alacritty".to_string(),
            window_class: "Neovim".to_string(),
            title_prefix: "Neovim".to_string(),
            editor: "nvim".to_string(),
        }
    }
}

impl LauncherConfig {
    /// Formats the window title for a project name.
    pub fn title_for(&self, name: &str) -> String {
        format!("{} {name}", self.title_prefix)
    }
}

/// Spawns a detached terminal-emulator process running the editor in the
/// project directory.
#[derive(Debug, Default)]
pub struct TerminalLauncher {
    config: LauncherConfig,
}

impl TerminalLauncher {
    pub fn new(config: LauncherConfig) -> Self {
        Self { config }
    }
}

impl Launcher for TerminalLauncher {
    fn launch(&self, request: &LaunchRequest) -> Result<()> {
        Command::new(&self.config.terminal)
            .arg("--class")
            .arg(&self.config.window_class)
            .arg("--title")
            .arg(&request.title)
            .arg("-e")
            .arg(&self.config.editor)
            .current_dir(&request.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|error| {
                ProviderError::Launch(format!(
                    "failed to spawn {} for {}: {error}",
                    self.config.terminal,
                    request.workdir.display()
                ))
            })?;
        Ok(())
    }
}

/// Resolves `id` and issues the launch.
///
/// An unknown id or a failing launcher is logged and swallowed; activation
/// is host-facing and never propagates an error.
pub fn activate(index: &ProjectIndex, launcher: &dyn Launcher, config: &LauncherConfig, id: &str) {
    match index.lookup(id) {
        Some(project) => {
            let request = LaunchRequest {
                workdir: project.path.clone(),
                title: config.title_for(&project.name),
            };
            if let Err(error) = launcher.launch(&request) {
                log::warn!("activation of {id} failed: {error}");
            }
        }
        None => log::warn!("failed to find project with id: {id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

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

    struct FailingLauncher;

    impl Launcher for FailingLauncher {
        fn launch(&self, _request: &LaunchRequest) -> Result<()> {
            Err(ProviderError::Launch("terminal not installed".to_string()))
        }
    }

    fn index_with_api() -> ProjectIndex {
        let mut index = ProjectIndex::new();
        index.upsert(PathBuf::from("/root/api"), "api".to_string());
        index
    }

    #[test]
    fn known_id_launches_with_workdir_and_title() {
        let index = index_with_api();
        let launcher = RecordingLauncher::default();
        activate(&index, &launcher, &LauncherConfig::default(), "api");

        let requests = launcher.requests.lock();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].workdir, PathBuf::from("/root/api"));
        assert_eq!(requests[0].title, "Neovim api");
    }

    #[test]
    fn unknown_id_issues_no_launch() {
        let index = index_with_api();
        let launcher = RecordingLauncher::default();
        activate(&index, &launcher, &LauncherConfig::default(), "missing");
        assert!(launcher.requests.lock().is_empty());
    }

    #[test]
    fn launcher_failure_does_not_propagate() {
        let index = index_with_api();
        activate(&index, &FailingLauncher, &LauncherConfig::default(), "api");
    }
}
