//! App installation capability
//!
//! Models the deferred install prompt as an explicit one-shot capability
//! token: it starts `Absent`, the platform layer may signal it `Available`,
//! and consuming it (or detecting an existing installation) moves it to
//! `Consumed` permanently. Installation itself writes a freedesktop
//! launcher into the XDG applications directory so the logbook shows up as
//! a standalone app.

use directories::BaseDirs;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Launcher file name under the applications directory
const LAUNCHER_FILE: &str = "shiplog.desktop";

/// Errors from launcher installation
#[derive(Debug, Error)]
pub enum InstallError {
    /// Writing the launcher file failed
    #[error("failed to write launcher: {0}")]
    Io(#[from] std::io::Error),
}

/// State of the install capability token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallState {
    /// The platform has not offered installation
    Absent,
    /// Installation can be triggered once
    Available,
    /// The prompt was used or the app is already installed
    Consumed,
}

/// One-shot install prompt token
///
/// Transitions are one-way: `Absent -> Available -> Consumed`. Consuming a
/// token that is not available is a no-op, so a replayed prompt can never
/// fire twice.
#[derive(Debug, Clone, Copy)]
pub struct InstallPrompt {
    state: InstallState,
}

impl InstallPrompt {
    /// Creates a token with no install offer yet
    pub fn absent() -> Self {
        Self {
            state: InstallState::Absent,
        }
    }

    /// Returns the current token state
    pub fn state(&self) -> InstallState {
        self.state
    }

    /// Returns true when the install control should be shown enabled
    pub fn is_available(&self) -> bool {
        self.state == InstallState::Available
    }

    /// Platform signal: installation has become possible
    ///
    /// Ignored once the token is consumed.
    pub fn signal_available(&mut self) {
        if self.state == InstallState::Absent {
            self.state = InstallState::Available;
        }
    }

    /// Platform signal: the app is already installed
    pub fn mark_installed(&mut self) {
        self.state = InstallState::Consumed;
    }

    /// Consumes the token if it is available
    ///
    /// Returns true exactly once, on the `Available -> Consumed` edge.
    pub fn consume(&mut self) -> bool {
        if self.state == InstallState::Available {
            self.state = InstallState::Consumed;
            true
        } else {
            false
        }
    }
}

/// Writes the desktop launcher that makes the app installed
#[derive(Debug, Clone)]
pub struct LauncherInstaller {
    /// XDG applications directory receiving the launcher
    applications_dir: PathBuf,
}

impl LauncherInstaller {
    /// Creates an installer targeting the XDG applications directory
    ///
    /// Returns `None` when the user's data directory cannot be determined;
    /// in that case the install capability is simply never offered.
    pub fn new() -> Option<Self> {
        let base_dirs = BaseDirs::new()?;
        Some(Self {
            applications_dir: base_dirs.data_dir().join("applications"),
        })
    }

    /// Creates an installer targeting a specific directory (for tests)
    pub fn with_dir(applications_dir: PathBuf) -> Self {
        Self { applications_dir }
    }

    fn launcher_path(&self) -> PathBuf {
        self.applications_dir.join(LAUNCHER_FILE)
    }

    /// Returns true when the launcher already exists
    pub fn is_installed(&self) -> bool {
        self.launcher_path().exists()
    }

    /// Writes the launcher file
    pub fn install(&self) -> Result<(), InstallError> {
        let exec = std::env::current_exe()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "shiplog".to_string());
        let contents = format!(
            concat!(
                "[Desktop Entry]\n",
                "Type=Application\n",
                "Name=Shiplog\n",
                "Comment=Terminal logbook\n",
                "Exec={exec}\n",
                "Terminal=true\n",
                "Categories=Utility;\n"
            ),
            exec = exec
        );
        fs::create_dir_all(&self.applications_dir)?;
        fs::write(self.launcher_path(), contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prompt_starts_absent_and_cannot_be_consumed() {
        let mut prompt = InstallPrompt::absent();
        assert_eq!(prompt.state(), InstallState::Absent);
        assert!(!prompt.consume());
        assert_eq!(prompt.state(), InstallState::Absent);
    }

    #[test]
    fn test_prompt_consumes_exactly_once() {
        let mut prompt = InstallPrompt::absent();
        prompt.signal_available();
        assert!(prompt.is_available());

        assert!(prompt.consume());
        assert!(!prompt.consume(), "A consumed prompt cannot replay");
        assert_eq!(prompt.state(), InstallState::Consumed);
    }

    #[test]
    fn test_availability_signal_after_consumption_is_ignored() {
        let mut prompt = InstallPrompt::absent();
        prompt.signal_available();
        prompt.consume();

        prompt.signal_available();
        assert_eq!(prompt.state(), InstallState::Consumed);
    }

    #[test]
    fn test_mark_installed_consumes_directly() {
        let mut prompt = InstallPrompt::absent();
        prompt.mark_installed();
        assert_eq!(prompt.state(), InstallState::Consumed);
        assert!(!prompt.consume());
    }

    #[test]
    fn test_installer_writes_launcher() {
        let temp_dir = TempDir::new().unwrap();
        let installer = LauncherInstaller::with_dir(temp_dir.path().join("applications"));

        assert!(!installer.is_installed());
        installer.install().unwrap();
        assert!(installer.is_installed());

        let contents = fs::read_to_string(installer.launcher_path()).unwrap();
        assert!(contents.contains("[Desktop Entry]"));
        assert!(contents.contains("Name=Shiplog"));
    }
}
