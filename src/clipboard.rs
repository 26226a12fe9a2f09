//! System clipboard access
//!
//! A small trait seam over `arboard` so the app can copy entry text without
//! tests needing a real clipboard. Clipboard failure is never surfaced to
//! the user; callers log and move on.

use thiserror::Error;

/// Errors from clipboard access
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// The platform clipboard is unavailable or rejected the write
    #[error("clipboard error: {0}")]
    Platform(#[from] arboard::Error),
}

/// Write access to a clipboard
pub trait Clipboard: Send {
    /// Places the given text on the clipboard
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The system clipboard, initialized lazily
///
/// Initialization is deferred to the first copy so that headless
/// environments (no display server) only fail when the user actually asks
/// for a copy.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    /// Creates a clipboard handle without touching the platform yet
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure(&mut self) -> Result<&mut arboard::Clipboard, ClipboardError> {
        if self.inner.is_none() {
            self.inner = Some(arboard::Clipboard::new()?);
        }
        // Just initialized above when absent
        Ok(self.inner.as_mut().expect("clipboard initialized"))
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.ensure()?.set_text(text.to_string())?;
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// In-memory clipboard double recording copied text
    #[derive(Default)]
    pub struct RecordingClipboard {
        /// Every text copied, in order
        pub copied: Vec<String>,
        /// When true, every copy fails
        pub fail: bool,
    }

    impl Clipboard for RecordingClipboard {
        fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError::Platform(arboard::Error::ContentNotAvailable));
            }
            self.copied.push(text.to_string());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingClipboard;
    use super::*;

    #[test]
    fn test_recording_clipboard_stores_text() {
        let mut clipboard = RecordingClipboard::default();
        clipboard.copy("Dive log\n01/05/2024\n\nSaw a shark").unwrap();
        assert_eq!(clipboard.copied.len(), 1);
        assert!(clipboard.copied[0].starts_with("Dive log"));
    }

    #[test]
    fn test_recording_clipboard_can_fail() {
        let mut clipboard = RecordingClipboard {
            fail: true,
            ..Default::default()
        };
        assert!(clipboard.copy("text").is_err());
        assert!(clipboard.copied.is_empty());
    }
}
