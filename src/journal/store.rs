//! Journal store: the authoritative entry collection and its persistence
//!
//! The store owns the in-memory list of entries and keeps it durable as a
//! single JSON file (a bare array of entry objects) in an XDG-compliant data
//! directory. Storage failures never propagate: a failed read resets the
//! collection to empty and a failed write is logged and dropped.

use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::entry::{Entry, EntryIdGenerator};
use super::html::format_date;

/// File name of the persisted entry collection
const DATA_FILE: &str = "entries.json";

/// Owns and persists the logbook entry collection
///
/// Entries are kept in insertion order in memory; display ordering (newest
/// first) is applied by the renderer, not here.
#[derive(Debug)]
pub struct JournalStore {
    /// Path of the JSON data file
    path: PathBuf,
    /// Entry collection in insertion order
    entries: Vec<Entry>,
    /// Id source for new entries
    id_generator: EntryIdGenerator,
}

impl JournalStore {
    /// Creates a store backed by the XDG data directory
    ///
    /// Uses `~/.local/share/shiplog/entries.json` on Linux, or the
    /// equivalent path on other platforms. Returns `None` if the data
    /// directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "shiplog")?;
        Some(Self::with_path(project_dirs.data_dir().join(DATA_FILE)))
    }

    /// Creates a store backed by a specific data file
    ///
    /// Used by tests and by the `--data-dir` CLI flag.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            entries: Vec::new(),
            id_generator: EntryIdGenerator::new(),
        }
    }

    /// Returns the path of the data file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted collection from disk
    ///
    /// Any failure (missing file, unreadable file, corrupt JSON) resets the
    /// in-memory collection to empty. Never returns an error.
    pub fn load(&mut self) {
        self.entries = fs::read_to_string(&self.path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
    }

    /// Persists the full collection, replacing any prior file contents
    ///
    /// Write failures are logged and swallowed; persistence is best-effort.
    pub fn save(&self) {
        let json = match serde_json::to_string_pretty(&self.entries) {
            Ok(json) => json,
            Err(e) => {
                warn!("failed to serialize entries: {e}");
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("failed to create data directory: {e}");
                return;
            }
        }
        if let Err(e) = fs::write(&self.path, json) {
            warn!("failed to write {}: {e}", self.path.display());
        }
    }

    /// Adds a new entry and persists the collection
    ///
    /// Title and description are trimmed; the date must be a `YYYY-MM-DD`
    /// calendar date. If any field is empty after trimming, or the date does
    /// not parse, nothing happens and `None` is returned — rejection is a
    /// silent no-op, not an error.
    pub fn add(&mut self, title: &str, description: &str, date: &str) -> Option<&Entry> {
        let title = title.trim();
        let description = description.trim();
        let date = date.trim();
        if title.is_empty() || description.is_empty() || date.is_empty() {
            return None;
        }
        let date = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;

        let entry = Entry {
            id: self.id_generator.next_id(),
            title: title.to_string(),
            description: description.to_string(),
            date,
        };
        self.entries.push(entry);
        self.save();
        self.entries.last()
    }

    /// Removes the entry with the given id and persists
    ///
    /// Returns `false` (and does not persist) if no entry matches.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.entries.len() == before {
            return false;
        }
        self.save();
        true
    }

    /// Empties the collection and persists
    ///
    /// The user-facing confirmation gate lives in the app layer; this method
    /// is unconditional.
    pub fn clear_all(&mut self) {
        self.entries.clear();
        self.save();
    }

    /// Looks up an entry by id
    pub fn entry(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Returns the collection in insertion order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the collection is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Formats an entry as clipboard text: title, localized date, blank
    /// line, description
    pub fn copy_text(&self, id: &str) -> Option<String> {
        let entry = self.entry(id)?;
        Some(format!(
            "{}\n{}\n\n{}",
            entry.title,
            format_date(entry.date),
            entry.description
        ))
    }
}
