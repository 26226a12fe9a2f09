//! Application state management for shiplog
//!
//! This module contains the main application state: the entry form, the
//! list selection, the clear-all confirmation modal, clipboard feedback,
//! the install capability, and the offline mirror status. All mutation
//! flows through `handle_key`, one event at a time.

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::clipboard::Clipboard;
use crate::install::{InstallPrompt, LauncherInstaller};
use crate::journal::html;
use crate::journal::{Entry, JournalStore};
use crate::mirror::MirrorMessage;

/// How long the per-row "Copied" feedback stays visible
const COPY_FEEDBACK: Duration = Duration::from_millis(1200);

/// File name of the exported HTML page, next to the data file
const EXPORT_FILE: &str = "logbook.html";

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// The journal screen: form plus entry list
    Journal,
    /// Blocking confirmation before clearing all entries
    ConfirmClear,
}

/// Which control currently receives typed input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Title input field
    Title,
    /// Date input field
    Date,
    /// Description input field
    Description,
    /// The entry list
    List,
}

impl Focus {
    /// Returns the next control in Tab order
    fn next(self) -> Self {
        match self {
            Focus::Title => Focus::Date,
            Focus::Date => Focus::Description,
            Focus::Description => Focus::List,
            Focus::List => Focus::Title,
        }
    }
}

/// A list action decoded from the selected row
///
/// Carrying the entry id in the variant keeps dispatch exhaustive; there
/// is no stringly-typed action tag to mistype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Copy the entry's text to the clipboard
    Copy(String),
    /// Remove the entry
    Delete(String),
}

/// The three form inputs
#[derive(Debug, Clone)]
pub struct FormState {
    /// Title input buffer
    pub title: String,
    /// Date input buffer, `YYYY-MM-DD`
    pub date: String,
    /// Description input buffer
    pub description: String,
}

impl FormState {
    /// Creates a blank form with the date defaulted to today
    pub fn new_today() -> Self {
        Self {
            title: String::new(),
            date: Local::now().format("%Y-%m-%d").to_string(),
            description: String::new(),
        }
    }
}

/// What the app knows about the background mirror
#[derive(Debug, Clone, Default)]
pub struct MirrorStatus {
    /// The shell manifest is cached
    pub installed: bool,
    /// Old buckets purged; the mirror serves requests
    pub activated: bool,
    /// A revalidation cycle is in flight
    pub refreshing: bool,
    /// Most recent mirror error, if any
    pub last_error: Option<String>,
}

impl MirrorStatus {
    /// Returns true once the page is available offline
    pub fn offline_ready(&self) -> bool {
        self.installed && self.activated
    }
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Control receiving typed input
    pub focus: Focus,
    /// Form input buffers
    pub form: FormState,
    /// Index of the selected row in display order
    pub selected_index: usize,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show the help overlay
    pub show_help: bool,
    /// Install capability token
    pub install_prompt: InstallPrompt,
    /// Background mirror status shown in the footer
    pub mirror_status: MirrorStatus,
    /// Entry id showing "Copied" feedback, with its expiry time
    copy_feedback: Option<(String, Instant)>,
    /// The entry collection and its persistence
    store: JournalStore,
    /// Clipboard sink for the copy action
    clipboard: Box<dyn Clipboard>,
    /// Launcher installer, when the platform supports it
    installer: Option<LauncherInstaller>,
    /// Path of the exported HTML page
    export_path: PathBuf,
}

impl App {
    /// Creates an App over the given store, clipboard, and installer
    ///
    /// Loads the persisted collection, derives the install capability from
    /// the platform (already installed consumes the token immediately), and
    /// writes the initial page export.
    pub fn new(
        mut store: JournalStore,
        clipboard: Box<dyn Clipboard>,
        installer: Option<LauncherInstaller>,
    ) -> Self {
        store.load();
        let export_path = store.path().with_file_name(EXPORT_FILE);

        let mut install_prompt = InstallPrompt::absent();
        match &installer {
            Some(installer) if installer.is_installed() => install_prompt.mark_installed(),
            Some(_) => install_prompt.signal_available(),
            None => {}
        }

        let app = Self {
            state: AppState::Journal,
            focus: Focus::Title,
            form: FormState::new_today(),
            selected_index: 0,
            should_quit: false,
            show_help: false,
            install_prompt,
            mirror_status: MirrorStatus::default(),
            copy_feedback: None,
            store,
            clipboard,
            installer,
            export_path,
        };
        app.export_page();
        app
    }

    /// Returns the entries in display order (newest first)
    pub fn visible_entries(&self) -> Vec<&Entry> {
        html::display_order(self.store.entries())
    }

    /// Returns the number of entries
    pub fn entry_count(&self) -> usize {
        self.store.len()
    }

    /// Returns the id of the selected row, if any
    pub fn selected_id(&self) -> Option<String> {
        self.visible_entries()
            .get(self.selected_index)
            .map(|e| e.id.clone())
    }

    /// Returns true while the given entry shows copy feedback
    pub fn has_copy_feedback(&self, id: &str) -> bool {
        matches!(&self.copy_feedback, Some((fed, _)) if fed == id)
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - Form fields: typed characters edit the focused field, `Tab`
    ///   cycles focus, `Enter` submits, `Esc` jumps to the list
    /// - List: `j`/`k` or arrows move, `c` copies, `d` deletes, `x` asks
    ///   to clear all, `i` installs, `?` opens help, `q`/`Esc` quits
    /// - Confirm modal: `y`/`Enter` clears everything, `n`/`Esc` declines
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Help overlay intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        match self.state {
            AppState::ConfirmClear => match key_event.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    self.store.clear_all();
                    self.after_mutation();
                    self.state = AppState::Journal;
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.state = AppState::Journal;
                }
                _ => {}
            },
            AppState::Journal => match self.focus {
                Focus::List => self.handle_list_key(key_event),
                _ => self.handle_form_key(key_event),
            },
        }
    }

    /// Key handling while a form field has focus
    fn handle_form_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
            }
            KeyCode::Esc => {
                self.focus = Focus::List;
            }
            KeyCode::Enter => {
                self.submit_form();
            }
            KeyCode::Backspace => {
                if let Some(buffer) = self.focused_buffer() {
                    buffer.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(buffer) = self.focused_buffer() {
                    buffer.push(c);
                }
            }
            _ => {}
        }
    }

    /// Key handling while the list has focus
    fn handle_list_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection_up();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection_down();
            }
            KeyCode::Char('c') => {
                if let Some(id) = self.selected_id() {
                    self.dispatch_action(Action::Copy(id));
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    self.dispatch_action(Action::Delete(id));
                }
            }
            KeyCode::Char('x') => {
                self.request_clear_all();
            }
            KeyCode::Char('i') => {
                self.trigger_install();
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    /// Dispatches a decoded list action
    pub fn dispatch_action(&mut self, action: Action) {
        match action {
            Action::Copy(id) => {
                let Some(text) = self.store.copy_text(&id) else {
                    return;
                };
                match self.clipboard.copy(&text) {
                    Ok(()) => {
                        self.copy_feedback = Some((id, Instant::now() + COPY_FEEDBACK));
                    }
                    // Clipboard denial is silent
                    Err(e) => debug!("clipboard copy failed: {e}"),
                }
            }
            Action::Delete(id) => {
                if self.store.remove(&id) {
                    self.after_mutation();
                }
            }
        }
    }

    /// Submits the form; a rejected submit changes nothing
    fn submit_form(&mut self) {
        let added = self
            .store
            .add(&self.form.title, &self.form.description, &self.form.date)
            .is_some();
        if !added {
            return;
        }
        self.form = FormState::new_today();
        self.focus = Focus::Title;
        self.after_mutation();
    }

    /// Opens the clear-all confirmation, unless the collection is empty
    fn request_clear_all(&mut self) {
        if self.store.is_empty() {
            return;
        }
        self.state = AppState::ConfirmClear;
    }

    /// Consumes the install token and writes the launcher
    fn trigger_install(&mut self) {
        if !self.install_prompt.consume() {
            return;
        }
        if let Some(installer) = &self.installer {
            if let Err(e) = installer.install() {
                warn!("launcher install failed: {e}");
            }
        }
    }

    /// Periodic upkeep run every event-loop tick
    pub fn tick(&mut self) {
        if let Some((_, until)) = &self.copy_feedback {
            if Instant::now() >= *until {
                self.copy_feedback = None;
            }
        }
    }

    /// Applies a message from the background mirror task
    pub fn apply_mirror_message(&mut self, message: MirrorMessage) {
        match message {
            MirrorMessage::InstallComplete { .. } => {
                self.mirror_status.installed = true;
                self.mirror_status.last_error = None;
            }
            MirrorMessage::Activated { .. } => {
                self.mirror_status.activated = true;
            }
            MirrorMessage::RefreshStarted => {
                self.mirror_status.refreshing = true;
            }
            MirrorMessage::AssetRefreshed { .. } => {}
            MirrorMessage::RefreshCompleted => {
                self.mirror_status.refreshing = false;
            }
            MirrorMessage::MirrorError(e) => {
                self.mirror_status.last_error = Some(e);
                self.mirror_status.refreshing = false;
            }
        }
    }

    /// Returns the buffer of the focused form field, `None` for the list
    fn focused_buffer(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Title => Some(&mut self.form.title),
            Focus::Date => Some(&mut self.form.date),
            Focus::Description => Some(&mut self.form.description),
            Focus::List => None,
        }
    }

    /// Re-exports the page and clamps the selection after any mutation
    fn after_mutation(&mut self) {
        self.export_page();
        let count = self.store.len();
        if count == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= count {
            self.selected_index = count - 1;
        }
    }

    /// Writes the HTML export; failures are logged and dropped
    fn export_page(&self) {
        if let Err(e) = html::export_page(self.store.entries(), &self.export_path) {
            warn!("failed to export {}: {e}", self.export_path.display());
        }
    }

    /// Moves the selection up in the list, wrapping to bottom if at top
    fn move_selection_up(&mut self) {
        let count = self.store.len();
        if count == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = count - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Moves the selection down in the list, wrapping to top if at bottom
    fn move_selection_down(&mut self) {
        let count = self.store.len();
        if count == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % count;
    }
}
