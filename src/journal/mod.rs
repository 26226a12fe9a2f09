//! Logbook entries: model, persistence, and HTML rendering
//!
//! The store keeps the authoritative entry collection durable as a single
//! JSON file; the html module turns the collection into the exported page.

pub mod entry;
pub mod html;
pub mod store;

pub use entry::Entry;
pub use store::JournalStore;
