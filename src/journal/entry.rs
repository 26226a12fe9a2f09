//! Logbook entry model and id generation
//!
//! An entry is one dated journal record. Ids are derived from a millisecond
//! clock encoded in base 36, with a monotonicity guard so that two entries
//! created within the same millisecond still get distinct ids.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Digits used for base-36 id encoding
const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A single logbook entry
///
/// Serialized as `{id, title, description, date}` where `date` is a
/// `YYYY-MM-DD` string (chrono's `NaiveDate` serde format).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Opaque unique id, base-36 encoding of the creation timestamp
    pub id: String,
    /// Entry title, non-empty
    pub title: String,
    /// Free-text description, non-empty
    pub description: String,
    /// Calendar date of the entry
    pub date: NaiveDate,
}

/// Generates unique entry ids from a monotonically-increasing clock
///
/// The generator remembers the last issued timestamp; if the wall clock has
/// not advanced past it (or went backwards), the next id is taken from the
/// last value plus one instead, so issued ids are strictly increasing.
#[derive(Debug, Default)]
pub struct EntryIdGenerator {
    /// Millisecond value of the last issued id
    last_millis: u64,
}

impl EntryIdGenerator {
    /// Creates a generator with no issued ids yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next unique id
    pub fn next_id(&mut self) -> String {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        let millis = if now <= self.last_millis {
            self.last_millis + 1
        } else {
            now
        };
        self.last_millis = millis;
        encode_base36(millis)
    }
}

/// Encodes a value in lowercase base 36
fn encode_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    // Digits are drawn from an ASCII table, so this cannot fail
    String::from_utf8(digits).unwrap_or_default()
}
