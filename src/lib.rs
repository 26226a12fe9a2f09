//! Shiplog library
//!
//! A terminal logbook: dated entries persisted as JSON and exported as an
//! HTML page, plus an offline mirror of the hosted copy kept fresh by a
//! cache worker. The modules are exposed for use by the binary and the
//! integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod clipboard;
pub mod install;
pub mod journal;
pub mod mirror;
pub mod ui;
