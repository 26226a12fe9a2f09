//! Command-line interface parsing for shiplog
//!
//! This module handles parsing of CLI arguments using clap: the data
//! directory override, the origin of the hosted page to mirror, and the
//! switch disabling the background mirror.

use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Origin of the hosted logbook page mirrored by default
const DEFAULT_ORIGIN: &str = "https://shiplog.app/";

/// Errors for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified origin is not a valid absolute URL
    #[error("Invalid origin '{0}': expected an absolute http(s) URL")]
    InvalidOrigin(String),
}

/// Shiplog - a terminal logbook with an offline mirror of the hosted page
#[derive(Parser, Debug)]
#[command(name = "shiplog")]
#[command(about = "Terminal logbook for dated journal entries")]
#[command(version)]
pub struct Cli {
    /// Directory holding the entry data and the exported HTML page
    #[arg(long, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Origin of the hosted logbook page to mirror for offline use
    #[arg(long, value_name = "URL")]
    pub origin: Option<String>,

    /// Disable the background offline mirror
    #[arg(long)]
    pub no_mirror: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Override for the data directory, if specified
    pub data_dir: Option<PathBuf>,
    /// Origin mirrored by the cache worker
    pub origin: Url,
    /// Whether the background mirror task runs
    pub mirror_enabled: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            // The default origin is a compile-time constant and parses
            origin: Url::parse(DEFAULT_ORIGIN).expect("default origin is valid"),
            mirror_enabled: true,
        }
    }
}

/// Parses an origin string argument into a validated URL
pub fn parse_origin_arg(s: &str) -> Result<Url, CliError> {
    let url = Url::parse(s).map_err(|_| CliError::InvalidOrigin(s.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(CliError::InvalidOrigin(s.to_string()));
    }
    Ok(url)
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if an invalid origin was specified
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let origin = match &cli.origin {
            Some(raw) => parse_origin_arg(raw)?,
            None => StartupConfig::default().origin,
        };
        Ok(StartupConfig {
            data_dir: cli.data_dir.clone(),
            origin,
            mirror_enabled: !cli.no_mirror,
        })
    }
}
