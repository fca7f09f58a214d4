//! Runtime configuration settings

use crate::error::{DjqueryError, Result};
use crate::export::PlaylistFormat;
use std::path::PathBuf;

/// Library loaded when neither `--library` nor the environment names one
pub const DEFAULT_LIBRARY: &str = "rekordbox.xml";

/// Runtime settings for a djquery invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Rekordbox XML export to load
    pub library_path: PathBuf,
    /// Format used when an export does not name one
    pub default_format: PlaylistFormat,
    /// Pretty-print JSON output
    pub pretty_json: bool,
}

impl Settings {
    /// Create settings from CLI arguments
    pub fn from_cli(cli: &super::cli::Cli) -> Self {
        let defaults = Self::default();
        Self {
            library_path: cli.library.clone().unwrap_or(defaults.library_path),
            pretty_json: !cli.compact,
            ..defaults
        }
    }

    /// Check the settings before any work is done
    pub fn validate(&self) -> Result<()> {
        if !self.library_path.is_file() {
            return Err(DjqueryError::ConfigError(format!(
                "library export not found: {}\n  Tip: Pass --library <PATH> or set {}",
                self.library_path.display(),
                super::cli::LIBRARY_ENV
            )));
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            library_path: PathBuf::from(DEFAULT_LIBRARY),
            default_format: PlaylistFormat::default(),
            pretty_json: true,
        }
    }
}
