//! Unified error types for djquery
//!
//! Error strategy:
//! - Usage errors (no library loaded, empty export selection, bad option names):
//!   surfaced immediately, never retried
//! - Data errors (malformed library XML): fatal for that load attempt only, the
//!   previously loaded collection stays in place
//! - IO errors: propagated with the original `std::io::Error` intact
//!
//! Lookups that can legitimately miss (by ID, by playlist name) return empty or
//! `None` results instead of erroring.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for djquery operations
#[derive(Debug, Error)]
pub enum DjqueryError {
    // =========================================================================
    // Usage errors
    // =========================================================================
    #[error("No library loaded\n  Tip: Call load_library() with a rekordbox.xml export first")]
    NotLoaded,

    #[error("No valid tracks found for the provided track IDs\n  Tip: Use validate_ids() to check IDs before exporting")]
    EmptySelection,

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    // =========================================================================
    // Data errors
    // =========================================================================
    #[error("Malformed library export: {reason}\n  Tip: Export the collection again from Rekordbox via File > Export Collection in xml format")]
    MalformedLibrary { reason: String },

    // =========================================================================
    // IO errors
    // =========================================================================
    #[error("Cannot write output to '{path}': {source}\n  Tip: Check write permissions for the output directory")]
    OutputError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for djquery operations
pub type Result<T> = std::result::Result<T, DjqueryError>;

impl DjqueryError {
    /// Returns true if the error was caused by how the API was called rather
    /// than by the library data or the file system
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            DjqueryError::NotLoaded | DjqueryError::EmptySelection | DjqueryError::ConfigError(_)
        )
    }

    /// Create a malformed library error
    pub fn malformed(reason: impl Into<String>) -> Self {
        DjqueryError::MalformedLibrary {
            reason: reason.into(),
        }
    }

    /// Create an output error for a failed playlist write
    pub fn output_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DjqueryError::OutputError {
            path: path.into(),
            source,
        }
    }
}

impl From<quick_xml::Error> for DjqueryError {
    fn from(e: quick_xml::Error) -> Self {
        DjqueryError::malformed(format!("XML parse error: {}", e))
    }
}

impl From<quick_xml::events::attributes::AttrError> for DjqueryError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        DjqueryError::malformed(format!("Invalid attribute: {}", e))
    }
}
