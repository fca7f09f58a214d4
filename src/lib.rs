//! djquery - Rekordbox library query and playlist export
//!
//! Loads a Rekordbox XML collection export into memory and answers
//! structured queries against it: filtered and sorted search, key and BPM
//! lookups, grouped analytics, and playlist file export.
//!
//! # Architecture
//!
//! The library is organized into several key modules:
//!
//! - `types`: the in-memory collection model
//! - `rekordbox`: XML reader and location URI decoding
//! - `query`: stateless search, lookup and analytics functions
//! - `export`: TXT / M3U / M3U8 / PLS playlist rendering
//! - `library`: the [`Library`] facade owning one loaded collection
//! - `config`: CLI argument parsing and runtime settings
//!
//! # Example
//!
//! ```no_run
//! use djquery::{Library, query::SearchCriteria};
//! use std::path::Path;
//!
//! let mut library = Library::new();
//! library.load_library(Path::new("rekordbox.xml")).expect("Load failed");
//!
//! let criteria = SearchCriteria {
//!     bpm_min: Some(125.0),
//!     bpm_max: Some(130.0),
//!     ..Default::default()
//! };
//! for track in library.search(&criteria).expect("Search failed") {
//!     println!("{} - {}", track.artist, track.name);
//! }
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod library;
pub mod query;
pub mod rekordbox;
pub mod types;

// Re-export key types at crate root
pub use error::{DjqueryError, Result};
pub use library::{IdValidation, Library};
pub use types::{Collection, CuePoint, PlaylistNode, TempoMarker, Track};
