//! Library facade
//!
//! [`Library`] owns at most one loaded [`Collection`] and exposes every query
//! and export operation on it. Until the first successful load every
//! operation fails with [`DjqueryError::NotLoaded`]. A new load replaces the
//! collection only once it parsed completely, so a failed load leaves the
//! previous collection untouched.
//!
//! The facade is a plain value: hold one per tenant or worker, and wrap it in
//! a mutex if loads or updates have to be shared across threads.

use crate::error::{DjqueryError, Result};
use crate::export::{default_playlist_name, render_playlist, write_playlist, PlaylistFormat};
use crate::query::{self, lookup};
use crate::query::{
    AnalysisResult, AnalyticsQuery, LibraryStats, ListingOptions, SearchCriteria, TrackSummary,
};
use crate::rekordbox::parse_library;
use crate::types::{Collection, PlaylistNode, Track};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Outcome of [`Library::validate_ids`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IdValidation {
    pub valid: Vec<String>,
    pub invalid: Vec<String>,
}

/// Single-owner handle on a loaded library export
#[derive(Debug, Default)]
pub struct Library {
    collection: Option<Collection>,
}

impl Library {
    /// Create an empty, unloaded library
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a library has been loaded
    pub fn is_loaded(&self) -> bool {
        self.collection.is_some()
    }

    /// Load a rekordbox.xml export from disk
    pub fn load_library(&mut self, path: &Path) -> Result<()> {
        debug!("Reading library from {}", path.display());
        let xml = std::fs::read_to_string(path)?;
        self.load_from_str(&xml)?;
        info!("Loaded library from {}", path.display());
        Ok(())
    }

    /// Load a library export from an in-memory document
    pub fn load_from_str(&mut self, xml: &str) -> Result<()> {
        let collection = parse_library(xml)?;
        self.collection = Some(collection);
        Ok(())
    }

    /// The loaded collection
    pub fn collection(&self) -> Result<&Collection> {
        self.collection.as_ref().ok_or(DjqueryError::NotLoaded)
    }

    fn collection_mut(&mut self) -> Result<&mut Collection> {
        self.collection.as_mut().ok_or(DjqueryError::NotLoaded)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn search(&self, criteria: &SearchCriteria) -> Result<Vec<&Track>> {
        Ok(query::search(self.collection()?.tracks(), criteria))
    }

    pub fn track_by_id(&self, track_id: &str) -> Result<Option<&Track>> {
        Ok(self.collection()?.get(track_id))
    }

    /// Tracks of the first playlist with this name (case-insensitive)
    pub fn tracks_by_playlist(&self, name: &str) -> Result<Vec<&Track>> {
        Ok(lookup::by_playlist_name(self.collection()?, name))
    }

    /// Every folder and playlist in pre-order, root excluded
    pub fn all_playlists(&self) -> Result<Vec<&PlaylistNode>> {
        Ok(lookup::all_playlists(self.collection()?))
    }

    pub fn library_stats(&self) -> Result<LibraryStats> {
        Ok(query::library_stats(self.collection()?))
    }

    pub fn tracks_by_key(&self, key: &str) -> Result<Vec<&Track>> {
        Ok(lookup::by_key(self.collection()?, key))
    }

    pub fn tracks_by_bpm_range(&self, min: f64, max: f64) -> Result<Vec<&Track>> {
        Ok(lookup::by_bpm_range(self.collection()?, min, max))
    }

    pub fn analyze(&self, analytics: &AnalyticsQuery) -> Result<AnalysisResult> {
        Ok(query::analyze(self.collection()?.tracks(), analytics))
    }

    pub fn most_played(&self, options: &ListingOptions) -> Result<Vec<TrackSummary>> {
        Ok(query::most_played(self.collection()?.tracks(), options))
    }

    pub fn top_rated(&self, options: &ListingOptions) -> Result<Vec<TrackSummary>> {
        Ok(query::top_rated(self.collection()?.tracks(), options))
    }

    pub fn unplayed(&self, options: &ListingOptions) -> Result<Vec<TrackSummary>> {
        Ok(query::unplayed(self.collection()?.tracks(), options))
    }

    /// Decoded file path of a track, `None` for unknown IDs
    pub fn file_path(&self, track_id: &str) -> Result<Option<String>> {
        Ok(self.collection()?.get(track_id).map(lookup::file_path))
    }

    /// File name of a track, `None` for unknown IDs
    pub fn file_name(&self, track_id: &str) -> Result<Option<String>> {
        Ok(self.collection()?.get(track_id).map(lookup::track_file_name))
    }

    pub fn tracks_by_file_name(&self, fragment: &str) -> Result<Vec<&Track>> {
        Ok(lookup::by_file_name(self.collection()?, fragment))
    }

    /// Split IDs into those present in the collection and those that are not
    pub fn validate_ids<S: AsRef<str>>(&self, ids: &[S]) -> Result<IdValidation> {
        let collection = self.collection()?;
        let mut result = IdValidation::default();
        for id in ids {
            let id = id.as_ref();
            if collection.contains(id) {
                result.valid.push(id.to_string());
            } else {
                result.invalid.push(id.to_string());
            }
        }
        Ok(result)
    }

    // =========================================================================
    // Updates
    // =========================================================================

    /// Set a track's play count; false if the ID is unknown
    pub fn update_play_count(&mut self, track_id: &str, play_count: u32) -> Result<bool> {
        Ok(match self.collection_mut()?.get_mut(track_id) {
            Some(track) => {
                track.play_count = play_count;
                true
            }
            None => false,
        })
    }

    /// Set a track's rating, clamped to 0-5; false if the ID is unknown
    pub fn update_rating(&mut self, track_id: &str, rating: i64) -> Result<bool> {
        Ok(match self.collection_mut()?.get_mut(track_id) {
            Some(track) => {
                track.rating = rating.clamp(0, 5) as u32;
                true
            }
            None => false,
        })
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Render the tracks with these IDs and write them to `output_path`
    ///
    /// Unknown IDs are dropped; fails with [`DjqueryError::EmptySelection`]
    /// if none remain. Returns a confirmation message.
    pub fn export_playlist<S: AsRef<str>>(
        &self,
        track_ids: &[S],
        output_path: &Path,
        format: PlaylistFormat,
        name: Option<&str>,
    ) -> Result<String> {
        let collection = self.collection()?;
        let tracks = collection.resolve(track_ids);

        let dropped = track_ids.len() - tracks.len();
        if dropped > 0 {
            debug!("Dropping {} unknown track IDs from export", dropped);
        }
        if tracks.is_empty() {
            return Err(DjqueryError::EmptySelection);
        }

        let name = name.map_or_else(default_playlist_name, str::to_string);
        let content = render_playlist(&tracks, format, &name);
        write_playlist(&content, output_path)?;

        Ok(format!(
            "Created {} playlist \"{}\" with {} tracks at: {}",
            format.as_str().to_uppercase(),
            name,
            tracks.len(),
            output_path.display()
        ))
    }

    /// Export the result of a search
    pub fn export_search(
        &self,
        criteria: &SearchCriteria,
        output_path: &Path,
        format: PlaylistFormat,
        name: Option<&str>,
    ) -> Result<String> {
        let ids: Vec<&str> = self
            .search(criteria)?
            .into_iter()
            .map(|t| t.track_id.as_str())
            .collect();
        self.export_playlist(&ids, output_path, format, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML: &str = r#"<DJ_PLAYLISTS Version="1.0.0">
      <PRODUCT Name="rekordbox" Version="7.1.4" Company="AlphaTheta"/>
      <COLLECTION Entries="2">
        <TRACK TrackID="1" Name="One" Artist="A" Genre="House" PlayCount="3" Rating="2" TotalTime="200" Location="file://localhost/a/one.mp3"/>
        <TRACK TrackID="2" Name="Two" Artist="B" Genre="Techno" PlayCount="0" Rating="0" TotalTime="100" Location="file://localhost/b/two.mp3"/>
      </COLLECTION>
      <PLAYLISTS><NODE Type="0" Name="ROOT" Count="1"><NODE Type="1" Name="All" Entries="3"><TRACK Key="2"/><TRACK Key="9"/><TRACK Key="1"/></NODE></NODE></PLAYLISTS>
    </DJ_PLAYLISTS>"#;

    fn loaded() -> Library {
        let mut library = Library::new();
        library.load_from_str(XML).unwrap();
        library
    }

    #[test]
    fn test_operations_fail_before_load() {
        let mut library = Library::new();
        assert!(!library.is_loaded());
        assert!(matches!(library.search(&SearchCriteria::default()), Err(DjqueryError::NotLoaded)));
        assert!(matches!(library.track_by_id("1"), Err(DjqueryError::NotLoaded)));
        assert!(matches!(library.library_stats(), Err(DjqueryError::NotLoaded)));
        assert!(matches!(library.update_rating("1", 3), Err(DjqueryError::NotLoaded)));
        assert!(matches!(library.validate_ids(&["1"]), Err(DjqueryError::NotLoaded)));
        assert!(matches!(
            library.export_playlist(&["1"], Path::new("x.m3u8"), PlaylistFormat::M3u8, None),
            Err(DjqueryError::NotLoaded)
        ));
    }

    #[test]
    fn test_failed_load_keeps_previous_collection() {
        let mut library = loaded();
        assert!(library.load_from_str("<DJ_PLAYLISTS/>").is_err());
        assert_eq!(library.collection().unwrap().len(), 2);
    }

    #[test]
    fn test_reload_replaces_collection() {
        let mut library = loaded();
        library.update_play_count("1", 99).unwrap();
        library.load_from_str(XML).unwrap();
        assert_eq!(library.track_by_id("1").unwrap().unwrap().play_count, 3);
    }

    #[test]
    fn test_rating_is_clamped() {
        let mut library = loaded();
        assert!(library.update_rating("1", 10).unwrap());
        assert_eq!(library.track_by_id("1").unwrap().unwrap().rating, 5);
        assert!(library.update_rating("1", -5).unwrap());
        assert_eq!(library.track_by_id("1").unwrap().unwrap().rating, 0);
        assert!(!library.update_rating("missing", 3).unwrap());
    }

    #[test]
    fn test_update_play_count() {
        let mut library = loaded();
        assert!(library.update_play_count("2", 7).unwrap());
        assert_eq!(library.track_by_id("2").unwrap().unwrap().play_count, 7);
        assert!(!library.update_play_count("missing", 7).unwrap());
    }

    #[test]
    fn test_playlist_skips_dangling_ids() {
        let library = loaded();
        let ids: Vec<_> = library
            .tracks_by_playlist("all")
            .unwrap()
            .iter()
            .map(|t| t.track_id.clone())
            .collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn test_validate_ids() {
        let library = loaded();
        let result = library.validate_ids(&["1", "9", "2"]).unwrap();
        assert_eq!(result.valid, vec!["1", "2"]);
        assert_eq!(result.invalid, vec!["9"]);
    }

    #[test]
    fn test_file_path_and_name() {
        let library = loaded();
        assert_eq!(library.file_path("1").unwrap().as_deref(), Some("/a/one.mp3"));
        assert_eq!(library.file_name("2").unwrap().as_deref(), Some("two.mp3"));
        assert_eq!(library.file_path("9").unwrap(), None);
    }

    #[test]
    fn test_export_drops_unknown_ids() {
        let library = loaded();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("set.txt");

        let message = library
            .export_playlist(&["9", "2", "1"], &path, PlaylistFormat::Txt, Some("Set"))
            .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "/b/two.mp3\n/a/one.mp3");
        assert!(message.starts_with("Created TXT playlist \"Set\" with 2 tracks at: "));
    }

    #[test]
    fn test_export_empty_selection() {
        let library = loaded();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("set.m3u8");

        let result = library.export_playlist(&["9"], &path, PlaylistFormat::M3u8, None);
        assert!(matches!(result, Err(DjqueryError::EmptySelection)));
        assert!(!path.exists());
    }

    #[test]
    fn test_export_search() {
        let library = loaded();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("house.pls");
        let criteria = SearchCriteria {
            genre: Some("house".to_string()),
            ..Default::default()
        };

        library
            .export_search(&criteria, &path, PlaylistFormat::Pls, Some("House"))
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("PlaylistName=House\n"));
        assert!(content.contains("NumberOfEntries=1\n"));
        assert!(content.contains("File1=/a/one.mp3\n"));
    }
}
