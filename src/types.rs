//! Core data types for djquery
//!
//! These types model a loaded Rekordbox library export. They carry no
//! behavior beyond keeping their structural invariants; all coercion and
//! defaulting happens in [`crate::rekordbox::reader`].

use serde::Serialize;
use std::collections::HashMap;

/// Name conventionally given to the playlist tree root
pub const ROOT_NODE_NAME: &str = "ROOT";

/// Highest hot-cue pad number (pads are numbered 0-7)
pub const MAX_HOT_CUE_NUM: i32 = 7;

/// `Num` value marking a memory cue
pub const MEMORY_CUE_NUM: i32 = -1;

// =============================================================================
// Per-track markers
// =============================================================================

/// One entry of a track's beat grid
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TempoMarker {
    /// Offset from the start of the track in seconds
    pub start: f64,
    pub bpm: f64,
    /// Time signature label, e.g. "4/4"
    pub metro: String,
    /// Beat within the bar (1-based)
    pub beat: i32,
}

/// A saved position marker (memory cue or hot cue)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CuePoint {
    pub name: String,
    /// Offset from the start of the track in seconds
    pub start: f64,
    /// Marker type code (0 = cue, 4 = loop, ...)
    #[serde(rename = "type")]
    pub kind: i32,
    /// -1 for memory cues, 0-7 for hot-cue pads
    pub num: i32,
}

impl CuePoint {
    /// True for markers not bound to a pad
    pub fn is_memory_cue(&self) -> bool {
        self.num == MEMORY_CUE_NUM
    }

    /// True for markers bound to one of the 8 hot-cue pads
    pub fn is_hot_cue(&self) -> bool {
        (0..=MAX_HOT_CUE_NUM).contains(&self.num)
    }
}

// =============================================================================
// Track representation
// =============================================================================

/// A single entry of the library collection
///
/// Optional text fields are `None` when the source attribute is missing or
/// empty. Numeric fields are never absent: unparsable values load as 0,
/// except `year` which stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub track_id: String,
    pub name: String,
    pub artist: String,
    pub composer: Option<String>,
    pub album: Option<String>,
    pub grouping: Option<String>,
    /// Empty when the track has no genre
    pub genre: String,
    pub kind: String,
    pub size: u64,
    /// Duration in seconds
    pub total_time: u32,
    pub disc_number: u32,
    pub track_number: u32,
    pub year: Option<i32>,
    pub average_bpm: f64,
    pub date_added: String,
    pub date_modified: String,
    pub bit_rate: u32,
    pub sample_rate: u32,
    pub comments: Option<String>,
    pub play_count: u32,
    pub rating: u32,
    /// URL-encoded `file://localhost/...` location
    pub location: String,
    pub remixer: Option<String>,
    /// Musical key label, e.g. "8A"
    pub tonality: Option<String>,
    pub label: Option<String>,
    pub mix: Option<String>,
    pub tempo_data: Vec<TempoMarker>,
    /// Memory cues only (`num == -1`)
    pub cue_points: Vec<CuePoint>,
    /// Hot cues only (`0 <= num <= 7`)
    pub hot_cues: Vec<CuePoint>,
}

impl Track {
    /// Create an empty track with the given ID
    pub fn new(track_id: impl Into<String>) -> Self {
        Self {
            track_id: track_id.into(),
            ..Self::default()
        }
    }

    /// Sort cue markers into memory cues and hot cues
    ///
    /// Markers whose `num` is neither -1 nor a pad number are dropped.
    pub fn push_cue(&mut self, cue: CuePoint) {
        if cue.is_memory_cue() {
            self.cue_points.push(cue);
        } else if cue.is_hot_cue() {
            self.hot_cues.push(cue);
        }
    }

    /// Genre, or `None` when the track has none
    pub fn genre(&self) -> Option<&str> {
        Some(self.genre.as_str()).filter(|g| !g.is_empty())
    }
}

// =============================================================================
// Playlist tree
// =============================================================================

/// Node type code for folders
pub const NODE_TYPE_FOLDER: i32 = 0;

/// Node type code for playlists
pub const NODE_TYPE_PLAYLIST: i32 = 1;

/// A folder or playlist in the playlist tree
///
/// `tracks` holds track IDs, which may reference tracks missing from the
/// collection; they are resolved lazily at query time. The declared counts
/// are advisory and never used for iteration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistNode {
    /// 0 = folder, 1 = playlist
    #[serde(rename = "type")]
    pub node_type: i32,
    pub name: String,
    pub count: Option<u32>,
    pub entries: Option<u32>,
    pub key_type: Option<i32>,
    pub tracks: Vec<String>,
    pub children: Vec<PlaylistNode>,
}

impl PlaylistNode {
    /// Create an empty folder node, as used for a missing playlist tree
    pub fn root() -> Self {
        Self {
            node_type: NODE_TYPE_FOLDER,
            name: ROOT_NODE_NAME.to_string(),
            ..Self::default()
        }
    }

    pub fn is_folder(&self) -> bool {
        self.node_type == NODE_TYPE_FOLDER
    }

    pub fn is_playlist(&self) -> bool {
        self.node_type == NODE_TYPE_PLAYLIST
    }

    /// "folder", "playlist", or "unknown" for other type codes
    pub fn kind(&self) -> &'static str {
        if self.is_folder() {
            "folder"
        } else if self.is_playlist() {
            "playlist"
        } else {
            "unknown"
        }
    }

    /// All descendants in pre-order, excluding `self`
    pub fn descendants(&self) -> Vec<&PlaylistNode> {
        let mut out = Vec::new();
        for child in &self.children {
            child.collect_pre_order(&mut out);
        }
        out
    }

    fn collect_pre_order<'a>(&'a self, out: &mut Vec<&'a PlaylistNode>) {
        out.push(self);
        for child in &self.children {
            child.collect_pre_order(out);
        }
    }
}

// =============================================================================
// Collection
// =============================================================================

/// Format and provenance metadata of an export
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    pub version: String,
    pub created_by: String,
    pub created_by_version: String,
    pub platform: String,
    pub modification_date: String,
    pub product_name: String,
    pub product_version: String,
    pub product_company: String,
}

/// A fully loaded library export
///
/// Tracks keep document order. A repeated TrackID replaces the earlier track
/// in place, so the first occurrence decides the position.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub provenance: Provenance,
    /// Declared track count (advisory)
    pub total_entries: u32,
    pub playlists: PlaylistNode,
    tracks: Vec<Track>,
    index: HashMap<String, usize>,
}

impl Collection {
    pub fn new(provenance: Provenance, total_entries: u32, playlists: PlaylistNode) -> Self {
        Self {
            provenance,
            total_entries,
            playlists,
            tracks: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert a track, returning true if it replaced one with the same ID
    pub fn insert(&mut self, track: Track) -> bool {
        match self.index.get(&track.track_id) {
            Some(&pos) => {
                self.tracks[pos] = track;
                true
            }
            None => {
                self.index.insert(track.track_id.clone(), self.tracks.len());
                self.tracks.push(track);
                false
            }
        }
    }

    pub fn get(&self, track_id: &str) -> Option<&Track> {
        self.index.get(track_id).map(|&pos| &self.tracks[pos])
    }

    pub fn get_mut(&mut self, track_id: &str) -> Option<&mut Track> {
        self.index.get(track_id).map(|&pos| &mut self.tracks[pos])
    }

    pub fn contains(&self, track_id: &str) -> bool {
        self.index.contains_key(track_id)
    }

    /// Tracks in document order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if the collection has no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Resolve IDs to tracks, silently dropping unknown ones
    pub fn resolve<'a, I, S>(&'a self, ids: I) -> Vec<&'a Track>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ids.into_iter()
            .filter_map(|id| self.get(id.as_ref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue(num: i32) -> CuePoint {
        CuePoint {
            name: format!("Cue {}", num),
            start: 1.0,
            kind: 0,
            num,
        }
    }

    #[test]
    fn test_cue_classification_disjoint() {
        let mut track = Track::new("1");
        for num in -3..=10 {
            track.push_cue(cue(num));
        }

        assert_eq!(track.cue_points.len(), 1);
        assert!(track.cue_points.iter().all(|c| c.num == -1));
        assert_eq!(track.hot_cues.len(), 8);
        assert!(track.hot_cues.iter().all(|c| (0..=7).contains(&c.num)));
    }

    #[test]
    fn test_duplicate_id_keeps_first_position() {
        let mut collection = Collection::default();
        assert!(!collection.insert(Track::new("a")));
        assert!(!collection.insert(Track::new("b")));

        let mut replacement = Track::new("a");
        replacement.name = "Replaced".to_string();
        assert!(collection.insert(replacement));

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.tracks()[0].name, "Replaced");
        assert_eq!(collection.tracks()[1].track_id, "b");
    }

    #[test]
    fn test_resolve_drops_unknown_ids() {
        let mut collection = Collection::default();
        collection.insert(Track::new("1"));
        collection.insert(Track::new("2"));

        let resolved = collection.resolve(["2", "missing", "1"]);
        let ids: Vec<_> = resolved.iter().map(|t| t.track_id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn test_descendants_pre_order() {
        let leaf = |name: &str| PlaylistNode {
            node_type: NODE_TYPE_PLAYLIST,
            name: name.to_string(),
            ..PlaylistNode::default()
        };
        let mut folder = PlaylistNode {
            name: "Folder".to_string(),
            ..PlaylistNode::default()
        };
        folder.children.push(leaf("Inner"));

        let mut root = PlaylistNode::root();
        root.children.push(folder);
        root.children.push(leaf("Outer"));

        let names: Vec<_> = root.descendants().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Folder", "Inner", "Outer"]);

        let kinds: Vec<_> = root.descendants().iter().map(|n| n.kind()).collect();
        assert_eq!(kinds, vec!["folder", "playlist", "playlist"]);
    }

    #[test]
    fn test_node_kind() {
        let mut node = PlaylistNode::root();
        assert!(node.is_folder());
        assert!(!node.is_playlist());

        node.node_type = NODE_TYPE_PLAYLIST;
        assert!(node.is_playlist());
        assert_eq!(node.kind(), "playlist");

        node.node_type = 7;
        assert_eq!(node.kind(), "unknown");
    }

    #[test]
    fn test_empty_genre_is_none() {
        let mut track = Track::new("1");
        assert_eq!(track.genre(), None);
        track.genre = "House".to_string();
        assert_eq!(track.genre(), Some("House"));
    }
}
