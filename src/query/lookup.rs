//! Direct lookups over a collection

use crate::rekordbox::uri::{decode_location, file_name};
use crate::types::{Collection, PlaylistNode, Track};

/// Tracks whose tonality equals `key` exactly
pub fn by_key<'a>(collection: &'a Collection, key: &str) -> Vec<&'a Track> {
    collection
        .tracks()
        .iter()
        .filter(|t| t.tonality.as_deref() == Some(key))
        .collect()
}

/// Tracks with `min <= averageBpm <= max`; empty when `min > max`
pub fn by_bpm_range(collection: &Collection, min: f64, max: f64) -> Vec<&Track> {
    collection
        .tracks()
        .iter()
        .filter(|t| t.average_bpm >= min && t.average_bpm <= max)
        .collect()
}

/// First playlist or folder named `name` (ignoring case), in pre-order
///
/// The tree root itself is never matched. Duplicate names resolve to the
/// first node encountered.
pub fn find_playlist<'a>(root: &'a PlaylistNode, name: &str) -> Option<&'a PlaylistNode> {
    let wanted = name.to_lowercase();
    root.children.iter().find_map(|child| find_in(child, &wanted))
}

fn find_in<'a>(node: &'a PlaylistNode, wanted: &str) -> Option<&'a PlaylistNode> {
    if node.name.to_lowercase() == wanted {
        return Some(node);
    }
    node.children.iter().find_map(|child| find_in(child, wanted))
}

/// Tracks of the first playlist named `name`, in playlist order
///
/// IDs that are not in the collection are skipped.
pub fn by_playlist_name<'a>(collection: &'a Collection, name: &str) -> Vec<&'a Track> {
    match find_playlist(&collection.playlists, name) {
        Some(playlist) => collection.resolve(&playlist.tracks),
        None => Vec::new(),
    }
}

/// Every folder and playlist in pre-order, root excluded
pub fn all_playlists(collection: &Collection) -> Vec<&PlaylistNode> {
    collection.playlists.descendants()
}

/// Decoded file path of a track's location
pub fn file_path(track: &Track) -> String {
    decode_location(&track.location)
}

/// Tracks whose decoded path contains `fragment` (ignoring case)
pub fn by_file_name<'a>(collection: &'a Collection, fragment: &str) -> Vec<&'a Track> {
    let needle = fragment.to_lowercase();
    collection
        .tracks()
        .iter()
        .filter(|t| file_path(t).to_lowercase().contains(&needle))
        .collect()
}

/// Last segment of a track's decoded path
pub fn track_file_name(track: &Track) -> String {
    file_name(&file_path(track)).to_string()
}
