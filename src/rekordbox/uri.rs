//! URI decoding for the Rekordbox Location attribute
//!
//! Rekordbox stores paths as percent-encoded URIs:
//! - macOS/Linux: file://localhost/Users/DJ/My%20Music/Track.mp3
//! - Windows: file://localhost/C:/Music/Track.mp3
//!
//! The decoded form (prefix stripped, percent escapes resolved) is the file
//! path surfaced everywhere a track's location is shown or matched.

use percent_encoding::percent_decode_str;

/// URI prefix Rekordbox puts in front of every location
pub const LOCATION_PREFIX: &str = "file://localhost";

/// Convert a Rekordbox location URI to a file path
///
/// Invalid UTF-8 in the escapes is replaced rather than rejected.
///
/// # Examples
///
/// ```
/// use djquery::rekordbox::uri::decode_location;
///
/// let path = decode_location("file://localhost/Users/DJ/My%20Music/Track.mp3");
/// assert_eq!(path, "/Users/DJ/My Music/Track.mp3");
/// ```
pub fn decode_location(location: &str) -> String {
    let encoded = location.strip_prefix(LOCATION_PREFIX).unwrap_or(location);
    percent_decode_str(encoded).decode_utf8_lossy().into_owned()
}

/// Last path segment of a decoded file path
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
