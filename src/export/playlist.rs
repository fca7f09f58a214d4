//! Playlist file rendering (TXT, M3U, M3U8, PLS)
//!
//! Rendering is pure: the same tracks, format and name always produce the
//! same text. Writing is a separate atomic step.

use crate::error::{DjqueryError, Result};
use crate::query::lookup::file_path;
use crate::types::Track;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Supported playlist file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistFormat {
    /// One file path per line
    Txt,
    M3u,
    #[default]
    M3u8,
    Pls,
}

impl PlaylistFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            PlaylistFormat::Txt => "txt",
            PlaylistFormat::M3u => "m3u",
            PlaylistFormat::M3u8 => "m3u8",
            PlaylistFormat::Pls => "pls",
        }
    }
}

impl fmt::Display for PlaylistFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaylistFormat {
    type Err = DjqueryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "txt" => Ok(PlaylistFormat::Txt),
            "m3u" => Ok(PlaylistFormat::M3u),
            "m3u8" => Ok(PlaylistFormat::M3u8),
            "pls" => Ok(PlaylistFormat::Pls),
            _ => Err(DjqueryError::ConfigError(format!(
                "unknown playlist format '{}' (expected txt, m3u, m3u8 or pls)",
                s
            ))),
        }
    }
}

/// Default playlist name: "Playlist_<today's UTC date>"
pub fn default_playlist_name() -> String {
    chrono::Utc::now().format("Playlist_%Y-%m-%d").to_string()
}

/// Render tracks as playlist file content
///
/// `name` only appears in PLS output.
pub fn render_playlist(tracks: &[&Track], format: PlaylistFormat, name: &str) -> String {
    match format {
        PlaylistFormat::Txt => tracks
            .iter()
            .map(|t| file_path(t))
            .collect::<Vec<_>>()
            .join("\n"),
        PlaylistFormat::M3u | PlaylistFormat::M3u8 => render_m3u(tracks),
        PlaylistFormat::Pls => render_pls(tracks, name),
    }
}

fn render_m3u(tracks: &[&Track]) -> String {
    let mut out = String::from("#EXTM3U\n");
    for track in tracks {
        // Writing to a String cannot fail
        let _ = writeln!(out, "#EXTINF:{},{}", track.total_time, display_title(track));
        let _ = writeln!(out, "{}", file_path(track));
    }
    out
}

fn render_pls(tracks: &[&Track], name: &str) -> String {
    let mut out = String::from("[playlist]\n");
    let _ = writeln!(out, "PlaylistName={}", name);
    let _ = writeln!(out, "NumberOfEntries={}", tracks.len());
    out.push('\n');

    for (index, track) in tracks.iter().enumerate() {
        let n = index + 1;
        let _ = writeln!(out, "File{}={}", n, file_path(track));
        let _ = writeln!(out, "Title{}={}", n, display_title(track));
        let _ = writeln!(out, "Length{}={}", n, track.total_time);
        out.push('\n');
    }

    out.push_str("Version=2\n");
    out
}

/// "Artist - Title"
fn display_title(track: &Track) -> String {
    format!("{} - {}", track.artist, track.name)
}

/// Write playlist content to `output_path`
///
/// Writes to a temp file next to the target, then renames it into place.
pub fn write_playlist(content: &str, output_path: &Path) -> Result<()> {
    let temp_path = temp_path_for(output_path);

    std::fs::write(&temp_path, content).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        DjqueryError::output_error(output_path, e)
    })?;

    std::fs::rename(&temp_path, output_path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        DjqueryError::output_error(output_path, e)
    })?;

    info!("Wrote {} bytes to {}", content.len(), output_path.display());

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
