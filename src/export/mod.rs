//! Playlist file export

pub mod playlist;

pub use playlist::{default_playlist_name, render_playlist, write_playlist, PlaylistFormat};
