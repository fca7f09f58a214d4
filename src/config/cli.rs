//! CLI argument parsing and configuration

use crate::export::PlaylistFormat;
use crate::query::{Aggregate, GroupBy, SearchCriteria, SortField, SortOrder};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Environment variable naming the default library export
pub const LIBRARY_ENV: &str = "DJQUERY_LIBRARY";

/// djquery - query and export a Rekordbox library
///
/// Loads a rekordbox.xml collection export and answers searches, key/BPM
/// lookups and play statistics, or writes playlist files. Results are
/// printed as JSON.
#[derive(Parser, Debug)]
#[command(name = "djquery")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Rekordbox XML export to load
    #[arg(short, long, value_name = "PATH", env = LIBRARY_ENV, global = true)]
    pub library: Option<PathBuf>,

    /// Print compact instead of pretty JSON
    #[arg(long, default_value = "false", global = true)]
    pub compact: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, default_value = "false", global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Library-wide totals, top genres and keys
    Stats,
    /// Search tracks with filters and sorting
    Search(SearchArgs),
    /// Show one track including cue points and beat grid
    Track {
        /// Track ID
        id: String,
    },
    /// List all folders and playlists
    Playlists,
    /// Tracks of a playlist (first match by name, case-insensitive)
    Playlist {
        /// Playlist name
        name: String,
    },
    /// Group and aggregate tracks
    Analyze(AnalyzeArgs),
    /// Most played tracks
    MostPlayed(ListingArgs),
    /// Highest rated tracks
    TopRated(ListingArgs),
    /// Tracks that were never played
    Unplayed(ListingArgs),
    /// Tracks in a musical key (exact match, e.g. "8A")
    Key {
        key: String,
    },
    /// Tracks within a BPM range (inclusive)
    Bpm {
        min: f64,
        max: f64,
    },
    /// Tracks whose file path contains a fragment
    FindFile {
        fragment: String,
    },
    /// Write a playlist file
    Export(ExportArgs),
}

/// Filter flags shared by search and analyze
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Artist contains (case-insensitive)
    #[arg(long)]
    pub artist: Option<String>,
    /// Title contains (case-insensitive)
    #[arg(long)]
    pub title: Option<String>,
    /// Genre contains (case-insensitive)
    #[arg(long)]
    pub genre: Option<String>,
    /// Exact musical key, e.g. "2A"
    #[arg(long)]
    pub key: Option<String>,
    #[arg(long, value_name = "BPM")]
    pub bpm_min: Option<f64>,
    #[arg(long, value_name = "BPM")]
    pub bpm_max: Option<f64>,
    #[arg(long, value_name = "N")]
    pub play_count_min: Option<u32>,
    #[arg(long, value_name = "N")]
    pub play_count_max: Option<u32>,
    /// Exact rating (0-5)
    #[arg(long)]
    pub rating: Option<u32>,
    /// Exact release year
    #[arg(long)]
    pub year: Option<i32>,
}

impl FilterArgs {
    pub fn to_criteria(&self) -> SearchCriteria {
        SearchCriteria {
            artist: self.artist.clone(),
            title: self.title.clone(),
            genre: self.genre.clone(),
            key: self.key.clone(),
            bpm_min: self.bpm_min,
            bpm_max: self.bpm_max,
            play_count_min: self.play_count_min,
            play_count_max: self.play_count_max,
            rating: self.rating,
            year: self.year,
            ..SearchCriteria::default()
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    #[command(flatten)]
    pub filters: FilterArgs,
    /// Sort field: playCount, rating, bpm, dateAdded, dateModified, artist,
    /// title, genre, year, totalTime
    #[arg(long, value_name = "FIELD")]
    pub sort_by: Option<SortField>,
    /// Sort order: asc or desc (default: desc)
    #[arg(long, value_name = "ORDER")]
    pub sort_order: Option<SortOrder>,
    /// Maximum number of results
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

impl SearchArgs {
    pub fn to_criteria(&self) -> SearchCriteria {
        SearchCriteria {
            sort_by: self.sort_by,
            sort_order: self.sort_order,
            limit: self.limit,
            ..self.filters.to_criteria()
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub filters: FilterArgs,
    /// Group by: genre, key, year, artist or rating
    #[arg(long, value_name = "FIELD")]
    pub group_by: Option<GroupBy>,
    /// Aggregate: count, playCount or totalTime (default: count)
    #[arg(long, value_name = "AGG")]
    pub aggregate_by: Option<Aggregate>,
    /// Keep only the N largest groups
    #[arg(long, value_name = "N")]
    pub top_n: Option<usize>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListingArgs {
    /// Genre contains (case-insensitive)
    #[arg(long)]
    pub genre: Option<String>,
    /// Maximum number of results
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
    /// Secondary sort field (unplayed only)
    #[arg(long, value_name = "FIELD")]
    pub sort_by: Option<SortField>,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Output playlist file
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,
    /// Track IDs to export (comma separated); omit to export a search
    #[arg(long, value_delimiter = ',')]
    pub ids: Vec<String>,
    /// Playlist format: txt, m3u, m3u8 or pls
    #[arg(short, long)]
    pub format: Option<PlaylistFormat>,
    /// Playlist name (defaults to Playlist_<date>)
    #[arg(long)]
    pub name: Option<String>,
    #[command(flatten)]
    pub search: SearchArgs,
}

impl Cli {
    /// Get the log level based on verbosity flags
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
