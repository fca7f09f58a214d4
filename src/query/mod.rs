//! Stateless queries over a loaded collection
//!
//! - `filter`: search criteria, stable sorting
//! - `lookup`: by key, BPM range, playlist, file name
//! - `analytics`: grouped aggregation, listings, statistics

pub mod analytics;
pub mod filter;
pub mod lookup;

pub use analytics::{
    analyze, library_stats, most_played, top_rated, unplayed, Aggregate, AnalysisResult,
    AnalyticsQuery, GroupBy, GroupResult, LibraryStats, ListingOptions, TrackSummary,
};
pub use filter::{search, SearchCriteria, SortField, SortOrder};
