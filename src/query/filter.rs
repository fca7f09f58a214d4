//! Track filtering and sorting

use crate::error::DjqueryError;
use crate::types::Track;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::str::FromStr;

/// Field a track list can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    PlayCount,
    Rating,
    Bpm,
    DateAdded,
    DateModified,
    Artist,
    Title,
    Genre,
    Year,
    TotalTime,
}

impl SortField {
    pub const ALL: [SortField; 10] = [
        SortField::PlayCount,
        SortField::Rating,
        SortField::Bpm,
        SortField::DateAdded,
        SortField::DateModified,
        SortField::Artist,
        SortField::Title,
        SortField::Genre,
        SortField::Year,
        SortField::TotalTime,
    ];

    /// Name as used in queries, e.g. "playCount"
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::PlayCount => "playCount",
            SortField::Rating => "rating",
            SortField::Bpm => "bpm",
            SortField::DateAdded => "dateAdded",
            SortField::DateModified => "dateModified",
            SortField::Artist => "artist",
            SortField::Title => "title",
            SortField::Genre => "genre",
            SortField::Year => "year",
            SortField::TotalTime => "totalTime",
        }
    }

    /// Ascending sort key of a track for this field
    ///
    /// Text is lowercased and dates are parsed; [`sort_tracks`] computes it
    /// once per track.
    pub fn key(self, track: &Track) -> SortKey {
        match self {
            SortField::PlayCount => SortKey::Int(i64::from(track.play_count)),
            SortField::Rating => SortKey::Int(i64::from(track.rating)),
            SortField::Bpm => SortKey::Float(TotalF64(track.average_bpm)),
            SortField::DateAdded => SortKey::Date(parse_date(&track.date_added)),
            SortField::DateModified => SortKey::Date(parse_date(&track.date_modified)),
            SortField::Artist => SortKey::Text(track.artist.to_lowercase()),
            SortField::Title => SortKey::Text(track.name.to_lowercase()),
            SortField::Genre => SortKey::Text(track.genre.to_lowercase()),
            SortField::Year => SortKey::Int(i64::from(track.year.unwrap_or(0))),
            SortField::TotalTime => SortKey::Int(i64::from(track.total_time)),
        }
    }
}

/// Precomputed sort key; keys of one field always share a variant
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Int(i64),
    Float(TotalF64),
    /// `None` (unparsable) orders before every valid date
    Date(Option<i64>),
    Text(String),
}

/// `f64` ordered by [`f64::total_cmp`]
#[derive(Debug, Clone, Copy)]
pub struct TotalF64(pub f64);

impl PartialEq for TotalF64 {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TotalF64 {}

impl PartialOrd for TotalF64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TotalF64 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl FromStr for SortField {
    type Err = DjqueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                DjqueryError::ConfigError(format!(
                    "unknown sort field '{}' (expected one of: {})",
                    s,
                    SortField::ALL.map(SortField::as_str).join(", ")
                ))
            })
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = DjqueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(DjqueryError::ConfigError(format!(
                "unknown sort order '{}' (expected asc or desc)",
                s
            ))),
        }
    }
}

/// Search filters plus optional sorting and truncation
///
/// Every filter that is set must pass. Text filters are case-insensitive
/// substring matches, `key` is an exact case-sensitive tonality match, and
/// numeric bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchCriteria {
    pub artist: Option<String>,
    pub title: Option<String>,
    pub genre: Option<String>,
    pub key: Option<String>,
    pub bpm_min: Option<f64>,
    pub bpm_max: Option<f64>,
    pub play_count_min: Option<u32>,
    pub play_count_max: Option<u32>,
    pub rating: Option<u32>,
    pub year: Option<i32>,
    /// Maximum number of results, 0 means unlimited
    pub limit: Option<usize>,
    pub sort_by: Option<SortField>,
    pub sort_order: Option<SortOrder>,
}

impl SearchCriteria {
    /// Check a track against every filter (sorting and limit are ignored)
    pub fn matches(&self, track: &Track) -> bool {
        if let Some(artist) = &self.artist {
            if !contains_ignore_case(&track.artist, artist) {
                return false;
            }
        }
        if let Some(title) = &self.title {
            if !contains_ignore_case(&track.name, title) {
                return false;
            }
        }
        if let Some(genre) = &self.genre {
            if !matches_genre(track, genre) {
                return false;
            }
        }
        if let Some(key) = &self.key {
            if track.tonality.as_deref() != Some(key.as_str()) {
                return false;
            }
        }
        if self.bpm_min.is_some_and(|min| track.average_bpm < min) {
            return false;
        }
        if self.bpm_max.is_some_and(|max| track.average_bpm > max) {
            return false;
        }
        if self.play_count_min.is_some_and(|min| track.play_count < min) {
            return false;
        }
        if self.play_count_max.is_some_and(|max| track.play_count > max) {
            return false;
        }
        if self.rating.is_some_and(|rating| track.rating != rating) {
            return false;
        }
        if let Some(year) = self.year {
            if track.year != Some(year) {
                return false;
            }
        }
        true
    }
}

/// Filter, sort and truncate tracks
pub fn search<'a, I>(tracks: I, criteria: &SearchCriteria) -> Vec<&'a Track>
where
    I: IntoIterator<Item = &'a Track>,
{
    let mut matched: Vec<&Track> = tracks
        .into_iter()
        .filter(|t| criteria.matches(t))
        .collect();

    if let Some(field) = criteria.sort_by {
        sort_tracks(&mut matched, field, criteria.sort_order.unwrap_or_default());
    }

    truncate(&mut matched, criteria.limit);
    matched
}

/// Stable sort: tracks with equal keys keep their input order in both directions
pub fn sort_tracks(tracks: &mut [&Track], field: SortField, order: SortOrder) {
    match order {
        SortOrder::Asc => tracks.sort_by_cached_key(|t| field.key(t)),
        SortOrder::Desc => tracks.sort_by_cached_key(|t| Reverse(field.key(t))),
    }
}

/// Apply an optional limit, where 0 means unlimited
pub(crate) fn truncate<T>(items: &mut Vec<T>, limit: Option<usize>) {
    if let Some(limit) = limit.filter(|&n| n > 0) {
        items.truncate(limit);
    }
}

/// Case-insensitive substring match on genre; an unset genre never matches a
/// non-empty filter
pub(crate) fn matches_genre(track: &Track, filter: &str) -> bool {
    contains_ignore_case(&track.genre, filter)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Parse a Rekordbox date into a UTC timestamp in milliseconds
///
/// Date-only values are taken as midnight UTC. Unparsable values return
/// `None`, which orders before every valid date.
pub fn parse_date(value: &str) -> Option<i64> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%z") {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp_millis());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}
