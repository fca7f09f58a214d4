//! Grouped aggregation, derived listings and library statistics

use super::filter::{matches_genre, sort_tracks, truncate, SearchCriteria, SortField, SortOrder};
use crate::error::DjqueryError;
use crate::types::{Collection, Track};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Group label for tracks without a value in the grouping field
pub const UNKNOWN_GROUP: &str = "Unknown";

/// Number of genres reported by [`library_stats`]
pub const TOP_GENRES: usize = 10;

/// Number of keys reported by [`library_stats`]
pub const TOP_KEYS: usize = 12;

// =============================================================================
// Grouped analysis
// =============================================================================

/// Field used to partition tracks before aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    Genre,
    Key,
    Year,
    Artist,
    Rating,
}

impl GroupBy {
    /// Group label of a track
    pub fn label(self, track: &Track) -> String {
        match self {
            GroupBy::Genre => track.genre().unwrap_or(UNKNOWN_GROUP).to_string(),
            GroupBy::Key => track.tonality.as_deref().unwrap_or(UNKNOWN_GROUP).to_string(),
            GroupBy::Year => track
                .year
                .map(|y| y.to_string())
                .unwrap_or_else(|| UNKNOWN_GROUP.to_string()),
            GroupBy::Artist => track.artist.clone(),
            GroupBy::Rating => track.rating.to_string(),
        }
    }
}

impl FromStr for GroupBy {
    type Err = DjqueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "genre" => Ok(GroupBy::Genre),
            "key" => Ok(GroupBy::Key),
            "year" => Ok(GroupBy::Year),
            "artist" => Ok(GroupBy::Artist),
            "rating" => Ok(GroupBy::Rating),
            _ => Err(DjqueryError::ConfigError(format!(
                "unknown group field '{}' (expected genre, key, year, artist or rating)",
                s
            ))),
        }
    }
}

/// Aggregate computed over a group of tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Aggregate {
    /// Number of tracks
    #[default]
    Count,
    /// Sum of play counts
    PlayCount,
    /// Sum of durations in seconds
    TotalTime,
}

impl Aggregate {
    pub fn compute<'a, I>(self, tracks: I) -> u64
    where
        I: IntoIterator<Item = &'a Track>,
    {
        let tracks = tracks.into_iter();
        match self {
            Aggregate::Count => tracks.count() as u64,
            Aggregate::PlayCount => tracks.map(|t| u64::from(t.play_count)).sum(),
            Aggregate::TotalTime => tracks.map(|t| u64::from(t.total_time)).sum(),
        }
    }
}

impl FromStr for Aggregate {
    type Err = DjqueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "count" => Ok(Aggregate::Count),
            "playcount" => Ok(Aggregate::PlayCount),
            "totaltime" => Ok(Aggregate::TotalTime),
            _ => Err(DjqueryError::ConfigError(format!(
                "unknown aggregate '{}' (expected count, playCount or totalTime)",
                s
            ))),
        }
    }
}

/// Parameters of [`analyze`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsQuery {
    pub group_by: Option<GroupBy>,
    pub aggregate_by: Aggregate,
    /// Only the filter part is used; sorting and limit are ignored
    pub filters: Option<SearchCriteria>,
    /// Maximum number of groups, 0 means unlimited
    pub top_n: Option<usize>,
}

/// One group of a grouped analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResult {
    pub group: String,
    /// Number of tracks in the group
    pub tracks: usize,
    pub value: u64,
}

/// Outcome of [`analyze`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    /// No grouping: a single aggregate over all matching tracks
    #[serde(rename_all = "camelCase")]
    Total { total_matches: usize, result: u64 },
    /// Groups sorted by value, highest first
    Groups(Vec<GroupResult>),
}

/// Filter tracks, then aggregate them as a whole or per group
///
/// Groups are ordered by value descending; equal values keep the order in
/// which their groups first appeared.
pub fn analyze<'a, I>(tracks: I, query: &AnalyticsQuery) -> AnalysisResult
where
    I: IntoIterator<Item = &'a Track>,
{
    let filtered: Vec<&Track> = match &query.filters {
        Some(criteria) => tracks.into_iter().filter(|t| criteria.matches(t)).collect(),
        None => tracks.into_iter().collect(),
    };

    let Some(group_by) = query.group_by else {
        return AnalysisResult::Total {
            total_matches: filtered.len(),
            result: query.aggregate_by.compute(filtered.iter().copied()),
        };
    };

    let mut groups: Vec<(String, Vec<&Track>)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for track in filtered {
        let label = group_by.label(track);
        match positions.get(&label) {
            Some(&pos) => groups[pos].1.push(track),
            None => {
                positions.insert(label.clone(), groups.len());
                groups.push((label, vec![track]));
            }
        }
    }

    let mut results: Vec<GroupResult> = groups
        .into_iter()
        .map(|(group, members)| GroupResult {
            value: query.aggregate_by.compute(members.iter().copied()),
            tracks: members.len(),
            group,
        })
        .collect();

    results.sort_by(|a, b| b.value.cmp(&a.value));
    truncate(&mut results, query.top_n);

    AnalysisResult::Groups(results)
}

// =============================================================================
// Derived listings
// =============================================================================

/// Options shared by the most played / top rated / unplayed listings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingOptions {
    /// Case-insensitive genre substring
    pub genre: Option<String>,
    /// Maximum number of results, 0 means unlimited
    pub limit: Option<usize>,
    /// Secondary sort, only used by [`unplayed`] (always descending)
    pub sort_by: Option<SortField>,
}

impl ListingOptions {
    fn select<'a, I>(&self, tracks: I, keep: impl Fn(&Track) -> bool) -> Vec<&'a Track>
    where
        I: IntoIterator<Item = &'a Track>,
    {
        tracks
            .into_iter()
            .filter(|t| keep(t))
            .filter(|t| self.genre.as_deref().map_or(true, |g| matches_genre(t, g)))
            .collect()
    }

    fn finish(&self, mut tracks: Vec<&Track>) -> Vec<TrackSummary> {
        truncate(&mut tracks, self.limit);
        tracks.into_iter().map(TrackSummary::from).collect()
    }
}

/// Compact projection of a track for listings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSummary {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub genre: String,
    pub bpm: f64,
    pub key: Option<String>,
    pub play_count: u32,
    pub rating: u32,
    /// "m:ss"
    pub duration: String,
    pub year: Option<i32>,
    pub comments: Option<String>,
}

impl From<&Track> for TrackSummary {
    fn from(track: &Track) -> Self {
        Self {
            id: track.track_id.clone(),
            title: track.name.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            genre: track.genre.clone(),
            bpm: track.average_bpm,
            key: track.tonality.clone(),
            play_count: track.play_count,
            rating: track.rating,
            duration: format_duration(track.total_time),
            year: track.year,
            comments: track.comments.clone(),
        }
    }
}

/// Format seconds as "m:ss"
pub fn format_duration(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Played tracks, most plays first
pub fn most_played<'a, I>(tracks: I, options: &ListingOptions) -> Vec<TrackSummary>
where
    I: IntoIterator<Item = &'a Track>,
{
    let mut selected = options.select(tracks, |t| t.play_count > 0);
    sort_tracks(&mut selected, SortField::PlayCount, SortOrder::Desc);
    options.finish(selected)
}

/// Rated tracks, best first, ties broken by play count
pub fn top_rated<'a, I>(tracks: I, options: &ListingOptions) -> Vec<TrackSummary>
where
    I: IntoIterator<Item = &'a Track>,
{
    let mut selected = options.select(tracks, |t| t.rating > 0);
    selected.sort_by(|a, b| {
        b.rating
            .cmp(&a.rating)
            .then_with(|| b.play_count.cmp(&a.play_count))
    });
    options.finish(selected)
}

/// Tracks never played, optionally sorted descending by `sort_by`
pub fn unplayed<'a, I>(tracks: I, options: &ListingOptions) -> Vec<TrackSummary>
where
    I: IntoIterator<Item = &'a Track>,
{
    let mut selected = options.select(tracks, |t| t.play_count == 0);
    if let Some(field) = options.sort_by {
        sort_tracks(&mut selected, field, SortOrder::Desc);
    }
    options.finish(selected)
}

// =============================================================================
// Library statistics
// =============================================================================

/// Library-wide totals and histograms
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStats {
    pub total_tracks: usize,
    pub total_play_count: u64,
    pub total_duration_seconds: u64,
    /// Rounded to two decimal places
    pub total_duration_hours: f64,
    /// (genre, tracks), most common first
    pub top_genres: Vec<(String, usize)>,
    /// (key, tracks), most common first; tracks without a key are left out
    pub top_keys: Vec<(String, usize)>,
    /// Folders and playlists, root excluded
    pub playlist_count: usize,
}

pub fn library_stats(collection: &Collection) -> LibraryStats {
    let tracks = collection.tracks();
    let total_duration_seconds = Aggregate::TotalTime.compute(tracks);

    LibraryStats {
        total_tracks: tracks.len(),
        total_play_count: Aggregate::PlayCount.compute(tracks),
        total_duration_seconds,
        total_duration_hours: (total_duration_seconds as f64 / 3600.0 * 100.0).round() / 100.0,
        top_genres: histogram(
            tracks.iter().map(|t| t.genre().unwrap_or(UNKNOWN_GROUP)),
            TOP_GENRES,
        ),
        top_keys: histogram(tracks.iter().filter_map(|t| t.tonality.as_deref()), TOP_KEYS),
        playlist_count: collection.playlists.descendants().len(),
    }
}

/// Count labels, most frequent first (ties keep first-seen order), capped at `cap`
fn histogram<'a>(labels: impl Iterator<Item = &'a str>, cap: usize) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        match positions.get(label) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                positions.insert(label, counts.len());
                counts.push((label.to_string(), 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(cap);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PlaylistNode, Provenance};

    fn track(id: &str, genre: &str, plays: u32, rating: u32, seconds: u32) -> Track {
        Track {
            genre: genre.to_string(),
            play_count: plays,
            rating,
            total_time: seconds,
            artist: format!("Artist {}", id),
            ..Track::new(id)
        }
    }

    fn sample() -> Vec<Track> {
        vec![
            track("1", "House", 5, 4, 240),
            track("2", "Techno", 0, 5, 300),
            track("3", "House", 10, 3, 180),
        ]
    }

    fn summary_ids(summaries: &[TrackSummary]) -> Vec<&str> {
        summaries.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_group_by_genre_sum_play_count() {
        let tracks = sample();
        let query = AnalyticsQuery {
            group_by: Some(GroupBy::Genre),
            aggregate_by: Aggregate::PlayCount,
            ..Default::default()
        };

        let AnalysisResult::Groups(groups) = analyze(&tracks, &query) else {
            panic!("expected groups");
        };
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].group, "House");
        assert_eq!(groups[0].value, 15);
        assert_eq!(groups[0].tracks, 2);
        assert_eq!(groups[1].group, "Techno");
        assert_eq!(groups[1].value, 0);
    }

    #[test]
    fn test_ungrouped_total_with_filters() {
        let tracks = sample();
        let query = AnalyticsQuery {
            aggregate_by: Aggregate::TotalTime,
            filters: Some(SearchCriteria {
                genre: Some("house".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        assert_eq!(
            analyze(&tracks, &query),
            AnalysisResult::Total {
                total_matches: 2,
                result: 420
            }
        );
    }

    #[test]
    fn test_unknown_groups_and_top_n() {
        let mut tracks = sample();
        tracks.push(track("4", "", 0, 0, 60));
        tracks.push(track("5", "", 0, 0, 60));

        let by_key = AnalyticsQuery {
            group_by: Some(GroupBy::Key),
            ..Default::default()
        };
        let AnalysisResult::Groups(groups) = analyze(&tracks, &by_key) else {
            panic!("expected groups");
        };
        assert_eq!(
            groups,
            vec![GroupResult {
                group: UNKNOWN_GROUP.to_string(),
                tracks: 5,
                value: 5
            }]
        );

        let by_genre = AnalyticsQuery {
            group_by: Some(GroupBy::Genre),
            top_n: Some(2),
            ..Default::default()
        };
        let AnalysisResult::Groups(groups) = analyze(&tracks, &by_genre) else {
            panic!("expected groups");
        };
        let labels: Vec<_> = groups.iter().map(|g| g.group.as_str()).collect();
        assert_eq!(labels, vec!["House", "Unknown"]);
    }

    #[test]
    fn test_group_ties_keep_first_seen_order() {
        let tracks = vec![
            track("1", "Techno", 0, 0, 0),
            track("2", "House", 0, 0, 0),
            track("3", "Ambient", 0, 0, 0),
        ];
        let query = AnalyticsQuery {
            group_by: Some(GroupBy::Rating),
            ..Default::default()
        };
        let AnalysisResult::Groups(groups) = analyze(&tracks, &query) else {
            panic!("expected groups");
        };
        assert_eq!(groups[0].group, "0");

        let query = AnalyticsQuery {
            group_by: Some(GroupBy::Genre),
            ..Default::default()
        };
        let AnalysisResult::Groups(groups) = analyze(&tracks, &query) else {
            panic!("expected groups");
        };
        let labels: Vec<_> = groups.iter().map(|g| g.group.as_str()).collect();
        assert_eq!(labels, vec!["Techno", "House", "Ambient"]);
    }

    #[test]
    fn test_most_played() {
        let tracks = sample();
        let result = most_played(&tracks, &ListingOptions::default());
        assert_eq!(summary_ids(&result), vec!["3", "1"]);

        let limited = most_played(
            &tracks,
            &ListingOptions {
                limit: Some(1),
                ..Default::default()
            },
        );
        assert_eq!(summary_ids(&limited), vec!["3"]);
    }

    #[test]
    fn test_top_rated_tie_break_on_play_count() {
        let mut tracks = sample();
        tracks.push(track("4", "House", 50, 4, 200));
        tracks.push(track("5", "House", 1, 0, 200));

        let result = top_rated(&tracks, &ListingOptions::default());
        assert_eq!(summary_ids(&result), vec!["2", "4", "1", "3"]);

        let house = top_rated(
            &tracks,
            &ListingOptions {
                genre: Some("hou".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(summary_ids(&house), vec!["4", "1", "3"]);
    }

    #[test]
    fn test_unplayed_with_secondary_sort() {
        let mut tracks = sample();
        tracks.push(track("4", "Techno", 0, 1, 400));

        let plain = unplayed(&tracks, &ListingOptions::default());
        assert_eq!(summary_ids(&plain), vec!["2", "4"]);

        let by_time = unplayed(
            &tracks,
            &ListingOptions {
                sort_by: Some(SortField::TotalTime),
                ..Default::default()
            },
        );
        assert_eq!(summary_ids(&by_time), vec!["4", "2"]);
    }

    #[test]
    fn test_summary_duration() {
        assert_eq!(format_duration(240), "4:00");
        assert_eq!(format_duration(65), "1:05");
        assert_eq!(format_duration(7), "0:07");

        let summary = TrackSummary::from(&track("1", "House", 5, 4, 183));
        assert_eq!(summary.duration, "3:03");
        assert_eq!(summary.genre, "House");
    }

    #[test]
    fn test_library_stats() {
        let mut root = PlaylistNode::root();
        root.children.push(PlaylistNode {
            name: "A".to_string(),
            children: vec![PlaylistNode {
                name: "B".to_string(),
                ..PlaylistNode::default()
            }],
            ..PlaylistNode::default()
        });

        let mut collection = Collection::new(Provenance::default(), 0, root);
        let mut tracks = sample();
        tracks[0].tonality = Some("8A".to_string());
        tracks[2].tonality = Some("8A".to_string());
        tracks.push(track("4", "", 1, 0, 5400));
        for t in tracks {
            collection.insert(t);
        }

        let stats = library_stats(&collection);
        assert_eq!(stats.total_tracks, 4);
        assert_eq!(stats.total_play_count, 16);
        assert_eq!(stats.total_duration_seconds, 6120);
        assert_eq!(stats.total_duration_hours, 1.7);
        assert_eq!(stats.top_genres[0], ("House".to_string(), 2));
        assert!(stats.top_genres.contains(&("Unknown".to_string(), 1)));
        assert_eq!(stats.top_keys, vec![("8A".to_string(), 2)]);
        assert_eq!(stats.playlist_count, 2);
    }

    #[test]
    fn test_histogram_cap() {
        let labels = ["a", "b", "b", "c", "c", "c"];
        assert_eq!(
            histogram(labels.into_iter(), 2),
            vec![("c".to_string(), 3), ("b".to_string(), 2)]
        );
    }

    #[test]
    fn test_query_from_json() {
        let query: AnalyticsQuery =
            serde_json::from_str(r#"{"groupBy":"genre","aggregateBy":"playCount","topN":3}"#)
                .unwrap();
        assert_eq!(query.group_by, Some(GroupBy::Genre));
        assert_eq!(query.aggregate_by, Aggregate::PlayCount);
        assert_eq!(query.top_n, Some(3));
    }
}
