//! Rekordbox XML reader
//!
//! Builds a [`Collection`] from a library export using streaming XML events,
//! so large collections never need an intermediate DOM.
//!
//! Coercion rules:
//! - Required text attributes (`Artist`, `Genre`, `Kind`, dates, ...) load as
//!   an empty string when missing
//! - Optional text attributes (`Album`, `Tonality`, ...) load as `None` when
//!   missing or empty
//! - Numeric attributes use their leading numeric prefix; anything else
//!   (including NaN and infinite values) loads as 0, except `Year` which loads
//!   as `None`

use crate::error::{DjqueryError, Result};
use crate::types::{
    Collection, CuePoint, PlaylistNode, Provenance, TempoMarker, Track, ROOT_NODE_NAME,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::schema::{
    attrs, collection_attrs, elements, mark_attrs, node_attrs, product_attrs, root_attrs,
    tempo_attrs,
};

/// Parse a library export into a new collection
///
/// Fails with [`DjqueryError::MalformedLibrary`] if the document is not
/// well-formed XML or lacks the `DJ_PLAYLISTS` root, the `PRODUCT` element or
/// the `COLLECTION` element. A missing `PLAYLISTS` section yields an empty
/// root node. Every call is independent.
pub fn parse_library(xml: &str) -> Result<Collection> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut state = ReaderState::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => state.open(&e, false)?,
            Event::Empty(e) => state.open(&e, true)?,
            Event::End(e) => state.close(e.name().as_ref()),
            Event::Eof => break,
            _ => {}
        }
    }

    state.finish()
}

/// Parse position while walking the document
#[derive(Default)]
struct ReaderState {
    depth: usize,
    saw_root: bool,
    saw_product: bool,
    saw_collection: bool,
    in_collection: bool,
    in_playlists: bool,
    provenance: Provenance,
    total_entries: u32,
    collection: Collection,
    current_track: Option<Track>,
    duplicates: usize,
    open_nodes: Vec<PlaylistNode>,
    root_node: Option<PlaylistNode>,
}

impl ReaderState {
    fn open(&mut self, e: &BytesStart, empty: bool) -> Result<()> {
        let depth = self.depth;
        if !empty {
            self.depth += 1;
        }

        let name = e.name();
        let name = name.as_ref();

        if depth == 0 {
            if name != elements::DJ_PLAYLISTS {
                return Err(DjqueryError::malformed(format!(
                    "root element is <{}>, expected <DJ_PLAYLISTS>",
                    String::from_utf8_lossy(name)
                )));
            }
            self.saw_root = true;
            self.read_provenance(&Attrs::from_element(e)?);
            return Ok(());
        }

        match name {
            elements::PRODUCT if depth == 1 => {
                let attrs = Attrs::from_element(e)?;
                self.saw_product = true;
                self.provenance.product_name = attrs.text(product_attrs::NAME);
                self.provenance.product_version = attrs.text(product_attrs::VERSION);
                self.provenance.product_company = attrs.text(product_attrs::COMPANY);
            }
            elements::COLLECTION if depth == 1 => {
                let attrs = Attrs::from_element(e)?;
                self.saw_collection = true;
                self.total_entries = attrs.number(collection_attrs::ENTRIES);
                self.in_collection = !empty;
            }
            elements::PLAYLISTS if depth == 1 => {
                self.in_playlists = !empty;
            }
            elements::TRACK if self.in_collection && depth == 2 => {
                let attrs = Attrs::from_element(e)?;
                let Some(track) = track_from_attrs(&attrs) else {
                    warn!("Skipping TRACK without a TrackID");
                    return Ok(());
                };
                if empty {
                    self.insert_track(track);
                } else {
                    self.current_track = Some(track);
                }
            }
            elements::TEMPO if self.current_track.is_some() => {
                let attrs = Attrs::from_element(e)?;
                if let Some(track) = self.current_track.as_mut() {
                    track.tempo_data.push(TempoMarker {
                        start: attrs.float(tempo_attrs::START),
                        bpm: attrs.float(tempo_attrs::BPM),
                        metro: attrs.text(tempo_attrs::METRO),
                        beat: attrs.number(tempo_attrs::BEAT),
                    });
                }
            }
            elements::POSITION_MARK if self.current_track.is_some() => {
                let attrs = Attrs::from_element(e)?;
                if let Some(track) = self.current_track.as_mut() {
                    track.push_cue(CuePoint {
                        name: attrs.text(mark_attrs::NAME),
                        start: attrs.float(mark_attrs::START),
                        kind: attrs.number(mark_attrs::TYPE),
                        num: attrs.number(mark_attrs::NUM),
                    });
                }
            }
            elements::NODE if self.in_playlists => {
                let attrs = Attrs::from_element(e)?;
                let is_top_level = self.open_nodes.is_empty() && self.root_node.is_none();
                let node = node_from_attrs(&attrs, is_top_level);
                if empty {
                    self.attach_node(node);
                } else {
                    self.open_nodes.push(node);
                }
            }
            elements::TRACK if !self.open_nodes.is_empty() => {
                let attrs = Attrs::from_element(e)?;
                if let (Some(key), Some(node)) =
                    (attrs.optional(node_attrs::KEY), self.open_nodes.last_mut())
                {
                    node.tracks.push(key);
                }
            }
            other => {
                debug!("Ignoring <{}> at depth {}", String::from_utf8_lossy(other), depth);
            }
        }

        Ok(())
    }

    fn close(&mut self, name: &[u8]) {
        self.depth = self.depth.saturating_sub(1);

        match name {
            elements::TRACK => {
                if let Some(track) = self.current_track.take() {
                    self.insert_track(track);
                }
            }
            elements::NODE if self.in_playlists => {
                if let Some(node) = self.open_nodes.pop() {
                    self.attach_node(node);
                }
            }
            elements::COLLECTION => self.in_collection = false,
            elements::PLAYLISTS => self.in_playlists = false,
            _ => {}
        }
    }

    fn read_provenance(&mut self, attrs: &Attrs) {
        self.provenance.version = attrs.text(root_attrs::VERSION);
        self.provenance.created_by = attrs.text(root_attrs::CREATED_BY_APP);
        self.provenance.created_by_version = attrs.text(root_attrs::CREATED_BY_VERSION);
        self.provenance.platform = attrs.text(root_attrs::CREATION_PLATFORM);
        self.provenance.modification_date = attrs.text(root_attrs::MODIFICATION_DATE);
    }

    fn insert_track(&mut self, track: Track) {
        let id = track.track_id.clone();
        if self.collection.insert(track) {
            self.duplicates += 1;
            warn!("Duplicate TrackID {}, keeping the later entry", id);
        }
    }

    fn attach_node(&mut self, node: PlaylistNode) {
        if let Some(parent) = self.open_nodes.last_mut() {
            parent.children.push(node);
        } else if self.root_node.is_none() {
            self.root_node = Some(node);
        } else {
            debug!("Ignoring extra top-level playlist node '{}'", node.name);
        }
    }

    fn finish(self) -> Result<Collection> {
        if !self.saw_root {
            return Err(DjqueryError::malformed("missing <DJ_PLAYLISTS> root element"));
        }
        if !self.saw_product {
            return Err(DjqueryError::malformed("missing <PRODUCT> element"));
        }
        if !self.saw_collection {
            return Err(DjqueryError::malformed("missing <COLLECTION> element"));
        }

        let mut collection = self.collection;
        collection.provenance = self.provenance;
        collection.total_entries = self.total_entries;
        collection.playlists = self.root_node.unwrap_or_else(PlaylistNode::root);

        if collection.len() as u64 != u64::from(collection.total_entries) {
            debug!(
                "COLLECTION declares {} entries but contains {} tracks",
                collection.total_entries,
                collection.len()
            );
        }

        info!(
            "Loaded {} tracks and {} playlists ({} duplicate IDs)",
            collection.len(),
            collection.playlists.descendants().len(),
            self.duplicates
        );

        Ok(collection)
    }
}

fn track_from_attrs(values: &Attrs) -> Option<Track> {
    let track_id = values.optional(attrs::TRACK_ID)?;

    Some(Track {
        track_id,
        name: values.text(attrs::NAME),
        artist: values.text(attrs::ARTIST),
        composer: values.optional(attrs::COMPOSER),
        album: values.optional(attrs::ALBUM),
        grouping: values.optional(attrs::GROUPING),
        genre: values.text(attrs::GENRE),
        kind: values.text(attrs::KIND),
        size: values.number(attrs::SIZE),
        total_time: values.number(attrs::TOTAL_TIME),
        disc_number: values.number(attrs::DISC_NUMBER),
        track_number: values.number(attrs::TRACK_NUMBER),
        year: values.optional_number(attrs::YEAR),
        average_bpm: values.float(attrs::AVERAGE_BPM),
        date_added: values.text(attrs::DATE_ADDED),
        date_modified: values.text(attrs::DATE_MODIFIED),
        bit_rate: values.number(attrs::BIT_RATE),
        sample_rate: values.number(attrs::SAMPLE_RATE),
        comments: values.optional(attrs::COMMENTS),
        play_count: values.number(attrs::PLAY_COUNT),
        rating: values.number(attrs::RATING),
        location: values.text(attrs::LOCATION),
        remixer: values.optional(attrs::REMIXER),
        tonality: values.optional(attrs::TONALITY),
        label: values.optional(attrs::LABEL),
        mix: values.optional(attrs::MIX),
        tempo_data: Vec::new(),
        cue_points: Vec::new(),
        hot_cues: Vec::new(),
    })
}

fn node_from_attrs(attrs: &Attrs, is_top_level: bool) -> PlaylistNode {
    let name = match attrs.optional(node_attrs::NAME) {
        Some(name) => name,
        None if is_top_level => ROOT_NODE_NAME.to_string(),
        None => String::new(),
    };

    PlaylistNode {
        node_type: attrs.number(node_attrs::TYPE),
        name,
        count: attrs.optional_number(node_attrs::COUNT),
        entries: attrs.optional_number(node_attrs::ENTRIES),
        key_type: attrs.optional_number(node_attrs::KEY_TYPE),
        tracks: Vec::new(),
        children: Vec::new(),
    }
}

// =============================================================================
// Attribute coercion
// =============================================================================

/// Unescaped attributes of one element
struct Attrs(HashMap<Vec<u8>, String>);

impl Attrs {
    fn from_element(e: &BytesStart) -> Result<Self> {
        let mut map = HashMap::new();
        for attr in e.attributes() {
            let attr = attr?;
            let value = attr.unescape_value()?.into_owned();
            map.insert(attr.key.as_ref().to_vec(), value);
        }
        Ok(Self(map))
    }

    fn get(&self, key: &[u8]) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Required text: missing becomes ""
    fn text(&self, key: &[u8]) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    /// Optional text: missing or empty becomes `None`
    fn optional(&self, key: &[u8]) -> Option<String> {
        self.get(key).filter(|v| !v.is_empty()).map(str::to_string)
    }

    /// Integer of any width, 0 when missing, unparsable or out of range
    fn number<T>(&self, key: &[u8]) -> T
    where
        T: TryFrom<i64> + Default,
    {
        self.optional_number(key).unwrap_or_default()
    }

    fn optional_number<T>(&self, key: &[u8]) -> Option<T>
    where
        T: TryFrom<i64>,
    {
        self.get(key)
            .and_then(leading_int)
            .and_then(|n| T::try_from(n).ok())
    }

    fn float(&self, key: &[u8]) -> f64 {
        self.get(key)
            .and_then(leading_float)
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }
}

/// Parse the leading base-10 integer of a string ("12abc" -> 12)
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    s[..end].parse().ok()
}

/// Parse the leading decimal number of a string ("128.00bpm" -> 128.0)
fn leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = digits(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits(end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_digits = digits(end + 1 + sign);
        if exp_digits > 0 {
            end += 1 + sign + exp_digits;
        }
    }

    s[..end].parse().ok()
}
