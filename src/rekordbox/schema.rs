//! Rekordbox XML schema constants

/// Element names
pub mod elements {
    pub const DJ_PLAYLISTS: &[u8] = b"DJ_PLAYLISTS";
    pub const PRODUCT: &[u8] = b"PRODUCT";
    pub const COLLECTION: &[u8] = b"COLLECTION";
    pub const TRACK: &[u8] = b"TRACK";
    pub const TEMPO: &[u8] = b"TEMPO";
    pub const POSITION_MARK: &[u8] = b"POSITION_MARK";
    pub const PLAYLISTS: &[u8] = b"PLAYLISTS";
    pub const NODE: &[u8] = b"NODE";
}

/// DJ_PLAYLISTS attribute names
pub mod root_attrs {
    pub const VERSION: &[u8] = b"Version";
    pub const CREATED_BY_APP: &[u8] = b"CreatedByApp";
    pub const CREATED_BY_VERSION: &[u8] = b"CreatedByVersion";
    pub const CREATION_PLATFORM: &[u8] = b"CreationPlatform";
    pub const MODIFICATION_DATE: &[u8] = b"ModificationDate";
}

/// PRODUCT attribute names
pub mod product_attrs {
    pub const NAME: &[u8] = b"Name";
    pub const VERSION: &[u8] = b"Version";
    pub const COMPANY: &[u8] = b"Company";
}

/// COLLECTION attribute names
pub mod collection_attrs {
    pub const ENTRIES: &[u8] = b"Entries";
}

/// Rekordbox track attribute names
pub mod attrs {
    pub const TRACK_ID: &[u8] = b"TrackID";
    pub const NAME: &[u8] = b"Name";
    pub const ARTIST: &[u8] = b"Artist";
    pub const COMPOSER: &[u8] = b"Composer";
    pub const ALBUM: &[u8] = b"Album";
    pub const GROUPING: &[u8] = b"Grouping";
    pub const GENRE: &[u8] = b"Genre";
    pub const KIND: &[u8] = b"Kind";
    pub const SIZE: &[u8] = b"Size";
    pub const TOTAL_TIME: &[u8] = b"TotalTime";
    pub const DISC_NUMBER: &[u8] = b"DiscNumber";
    pub const TRACK_NUMBER: &[u8] = b"TrackNumber";
    pub const YEAR: &[u8] = b"Year";
    pub const AVERAGE_BPM: &[u8] = b"AverageBpm";
    pub const DATE_ADDED: &[u8] = b"DateAdded";
    pub const DATE_MODIFIED: &[u8] = b"DateModified";
    pub const BIT_RATE: &[u8] = b"BitRate";
    pub const SAMPLE_RATE: &[u8] = b"SampleRate";
    pub const COMMENTS: &[u8] = b"Comments";
    pub const PLAY_COUNT: &[u8] = b"PlayCount";
    pub const RATING: &[u8] = b"Rating";
    pub const LOCATION: &[u8] = b"Location";
    pub const REMIXER: &[u8] = b"Remixer";
    pub const TONALITY: &[u8] = b"Tonality";
    pub const LABEL: &[u8] = b"Label";
    pub const MIX: &[u8] = b"Mix";
}

/// TEMPO attribute names (the format keeps the Italian originals)
pub mod tempo_attrs {
    pub const START: &[u8] = b"Inizio";
    pub const BPM: &[u8] = b"Bpm";
    pub const METRO: &[u8] = b"Metro";
    pub const BEAT: &[u8] = b"Battito";
}

/// POSITION_MARK attribute names
pub mod mark_attrs {
    pub const NAME: &[u8] = b"Name";
    pub const START: &[u8] = b"Start";
    pub const TYPE: &[u8] = b"Type";
    pub const NUM: &[u8] = b"Num";
}

/// Playlist NODE attribute names
pub mod node_attrs {
    pub const TYPE: &[u8] = b"Type";
    pub const NAME: &[u8] = b"Name";
    pub const COUNT: &[u8] = b"Count";
    pub const ENTRIES: &[u8] = b"Entries";
    pub const KEY_TYPE: &[u8] = b"KeyType";
    /// Attribute of a playlist TRACK reference
    pub const KEY: &[u8] = b"Key";
}
