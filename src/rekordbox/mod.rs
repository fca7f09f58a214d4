//! Rekordbox XML library export format

pub mod reader;
pub mod schema;
pub mod uri;

pub use reader::parse_library;
pub use uri::{decode_location, file_name};
