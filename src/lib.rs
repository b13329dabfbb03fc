//! playlist-converter - Convert JSPF playlists to XSPF

pub mod config;
pub mod convert;
pub mod server;
pub mod utils;

pub use convert::{ConversionError, ConvertOptions, MissingLocationPolicy, convert, convert_with};
