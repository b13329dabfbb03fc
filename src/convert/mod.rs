//! JSPF to XSPF conversion
//!
//! The conversion runs in three stages:
//! - Parse: JSPF bytes into a [`SourcePlaylist`] ([`jspf`])
//! - Map: source tracks onto the XSPF layout ([`mapper`])
//! - Serialize: the mapped playlist into XSPF bytes ([`xspf`])
//!
//! Every call works on its own input and returns either the complete
//! document or an error. Nothing is shared between calls.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod jspf;
pub mod mapper;
pub mod model;
pub mod xspf;

pub use jspf::ParseError;
pub use model::{PlaylistMetadata, SourcePlaylist, SourceTrack, TargetPlaylist, TargetTrack};
pub use xspf::SerializeError;

/// What to do with a track that has no location
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum MissingLocationPolicy {
    /// Fail the whole conversion, naming the track
    #[default]
    Fail,
    /// Drop the track and log a warning
    Skip,
}

/// Options for a single conversion
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    pub missing_location: MissingLocationPolicy,
}

/// Conversion stage an error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Parse,
    Serialize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Parse => write!(f, "parse"),
            Stage::Serialize => write!(f, "serialize"),
        }
    }
}

/// A failed conversion, tagged with the stage and track that caused it
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("parse stage failed: {source}")]
    Parse {
        track: Option<usize>,
        #[source]
        source: ParseError,
    },

    #[error("serialize stage failed: {source}")]
    Serialize {
        track: Option<usize>,
        #[source]
        source: SerializeError,
    },
}

impl ConversionError {
    pub fn stage(&self) -> Stage {
        match self {
            ConversionError::Parse { .. } => Stage::Parse,
            ConversionError::Serialize { .. } => Stage::Serialize,
        }
    }

    /// Index of the offending track, when known
    ///
    /// Parse errors count entries of the source track list; serialize errors
    /// count tracks of the converted playlist.
    pub fn track_index(&self) -> Option<usize> {
        match self {
            ConversionError::Parse { track, .. } | ConversionError::Serialize { track, .. } => {
                *track
            }
        }
    }
}

impl From<ParseError> for ConversionError {
    fn from(source: ParseError) -> Self {
        let track = match &source {
            ParseError::MissingRequiredField { index, .. } => Some(*index),
            _ => None,
        };
        ConversionError::Parse { track, source }
    }
}

impl From<SerializeError> for ConversionError {
    fn from(source: SerializeError) -> Self {
        ConversionError::Serialize {
            track: source.track_index(),
            source,
        }
    }
}

/// Convert a JSPF document to XSPF with default options
///
/// # Examples
///
/// ```
/// let jspf = br#"{"playlist": {"track": [{"title": "Song A", "location": "file:///a.mp3"}]}}"#;
/// let xspf = playlist_converter::convert(jspf).unwrap();
/// let xml = String::from_utf8(xspf).unwrap();
///
/// assert!(xml.contains("<title>Song A</title>"));
/// assert!(xml.contains("<location>file:///a.mp3</location>"));
/// ```
pub fn convert(input: &[u8]) -> Result<Vec<u8>, ConversionError> {
    convert_with(input, &ConvertOptions::default())
}

/// Convert a JSPF document to XSPF
pub fn convert_with(input: &[u8], options: &ConvertOptions) -> Result<Vec<u8>, ConversionError> {
    let source = jspf::parse_with(input, options.missing_location)?;
    let target = mapper::map_playlist(source);
    let output = xspf::serialize(&target)?;

    debug!(
        "Converted {} input bytes into {} tracks",
        input.len(),
        target.track_count()
    );
    Ok(output)
}
