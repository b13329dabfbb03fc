//! JSPF playlist parsing
//!
//! JSPF documents in the wild disagree on key names and value shapes, so the
//! document is first read into loose raw records and then resolved into
//! typed [`SourceTrack`]s. Aliases are tried in priority order and the first
//! non-empty value wins.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::MissingLocationPolicy;
use super::model::{PlaylistMetadata, SourcePlaylist, SourceTrack};

/// Errors produced while reading a JSPF document
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input is not valid JSON
    #[error("malformed JSPF document: {message}")]
    Malformed {
        line: usize,
        column: usize,
        message: String,
    },

    /// A track lacks a field that cannot be defaulted
    #[error("track {index} has no {field}")]
    MissingRequiredField { index: usize, field: &'static str },

    /// The document is valid JSON but has no playlist in it
    #[error("expected a playlist object or track array, found {found}")]
    NotAPlaylist { found: &'static str },
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError::Malformed {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPlaylist {
    title: Option<Value>,
    creator: Option<Value>,
    annotation: Option<Value>,
    info: Option<Value>,
    location: Option<Value>,
    track: Option<Value>,
    tracks: Option<Value>,
}

impl RawPlaylist {
    fn metadata(&self) -> PlaylistMetadata {
        PlaylistMetadata {
            title: pick(&[&self.title]),
            creator: pick(&[&self.creator]),
            annotation: pick(&[&self.annotation]),
            info: pick(&[&self.info]),
            location: pick(&[&self.location]),
        }
    }

    fn into_entries(self) -> Vec<Value> {
        match (self.track, self.tracks) {
            (Some(Value::Array(items)), _) => items,
            (_, Some(Value::Array(items))) => items,
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTrack {
    title: Option<Value>,
    name: Option<Value>,
    creator: Option<Value>,
    artist: Option<Value>,
    album: Option<Value>,
    #[serde(rename = "albumTitle")]
    album_title: Option<Value>,
    location: Option<Value>,
    uri: Option<Value>,
    file: Option<Value>,
    url: Option<Value>,
    duration: Option<Value>,
    image: Option<Value>,
    annotation: Option<Value>,
    info: Option<Value>,
}

impl RawTrack {
    /// Resolve aliases into a typed track, or `None` when no location is given
    fn resolve(self, index: usize) -> Option<SourceTrack> {
        let location = pick(&[&self.location, &self.uri, &self.file, &self.url])
            .filter(|location| !location.is_empty())?;

        Some(SourceTrack {
            title: pick(&[&self.title, &self.name]),
            creator: pick(&[&self.creator, &self.artist]),
            album: pick(&[&self.album, &self.album_title]),
            location,
            duration_ms: self
                .duration
                .as_ref()
                .and_then(|value| duration_ms(value, index)),
            image: pick(&[&self.image]),
            annotation: pick(&[&self.annotation]),
            info: pick(&[&self.info]),
        })
    }
}

/// Parse a JSPF document, failing on tracks without a location
pub fn parse(bytes: &[u8]) -> Result<SourcePlaylist, ParseError> {
    parse_with(bytes, MissingLocationPolicy::Fail)
}

/// Parse a JSPF document with an explicit missing-location policy
pub fn parse_with(
    bytes: &[u8],
    policy: MissingLocationPolicy,
) -> Result<SourcePlaylist, ParseError> {
    let document: Value = serde_json::from_slice(bytes)?;

    // Accept both `{"playlist": {...}}` and a bare playlist object
    let body = match document {
        Value::Object(mut map) => match map.remove("playlist") {
            Some(inner) => inner,
            None => Value::Object(map),
        },
        other => other,
    };

    let (metadata, entries) = match body {
        Value::Object(map) => {
            let raw: RawPlaylist = serde_json::from_value(Value::Object(map))?;
            (raw.metadata(), raw.into_entries())
        }
        Value::Array(items) => (PlaylistMetadata::default(), items),
        other => {
            return Err(ParseError::NotAPlaylist {
                found: kind(&other),
            });
        }
    };

    let mut tracks = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        if !entry.is_object() {
            warn!(
                track = index,
                found = kind(&entry),
                "Skipping track entry that is not an object"
            );
            continue;
        }

        let raw: RawTrack = serde_json::from_value(entry)?;
        match raw.resolve(index) {
            Some(track) => tracks.push(track),
            None => match policy {
                MissingLocationPolicy::Fail => {
                    return Err(ParseError::MissingRequiredField {
                        index,
                        field: "location",
                    });
                }
                MissingLocationPolicy::Skip => {
                    warn!(track = index, "Skipping track without a location");
                }
            },
        }
    }

    debug!("Parsed JSPF playlist with {} tracks", tracks.len());
    Ok(SourcePlaylist { metadata, tracks })
}

/// First non-empty value among the aliases, else the first present one
fn pick(candidates: &[&Option<Value>]) -> Option<String> {
    first_non_empty(
        candidates
            .iter()
            .filter_map(|candidate| candidate.as_ref())
            .filter_map(text),
    )
}

fn first_non_empty(values: impl Iterator<Item = String>) -> Option<String> {
    let mut fallback = None;
    for value in values {
        if !value.is_empty() {
            return Some(value);
        }
        fallback.get_or_insert(value);
    }
    fallback
}

/// Render a JSON value as text
///
/// Arrays yield their first non-empty scalar, which covers JSPF's
/// `"location": ["file:///a.mp3"]`.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => first_non_empty(
            items
                .iter()
                .filter(|item| !item.is_array())
                .filter_map(text),
        ),
        Value::Null | Value::Object(_) => None,
    }
}

fn duration_ms(value: &Value, index: usize) -> Option<u64> {
    let parsed = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.trunc() as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    if parsed.is_none() {
        warn!(
            track = index,
            duration = %value,
            "Ignoring duration that is not a non-negative integer"
        );
    }
    parsed
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
