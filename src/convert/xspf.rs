//! XSPF playlist serialization

use thiserror::Error;
use tracing::debug;

use super::model::{PlaylistMetadata, TargetPlaylist, TargetTrack};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
const XSPF_NAMESPACE: &str = "http://xspf.org/ns/0/";

/// Errors produced while writing an XSPF document
#[derive(Debug, Error)]
pub enum SerializeError {
    /// The playlist breaks a model invariant
    #[error("invalid playlist structure at track {track}: {reason}")]
    InvalidStructure { track: usize, reason: &'static str },

    /// A value holds a character XML 1.0 cannot represent
    #[error("{} {field} contains character {ch:?} which cannot appear in XML", location_label(.track))]
    InvalidCharacter {
        track: Option<usize>,
        field: &'static str,
        ch: char,
    },
}

impl SerializeError {
    /// Index of the offending track, if the error is tied to one
    pub fn track_index(&self) -> Option<usize> {
        match self {
            SerializeError::InvalidStructure { track, .. } => Some(*track),
            SerializeError::InvalidCharacter { track, .. } => *track,
        }
    }
}

fn location_label(track: &Option<usize>) -> String {
    match track {
        Some(index) => format!("track {}", index),
        None => "playlist".to_string(),
    }
}

/// Render a playlist as an XSPF document
pub fn serialize(playlist: &TargetPlaylist) -> Result<Vec<u8>, SerializeError> {
    validate(playlist)?;

    let mut writer = XmlWriter::new();
    writer.open("playlist", &[("version", "1"), ("xmlns", XSPF_NAMESPACE)]);

    let metadata = &playlist.metadata;
    writer.optional("title", metadata.title.as_deref());
    writer.optional("creator", metadata.creator.as_deref());
    writer.optional("annotation", metadata.annotation.as_deref());
    writer.optional("info", metadata.info.as_deref());
    writer.optional("location", metadata.location.as_deref());

    if playlist.tracks.is_empty() {
        writer.empty("trackList");
    } else {
        writer.open("trackList", &[]);
        for track in &playlist.tracks {
            write_track(&mut writer, track);
        }
        writer.close("trackList");
    }

    writer.close("playlist");

    let bytes = writer.finish();
    debug!(
        "Serialized XSPF playlist with {} tracks ({} bytes)",
        playlist.track_count(),
        bytes.len()
    );
    Ok(bytes)
}

fn write_track(writer: &mut XmlWriter, track: &TargetTrack) {
    writer.open("track", &[]);
    writer.element("location", &track.location);
    writer.element("title", &track.title);
    writer.element("creator", &track.creator);
    writer.optional("annotation", track.annotation.as_deref());
    writer.optional("info", track.info.as_deref());
    writer.optional("image", track.image.as_deref());
    writer.element("album", &track.album);
    if let Some(duration) = track.duration {
        writer.element("duration", &duration.to_string());
    }
    writer.close("track");
}

fn validate(playlist: &TargetPlaylist) -> Result<(), SerializeError> {
    check_metadata(&playlist.metadata)?;

    for (index, track) in playlist.tracks.iter().enumerate() {
        if track.location.is_empty() {
            return Err(SerializeError::InvalidStructure {
                track: index,
                reason: "location is empty",
            });
        }

        let fields = [
            ("location", Some(track.location.as_str())),
            ("title", Some(track.title.as_str())),
            ("creator", Some(track.creator.as_str())),
            ("album", Some(track.album.as_str())),
            ("annotation", track.annotation.as_deref()),
            ("info", track.info.as_deref()),
            ("image", track.image.as_deref()),
        ];
        for (field, value) in fields {
            check_text(Some(index), field, value)?;
        }
    }

    Ok(())
}

fn check_metadata(metadata: &PlaylistMetadata) -> Result<(), SerializeError> {
    let fields = [
        ("title", metadata.title.as_deref()),
        ("creator", metadata.creator.as_deref()),
        ("annotation", metadata.annotation.as_deref()),
        ("info", metadata.info.as_deref()),
        ("location", metadata.location.as_deref()),
    ];
    for (field, value) in fields {
        check_text(None, field, value)?;
    }
    Ok(())
}

fn check_text(
    track: Option<usize>,
    field: &'static str,
    value: Option<&str>,
) -> Result<(), SerializeError> {
    match value.and_then(|v| v.chars().find(|c| !is_xml_char(*c))) {
        Some(ch) => Err(SerializeError::InvalidCharacter { track, field, ch }),
        None => Ok(()),
    }
}

/// XML 1.0 `Char` production
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= '\u{20}' && !matches!(c, '\u{FFFE}' | '\u{FFFF}'))
}

/// Minimal indenting XML writer
struct XmlWriter {
    out: String,
    depth: usize,
}

impl XmlWriter {
    fn new() -> Self {
        Self {
            out: String::from(XML_DECLARATION),
            depth: 0,
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
    }

    fn open(&mut self, tag: &str, attributes: &[(&str, &str)]) {
        self.indent();
        self.out.push('<');
        self.out.push_str(tag);
        for (name, value) in attributes {
            self.out.push(' ');
            self.out.push_str(name);
            self.out.push_str("=\"");
            push_escaped(&mut self.out, value);
            self.out.push('"');
        }
        self.out.push_str(">\n");
        self.depth += 1;
    }

    fn close(&mut self, tag: &str) {
        self.depth -= 1;
        self.indent();
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push_str(">\n");
    }

    fn empty(&mut self, tag: &str) {
        self.indent();
        self.out.push('<');
        self.out.push_str(tag);
        self.out.push_str("/>\n");
    }

    /// Text element; empty values render self-closing
    fn element(&mut self, tag: &str, value: &str) {
        if value.is_empty() {
            self.empty(tag);
            return;
        }
        self.indent();
        self.out.push('<');
        self.out.push_str(tag);
        self.out.push('>');
        push_escaped(&mut self.out, value);
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push_str(">\n");
    }

    fn optional(&mut self, tag: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.element(tag, value);
        }
    }

    fn finish(self) -> Vec<u8> {
        self.out.into_bytes()
    }
}

fn push_escaped(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // A raw CR would be normalized to LF by any XML reader
            '\r' => out.push_str("&#13;"),
            _ => out.push(c),
        }
    }
}
