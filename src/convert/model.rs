//! Playlist models on both sides of the conversion

/// A track as read from a JSPF document
///
/// Absent fields are `None`; a key that was present with an empty value is
/// `Some(String::new())`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTrack {
    pub title: Option<String>,
    pub creator: Option<String>,
    pub album: Option<String>,
    /// Always non-empty once the parser has accepted the track
    pub location: String,
    pub duration_ms: Option<u64>,
    pub image: Option<String>,
    pub annotation: Option<String>,
    pub info: Option<String>,
}

/// A parsed JSPF playlist
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourcePlaylist {
    pub metadata: PlaylistMetadata,
    pub tracks: Vec<SourceTrack>,
}

/// Playlist-level fields copied through unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistMetadata {
    pub title: Option<String>,
    pub creator: Option<String>,
    pub annotation: Option<String>,
    pub info: Option<String>,
    pub location: Option<String>,
}

/// A track ready to be written as an XSPF `<track>` element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetTrack {
    pub location: String,
    pub title: String,
    pub creator: String,
    pub album: String,
    pub annotation: Option<String>,
    pub info: Option<String>,
    pub image: Option<String>,
    pub duration: Option<u64>,
}

/// An XSPF playlist
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetPlaylist {
    pub metadata: PlaylistMetadata,
    pub tracks: Vec<TargetTrack>,
}

impl TargetPlaylist {
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }
}
