//! JSPF to XSPF field mapping

use super::model::{SourcePlaylist, SourceTrack, TargetPlaylist, TargetTrack};

/// Map a source track onto the XSPF track layout
///
/// Title, creator and album default to an empty string; every other
/// optional field stays absent so its element is omitted.
pub fn map_track(track: SourceTrack) -> TargetTrack {
    TargetTrack {
        location: track.location,
        title: track.title.unwrap_or_default(),
        creator: track.creator.unwrap_or_default(),
        album: track.album.unwrap_or_default(),
        annotation: track.annotation,
        info: track.info,
        image: track.image,
        duration: track.duration_ms,
    }
}

/// Map every track in order and carry the playlist metadata across
pub fn map_playlist(playlist: SourcePlaylist) -> TargetPlaylist {
    TargetPlaylist {
        metadata: playlist.metadata,
        tracks: playlist.tracks.into_iter().map(map_track).collect(),
    }
}
