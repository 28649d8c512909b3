//! Engine adapter
//!
//! Translates an internal track into the external engine's single-item load
//! format. The engine never sees queue entries, only payloads.

use crate::error::{PlayerError, Result};
use ripple_core::{EnginePayload, Track, TrackOrigin};
use std::collections::HashMap;

/// Translate a resolved track into an engine payload.
///
/// Requires a resolved audio descriptor; local tracks without one fall back
/// to their file path.
///
/// # Errors
/// Fails when no playable URL can be determined for the track.
pub fn to_engine_payload(track: &Track) -> Result<EnginePayload> {
    let (url, headers) = match (&track.audio, &track.origin) {
        (Some(audio), _) => (audio.url.clone(), audio.headers.clone()),
        (None, TrackOrigin::Local { path }) => {
            let path = path.to_str().ok_or_else(|| PlayerError::Conversion {
                key: track.key.clone(),
                reason: "local path is not valid UTF-8".to_string(),
            })?;
            (format!("file://{path}"), HashMap::new())
        }
        (None, TrackOrigin::Remote) => {
            return Err(PlayerError::Conversion {
                key: track.key.clone(),
                reason: "remote track has no resolved stream".to_string(),
            });
        }
    };

    Ok(EnginePayload {
        url,
        title: track.title.clone(),
        artist: track.artist.clone(),
        artwork_url: track.cover_url.clone(),
        duration_ms: track.duration_ms,
        headers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_core::{AudioDescriptor, AudioQuality, TrackKey, TransportKind};

    #[test]
    fn unresolved_remote_track_fails() {
        let track = Track::remote(TrackKey::new("BV1"));
        let err = to_engine_payload(&track).unwrap_err();
        assert!(matches!(err, PlayerError::Conversion { .. }));
    }

    #[test]
    fn resolved_track_carries_headers_through() {
        let mut track = Track::remote(TrackKey::new("BV1"));
        track.title = "Title".to_string();
        track.artist = "Artist".to_string();
        track.duration_ms = Some(183_000);
        track.audio = Some(
            AudioDescriptor::new(
                "https://cdn/audio.m4s",
                AudioQuality::High,
                TransportKind::Dash,
            )
            .with_headers(HashMap::from([(
                "Referer".to_string(),
                "https://platform.example".to_string(),
            )])),
        );

        let payload = to_engine_payload(&track).unwrap();
        assert_eq!(payload.url, "https://cdn/audio.m4s");
        assert_eq!(payload.title, "Title");
        assert_eq!(payload.duration_ms, Some(183_000));
        assert_eq!(
            payload.headers.get("Referer").map(String::as_str),
            Some("https://platform.example")
        );
    }

    #[test]
    fn local_track_plays_from_file_path() {
        let track = Track::local("Song", "Artist", "/music/song.m4a");
        let payload = to_engine_payload(&track).unwrap();
        assert_eq!(payload.url, "file:///music/song.m4a");
        assert!(payload.headers.is_empty());
    }
}
