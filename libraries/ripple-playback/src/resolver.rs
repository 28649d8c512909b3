//! On-demand track resolution
//!
//! Fills in missing descriptive metadata and refreshes stale audio
//! descriptors by calling the platform collaborators. Works on an owned copy
//! of the track and never touches the queue; the caller decides what to do
//! with the result.

use crate::error::{PlayerError, Result};
use chrono::Utc;
use ripple_core::{AudioQuality, MetadataSource, StreamSource, Track};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Outcome of resolving one track
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The track with metadata and audio filled in
    pub track: Track,

    /// Whether descriptive metadata was fetched during this resolution
    pub metadata_fetched: bool,

    /// Whether the audio descriptor was fetched or refreshed
    pub audio_refreshed: bool,
}

/// Resolves tracks' metadata and playable audio on demand
#[derive(Clone)]
pub struct TrackResolver {
    metadata: Arc<dyn MetadataSource>,
    stream: Arc<dyn StreamSource>,
    audio_ttl: Duration,
    quality: AudioQuality,
}

impl TrackResolver {
    /// Create a resolver over the given collaborators
    pub fn new(
        metadata: Arc<dyn MetadataSource>,
        stream: Arc<dyn StreamSource>,
        audio_ttl: Duration,
        quality: AudioQuality,
    ) -> Self {
        Self {
            metadata,
            stream,
            audio_ttl,
            quality,
        }
    }

    /// Fetch and merge descriptive metadata if the track has none yet.
    ///
    /// Local tracks never need metadata resolution. Returns whether a fetch
    /// happened.
    pub async fn ensure_metadata(&self, track: &mut Track) -> Result<bool> {
        if track.has_metadata || track.is_local() {
            return Ok(false);
        }

        let meta = self
            .metadata
            .fetch_metadata(track.key.primary())
            .await
            .map_err(|source| PlayerError::MetadataFetch {
                key: track.key.clone(),
                source,
            })?;
        track.apply_metadata(meta);
        debug!(key = %track.key, title = %track.title, "fetched track metadata");
        Ok(true)
    }

    /// Fetch a fresh audio descriptor if the current one is stale or absent.
    ///
    /// Local tracks never expire. Returns whether a fetch happened.
    pub async fn ensure_audio(&self, track: &mut Track) -> Result<bool> {
        if track.audio_is_fresh(self.audio_ttl) {
            return Ok(false);
        }

        let mut descriptor = self
            .stream
            .fetch_audio(track.key.primary(), track.stream_part(), self.quality)
            .await
            .map_err(|source| PlayerError::StreamResolution {
                key: track.key.clone(),
                source,
            })?;
        // Stamp the resolution time here so freshness does not depend on
        // what the collaborator put in the descriptor
        descriptor.resolved_at = Utc::now();
        debug!(key = %track.key, quality = ?descriptor.quality, "resolved audio stream");
        track.audio = Some(descriptor);
        Ok(true)
    }

    /// Ensure the track has confirmed metadata and a fresh audio descriptor.
    ///
    /// Metadata failures short-circuit: no stream fetch is attempted for a
    /// track we could not even describe.
    pub async fn resolve(&self, track: &Track) -> Result<Resolution> {
        let mut track = track.clone();
        let metadata_fetched = self.ensure_metadata(&mut track).await?;
        let audio_refreshed = self.ensure_audio(&mut track).await?;
        Ok(Resolution {
            track,
            metadata_fetched,
            audio_refreshed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeMetadata, FakeStream};
    use ripple_core::{AudioDescriptor, TrackKey, TransportKind};

    fn resolver(metadata: Arc<FakeMetadata>, stream: Arc<FakeStream>) -> TrackResolver {
        TrackResolver::new(
            metadata,
            stream,
            Duration::from_secs(3600),
            AudioQuality::Standard,
        )
    }

    #[tokio::test]
    async fn resolves_metadata_and_audio_for_new_remote_track() {
        let metadata = Arc::new(FakeMetadata::default());
        let stream = Arc::new(FakeStream::default());
        let resolver = resolver(metadata.clone(), stream.clone());

        let track = Track::remote(TrackKey::new("BV1"));
        let resolution = resolver.resolve(&track).await.unwrap();

        assert!(resolution.metadata_fetched);
        assert!(resolution.audio_refreshed);
        assert!(resolution.track.has_metadata);
        assert!(resolution.track.audio.is_some());
        assert_eq!(metadata.calls(), 1);
        assert_eq!(stream.calls(), 1);
    }

    #[tokio::test]
    async fn fresh_audio_is_not_refetched() {
        let metadata = Arc::new(FakeMetadata::default());
        let stream = Arc::new(FakeStream::default());
        let resolver = resolver(metadata.clone(), stream.clone());

        let track = Track::remote(TrackKey::new("BV1"));
        let first = resolver.resolve(&track).await.unwrap();
        let second = resolver.resolve(&first.track).await.unwrap();

        assert!(!second.metadata_fetched);
        assert!(!second.audio_refreshed);
        assert_eq!(stream.calls(), 1);
    }

    #[tokio::test]
    async fn stale_audio_is_refreshed() {
        let metadata = Arc::new(FakeMetadata::default());
        let stream = Arc::new(FakeStream::default());
        let resolver = resolver(metadata, stream.clone());

        let mut track = Track::remote(TrackKey::new("BV1"));
        track.has_metadata = true;
        let mut stale = AudioDescriptor::new(
            "https://cdn/old.m4s",
            AudioQuality::Standard,
            TransportKind::Dash,
        );
        stale.resolved_at = Utc::now() - chrono::Duration::hours(2);
        track.audio = Some(stale);

        let resolution = resolver.resolve(&track).await.unwrap();

        assert!(resolution.audio_refreshed);
        assert_ne!(resolution.track.audio.unwrap().url, "https://cdn/old.m4s");
    }

    #[tokio::test]
    async fn local_tracks_skip_both_fetches() {
        let metadata = Arc::new(FakeMetadata::default());
        let stream = Arc::new(FakeStream::default());
        let resolver = resolver(metadata.clone(), stream.clone());

        let track = Track::local("Song", "Artist", "/music/song.m4a");
        let resolution = resolver.resolve(&track).await.unwrap();

        assert!(!resolution.metadata_fetched);
        assert!(!resolution.audio_refreshed);
        assert_eq!(metadata.calls(), 0);
        assert_eq!(stream.calls(), 0);
    }

    #[tokio::test]
    async fn metadata_failure_short_circuits() {
        let metadata = Arc::new(FakeMetadata::failing());
        let stream = Arc::new(FakeStream::default());
        let resolver = resolver(metadata, stream.clone());

        let track = Track::remote(TrackKey::new("BV1"));
        let err = resolver.resolve(&track).await.unwrap_err();

        assert!(matches!(err, PlayerError::MetadataFetch { .. }));
        assert_eq!(stream.calls(), 0);
    }

    #[tokio::test]
    async fn stream_failure_is_classified() {
        let metadata = Arc::new(FakeMetadata::default());
        let stream = Arc::new(FakeStream::failing());
        let resolver = resolver(metadata, stream);

        let track = Track::remote(TrackKey::new("BV1"));
        let err = resolver.resolve(&track).await.unwrap_err();

        assert!(matches!(err, PlayerError::StreamResolution { .. }));
    }

    #[tokio::test]
    async fn stream_fetch_uses_part_from_metadata() {
        let metadata = Arc::new(FakeMetadata::with_part("p7"));
        let stream = Arc::new(FakeStream::default());
        let resolver = resolver(metadata, stream.clone());

        let track = Track::remote(TrackKey::new("BV1"));
        resolver.resolve(&track).await.unwrap();

        assert_eq!(stream.last_part(), Some("p7".to_string()));
    }
}
