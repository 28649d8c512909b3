/// Collaborator contracts for the playback core
///
/// The playback core reaches everything outside itself through these narrow
/// traits: the remote platform's metadata and stream endpoints, the external
/// single-slot playback engine, and the play-history endpoint. Concrete
/// implementations (HTTP clients, the mobile engine bridge) live in the
/// platform shells.
use crate::error::{EngineError, SourceError};
use crate::types::{
    AudioDescriptor, AudioQuality, EnginePayload, PlaybackProgress, TrackKey, TrackMetadata,
};
use async_trait::async_trait;
use std::time::Duration;

/// Fetches descriptive metadata for a platform item
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetch title, artist, cover, and duration for an item by platform id.
    ///
    /// # Errors
    /// Returns an error if the item does not exist or the platform call fails
    async fn fetch_metadata(&self, primary: &str) -> Result<TrackMetadata, SourceError>;
}

/// Resolves playable audio resources for a platform item
#[async_trait]
pub trait StreamSource: Send + Sync {
    /// Resolve a fresh audio descriptor for an item, honoring the quality
    /// preference as far as the platform allows.
    ///
    /// # Errors
    /// Returns an error if no playable stream can be resolved
    async fn fetch_audio(
        &self,
        primary: &str,
        part: Option<&str>,
        quality: AudioQuality,
    ) -> Result<AudioDescriptor, SourceError>;
}

/// The external "one track at a time" playback engine.
///
/// The engine holds exactly one loaded item; `load` replaces it. All queue
/// and repeat semantics live in the playback core, which drives this engine
/// through a consistent load/play/pause/seek sequence.
#[async_trait]
pub trait PlaybackEngine: Send + Sync {
    /// Replace the engine's single load slot with the given item
    async fn load(&self, payload: EnginePayload) -> Result<(), EngineError>;

    /// Start or resume playback of the loaded item
    async fn play(&self) -> Result<(), EngineError>;

    /// Pause playback
    async fn pause(&self) -> Result<(), EngineError>;

    /// Stop playback and clear the load slot
    async fn stop(&self) -> Result<(), EngineError>;

    /// Seek within the loaded item
    async fn seek_to(&self, position: Duration) -> Result<(), EngineError>;

    /// Current position, duration, and buffer state
    async fn progress(&self) -> Result<PlaybackProgress, EngineError>;

    /// The payload currently occupying the load slot, if any
    async fn active_payload(&self) -> Option<EnginePayload>;

    /// Toggle the engine's own repeat behavior.
    ///
    /// The playback core owns all repeat semantics and forces this off so
    /// that "playback ended" events always reach it.
    async fn set_native_repeat(&self, enabled: bool) -> Result<(), EngineError>;
}

/// Records playbacks in the user's remote play history
#[async_trait]
pub trait HistoryReporter: Send + Sync {
    /// Report one playback. Called fire-and-forget; failures are logged by
    /// the caller and never surfaced.
    ///
    /// # Errors
    /// Returns an error if the platform call fails
    async fn report(&self, key: &TrackKey) -> Result<(), SourceError>;
}
