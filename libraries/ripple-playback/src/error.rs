//! Error types for the playback core

use ripple_core::{EngineError, SourceError, TrackKey};
use thiserror::Error;

/// Playback core errors
#[derive(Debug, Error)]
pub enum PlayerError {
    /// An operation was attempted before the engine was initialized
    #[error("Playback engine is not ready")]
    EngineNotReady,

    /// Metadata could not be fetched for a track
    #[error("Failed to fetch metadata for {key}: {source}")]
    MetadataFetch {
        /// Identity of the failing track
        key: TrackKey,
        /// Underlying collaborator failure
        source: SourceError,
    },

    /// No playable stream could be resolved for a track
    #[error("Failed to resolve stream for {key}: {source}")]
    StreamResolution {
        /// Identity of the failing track
        key: TrackKey,
        /// Underlying collaborator failure
        source: SourceError,
    },

    /// A resolved track could not be translated into an engine payload
    #[error("Cannot convert {key} into an engine item: {reason}")]
    Conversion {
        /// Identity of the failing track
        key: TrackKey,
        /// Why translation failed
        reason: String,
    },

    /// An identity key expected in a queue was missing during removal.
    /// This indicates a prior invariant violation; the queue is reset.
    #[error("Queue entry {key} missing from the {queue} queue")]
    QueueDesync {
        /// Identity that should have been present
        key: TrackKey,
        /// Which queue lost it
        queue: &'static str,
    },

    /// Programmer error in operation parameters
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Engine call failure
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlayerError>;
