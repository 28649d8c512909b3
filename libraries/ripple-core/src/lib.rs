//! Ripple Player Core
//!
//! Platform-agnostic core types, collaborator contracts, and error handling
//! for Ripple Player.
//!
//! This crate provides the foundational building blocks shared by the
//! playback core and the platform shells (mobile, desktop).
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackKey`, `AudioDescriptor`, `EnginePayload`
//! - **Collaborator Contracts**: `MetadataSource`, `StreamSource`,
//!   `PlaybackEngine`, `HistoryReporter`
//! - **Error Handling**: `SourceError` and `EngineError`
//!
//! # Example
//!
//! ```rust
//! use ripple_core::types::{Track, TrackKey};
//!
//! // A remote track known only by its platform id, metadata still pending
//! let track = Track::remote(TrackKey::new("BV1xx411c7mD"));
//! assert!(!track.has_metadata);
//!
//! // A local download, playable as-is
//! let local = Track::local("My Song", "Some Artist", "/music/song.m4a");
//! assert!(local.is_local());
//! ```

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{EngineError, Result, SourceError};
pub use traits::{HistoryReporter, MetadataSource, PlaybackEngine, StreamSource};

pub use types::{
    AudioDescriptor, AudioQuality, EngineEvent, EnginePayload, EngineState, PlaybackProgress,
    RepeatMode, Track, TrackKey, TrackMetadata, TrackOrigin, TransportKind,
};
