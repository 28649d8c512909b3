/// Types exchanged with the external playback engine
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// The minimal payload the engine needs to load exactly one item.
///
/// The engine holds a single load slot; loading a new payload replaces
/// whatever was loaded before.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnginePayload {
    /// Playable resource URL
    pub url: String,

    /// Track title for the system media session
    pub title: String,

    /// Artist display name for the system media session
    pub artist: String,

    /// Artwork URL for the system media session
    pub artwork_url: Option<String>,

    /// Duration in milliseconds, when known
    pub duration_ms: Option<u64>,

    /// Transport headers required by the source
    pub headers: HashMap<String, String>,
}

/// Playback progress reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaybackProgress {
    /// Current position in the loaded item
    pub position: Duration,

    /// Total duration of the loaded item
    pub duration: Duration,

    /// How far ahead of the position the engine has buffered
    pub buffered: Duration,
}

/// Engine-reported playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// Nothing loaded
    Idle,
    /// Loaded item is buffering
    Buffering,
    /// Loaded and ready to play
    Ready,
    /// Playing
    Playing,
    /// Paused mid-item
    Paused,
    /// Stopped, load slot cleared
    Stopped,
}

impl EngineState {
    /// Whether audio is audibly progressing
    pub fn is_playing(self) -> bool {
        self == Self::Playing
    }

    /// Whether the engine is still preparing the loaded item
    pub fn is_buffering(self) -> bool {
        self == Self::Buffering
    }
}

/// Events emitted by the external playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// Engine playback state changed
    StateChanged(EngineState),

    /// The single loaded item reached its natural end
    PlaybackEnded,

    /// A runtime playback failure
    PlaybackError {
        /// Engine-native error code
        code: i32,
        /// Engine-provided description
        message: String,
    },
}
