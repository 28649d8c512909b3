//! Configuration and parameter types for the playback core

use ripple_core::{AudioQuality, RepeatMode, Track, TrackKey};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the player manager
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// How many upcoming tracks to resolve ahead after each switch
    pub preload_count: usize,

    /// Validity window for resolved remote stream URLs
    pub audio_ttl: Duration,

    /// Preferred audio quality for stream resolution
    pub preferred_quality: AudioQuality,

    /// Whether playbacks are reported to the platform play history
    pub report_history: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            preload_count: 3,
            audio_ttl: Duration::from_secs(90 * 60),
            preferred_quality: AudioQuality::Standard,
            report_history: true,
        }
    }
}

/// Parameters for `PlayerManager::add_to_queue`.
///
/// `play_now` and `play_next` are mutually exclusive; requesting both is a
/// programmer error and rejects the whole call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddToQueue {
    /// Tracks to insert; entries whose identity is already queued are skipped
    pub tracks: Vec<Track>,

    /// Start playing immediately after inserting
    pub play_now: bool,

    /// Clear the queue (and stop the engine) before inserting
    pub clear_queue: bool,

    /// Insert right after the current track instead of at the end
    pub play_next: bool,

    /// Preferred starting track when `play_now` is set
    pub start_from: Option<TrackKey>,
}

impl AddToQueue {
    /// Append tracks to the end of the queue without starting playback
    pub fn append(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            ..Self::default()
        }
    }

    /// Insert tracks and start playing immediately
    pub fn play_now(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            play_now: true,
            ..Self::default()
        }
    }

    /// Insert tracks right after the current one
    pub fn play_next(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            play_next: true,
            ..Self::default()
        }
    }

    /// Prefer starting playback from the given identity
    #[must_use]
    pub fn starting_from(mut self, key: TrackKey) -> Self {
        self.start_from = Some(key);
        self
    }

    /// Clear the existing queue before inserting
    #[must_use]
    pub fn clearing_first(mut self) -> Self {
        self.clear_queue = true;
        self
    }
}

/// Read-only snapshot of the player for UI observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    /// The current track, if any
    pub current: Option<Track>,

    /// Index of the current track in the active queue
    pub current_index: Option<usize>,

    /// Number of queued tracks
    pub queue_length: usize,

    /// Whether audio is playing
    pub playing: bool,

    /// Whether the current track is still buffering/resolving
    pub buffering: bool,

    /// Repeat mode
    pub repeat: RepeatMode,

    /// Whether shuffle mode is on
    pub shuffle: bool,
}
