/// Track domain type
use crate::types::TrackKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Where a track's audio comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrackOrigin {
    /// Streamed from the remote platform
    Remote,

    /// Downloaded file on local storage
    Local {
        /// Path to the audio file
        path: PathBuf,
    },
}

/// Audio quality tier, ordered worst to best
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AudioQuality {
    /// Data-saver tier
    Low,
    /// Default streaming tier
    #[default]
    Standard,
    /// High bitrate
    High,
    /// Lossless, where the platform offers it
    Lossless,
}

/// Transport used to deliver the audio resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Segmented DASH audio stream
    Dash,
    /// Single progressive HTTP stream
    Progressive,
    /// Local file path
    LocalFile,
}

/// Resolved playable audio resource.
///
/// Remote stream URLs are short-lived; a descriptor is fresh while its age is
/// inside the TTL window and must be re-resolved afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioDescriptor {
    /// Playable resource URL (or local file URL)
    pub url: String,

    /// Quality tier the platform actually served
    pub quality: AudioQuality,

    /// How the resource is delivered
    pub transport: TransportKind,

    /// Request headers the platform requires on the stream URL
    pub headers: HashMap<String, String>,

    /// When this descriptor was resolved
    pub resolved_at: DateTime<Utc>,
}

impl AudioDescriptor {
    /// Create a descriptor resolved now
    pub fn new(url: impl Into<String>, quality: AudioQuality, transport: TransportKind) -> Self {
        Self {
            url: url.into(),
            quality,
            transport,
            headers: HashMap::new(),
            resolved_at: Utc::now(),
        }
    }

    /// Attach transport headers required by the source
    #[must_use]
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Whether the descriptor is still inside its validity window
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        Utc::now()
            .signed_duration_since(self.resolved_at)
            .to_std()
            .map_or(true, |age| age < ttl)
    }
}

/// One playable unit: a whole remote item, one part of a multi-part item,
/// or a local file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Identity key, unique within a queue
    pub key: TrackKey,

    /// Track title
    pub title: String,

    /// Artist display name
    pub artist: String,

    /// Cover image URL
    pub cover_url: Option<String>,

    /// Track duration in milliseconds
    pub duration_ms: Option<u64>,

    /// Where the audio comes from
    pub origin: TrackOrigin,

    /// False until descriptive fields are confirmed from the remote source
    pub has_metadata: bool,

    /// Part id reported by metadata, used for stream resolution when the
    /// key itself carries none (single-part items still need it)
    pub default_part: Option<String>,

    /// Resolved audio resource, present once streamed
    pub audio: Option<AudioDescriptor>,
}

impl Track {
    /// Create a remote track known only by its key, metadata pending
    pub fn remote(key: TrackKey) -> Self {
        Self {
            key,
            title: String::new(),
            artist: String::new(),
            cover_url: None,
            duration_ms: None,
            origin: TrackOrigin::Remote,
            has_metadata: false,
            default_part: None,
            audio: None,
        }
    }

    /// Create a track for a downloaded local file.
    ///
    /// Local tracks never need metadata resolution and their audio never
    /// expires.
    pub fn local(
        title: impl Into<String>,
        artist: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            key: TrackKey::local(),
            title: title.into(),
            artist: artist.into(),
            cover_url: None,
            duration_ms: None,
            origin: TrackOrigin::Local { path: path.into() },
            has_metadata: true,
            default_part: None,
            audio: None,
        }
    }

    /// Whether this track plays from local storage
    pub fn is_local(&self) -> bool {
        matches!(self.origin, TrackOrigin::Local { .. })
    }

    /// Get the track duration as a Duration
    pub fn duration(&self) -> Option<Duration> {
        self.duration_ms.map(Duration::from_millis)
    }

    /// Set the track duration from a Duration
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_ms = Some(duration.as_millis() as u64);
    }

    /// Whether the audio descriptor can be played without re-resolution.
    ///
    /// Local tracks are always fresh; remote tracks are fresh while their
    /// descriptor is inside the TTL window.
    pub fn audio_is_fresh(&self, ttl: Duration) -> bool {
        match self.origin {
            TrackOrigin::Local { .. } => true,
            TrackOrigin::Remote => self.audio.as_ref().is_some_and(|a| a.is_fresh(ttl)),
        }
    }

    /// The part id to resolve streams with: the key's own part, else the
    /// part reported by metadata
    pub fn stream_part(&self) -> Option<&str> {
        self.key.part().or(self.default_part.as_deref())
    }

    /// Merge freshly fetched metadata into the track and mark it confirmed
    pub fn apply_metadata(&mut self, meta: TrackMetadata) {
        self.title = meta.title;
        self.artist = meta.artist;
        self.cover_url = meta.cover_url;
        if meta.duration_ms.is_some() {
            self.duration_ms = meta.duration_ms;
        }
        if self.default_part.is_none() {
            self.default_part = meta.part;
        }
        self.has_metadata = true;
    }
}

/// Descriptive metadata fetched from the remote platform
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackMetadata {
    /// Track title
    pub title: String,

    /// Artist display name
    pub artist: String,

    /// Cover image URL
    pub cover_url: Option<String>,

    /// Duration in milliseconds
    pub duration_ms: Option<u64>,

    /// Part id for stream resolution, when the platform reports one
    pub part: Option<String>,
}
