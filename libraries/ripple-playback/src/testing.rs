//! Hand-rolled collaborator fakes for unit tests
//!
//! The fakes record every call so tests can assert on the exact command
//! sequence the core sent to its collaborators.

use async_trait::async_trait;
use ripple_core::{
    AudioDescriptor, AudioQuality, EngineError, EnginePayload, HistoryReporter, MetadataSource,
    PlaybackEngine, PlaybackProgress, SourceError, StreamSource, Track, TrackKey, TrackMetadata,
    TransportKind,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Metadata collaborator fake
#[derive(Default)]
pub(crate) struct FakeMetadata {
    fail_all: bool,
    fail_for: Option<String>,
    part: Option<String>,
    calls: AtomicUsize,
}

impl FakeMetadata {
    /// Fail every fetch
    pub(crate) fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    /// Fail fetches for one specific item only
    pub(crate) fn failing_for(primary: &str) -> Self {
        Self {
            fail_for: Some(primary.to_string()),
            ..Self::default()
        }
    }

    /// Report the given part id in every metadata response
    pub(crate) fn with_part(part: &str) -> Self {
        Self {
            part: Some(part.to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataSource for FakeMetadata {
    async fn fetch_metadata(&self, primary: &str) -> Result<TrackMetadata, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_all || self.fail_for.as_deref() == Some(primary) {
            return Err(SourceError::network("metadata endpoint unreachable"));
        }
        Ok(TrackMetadata {
            title: format!("Title {primary}"),
            artist: "Fake Artist".to_string(),
            cover_url: Some(format!("https://cdn.example/{primary}/cover.jpg")),
            duration_ms: Some(183_000),
            part: self.part.clone(),
        })
    }
}

/// Stream collaborator fake; every successful fetch yields a new URL so
/// tests can observe refreshes
#[derive(Default)]
pub(crate) struct FakeStream {
    fail_all: bool,
    counter: AtomicUsize,
    last_part: Mutex<Option<String>>,
}

impl FakeStream {
    /// Fail every fetch
    pub(crate) fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.counter.load(Ordering::SeqCst)
    }

    pub(crate) fn last_part(&self) -> Option<String> {
        self.last_part.lock().unwrap().clone()
    }
}

#[async_trait]
impl StreamSource for FakeStream {
    async fn fetch_audio(
        &self,
        primary: &str,
        part: Option<&str>,
        quality: AudioQuality,
    ) -> Result<AudioDescriptor, SourceError> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        *self.last_part.lock().unwrap() = part.map(ToString::to_string);
        if self.fail_all {
            return Err(SourceError::unavailable("stream endpoint gone"));
        }
        Ok(AudioDescriptor::new(
            format!("https://cdn.example/{primary}/{n}.m4s"),
            quality,
            TransportKind::Dash,
        ))
    }
}

/// Single-slot engine fake that records every command
#[derive(Default)]
pub(crate) struct FakeEngine {
    commands: Mutex<Vec<String>>,
    loaded: Mutex<Option<EnginePayload>>,
    position: Mutex<Duration>,
}

impl FakeEngine {
    fn push(&self, command: impl Into<String>) {
        self.commands.lock().unwrap().push(command.into());
    }

    pub(crate) fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    pub(crate) fn loaded_url(&self) -> Option<String> {
        self.loaded.lock().unwrap().as_ref().map(|p| p.url.clone())
    }

    pub(crate) fn set_position(&self, position: Duration) {
        *self.position.lock().unwrap() = position;
    }
}

#[async_trait]
impl PlaybackEngine for FakeEngine {
    async fn load(&self, payload: EnginePayload) -> Result<(), EngineError> {
        self.push(format!("load {}", payload.url));
        *self.loaded.lock().unwrap() = Some(payload);
        Ok(())
    }

    async fn play(&self) -> Result<(), EngineError> {
        self.push("play");
        Ok(())
    }

    async fn pause(&self) -> Result<(), EngineError> {
        self.push("pause");
        Ok(())
    }

    async fn stop(&self) -> Result<(), EngineError> {
        self.push("stop");
        *self.loaded.lock().unwrap() = None;
        *self.position.lock().unwrap() = Duration::ZERO;
        Ok(())
    }

    async fn seek_to(&self, position: Duration) -> Result<(), EngineError> {
        self.push(format!("seek {}", position.as_secs()));
        *self.position.lock().unwrap() = position;
        Ok(())
    }

    async fn progress(&self) -> Result<PlaybackProgress, EngineError> {
        let position = *self.position.lock().unwrap();
        Ok(PlaybackProgress {
            position,
            duration: Duration::from_secs(183),
            buffered: position,
        })
    }

    async fn active_payload(&self) -> Option<EnginePayload> {
        self.loaded.lock().unwrap().clone()
    }

    async fn set_native_repeat(&self, enabled: bool) -> Result<(), EngineError> {
        self.push(format!("native_repeat {enabled}"));
        Ok(())
    }
}

/// History collaborator fake
#[derive(Default)]
pub(crate) struct FakeHistory {
    reports: Mutex<Vec<TrackKey>>,
}

impl FakeHistory {
    pub(crate) fn reported(&self) -> Vec<TrackKey> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoryReporter for FakeHistory {
    async fn report(&self, key: &TrackKey) -> Result<(), SourceError> {
        self.reports.lock().unwrap().push(key.clone());
        Ok(())
    }
}

/// A remote track whose metadata is already confirmed, so switching to it
/// only needs a stream fetch
pub(crate) fn titled_track(id: &str) -> Track {
    let mut track = Track::remote(TrackKey::new(id));
    track.apply_metadata(TrackMetadata {
        title: format!("Track {id}"),
        artist: "Fake Artist".to_string(),
        cover_url: None,
        duration_ms: Some(183_000),
        part: None,
    });
    track
}
