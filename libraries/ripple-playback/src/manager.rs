//! Player manager - the queue orchestration core
//!
//! Owns the play queue, the current-track pointer, and every player
//! operation, and is the single writer of the external engine's one load
//! slot. All mutable state sits behind one async lock, so a mutating
//! operation holds exclusive access for its whole duration; overlapping
//! calls serialize instead of interleaving.

use std::sync::Arc;
use std::time::Duration;

use ripple_core::{
    EngineError, EngineState, HistoryReporter, MetadataSource, PlaybackEngine, PlaybackProgress,
    RepeatMode, StreamSource, Track, TrackKey,
};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::adapter::to_engine_payload;
use crate::error::{PlayerError, Result};
use crate::events::PlaybackEvent;
use crate::preload;
use crate::queue::TrackQueue;
use crate::resolver::TrackResolver;
use crate::types::{AddToQueue, PlaybackSnapshot, PlayerConfig};

/// Mutable player state, guarded by the manager's lock
#[derive(Debug, Default)]
struct PlayerState {
    queue: TrackQueue,
    repeat: RepeatMode,
    playing: bool,
    buffering: bool,
    engine_ready: bool,
    pending_events: Vec<PlaybackEvent>,
}

struct PlayerInner {
    engine: Arc<dyn PlaybackEngine>,
    resolver: TrackResolver,
    history: Option<Arc<dyn HistoryReporter>>,
    config: PlayerConfig,
    state: Mutex<PlayerState>,
}

/// The playback queue orchestration core.
///
/// Cloning is cheap and yields another handle onto the same player; the
/// event bridge and the preloader run on clones.
///
/// # Example
///
/// ```rust,ignore
/// use ripple_playback::{AddToQueue, PlayerConfig, PlayerManager};
///
/// let player = PlayerManager::new(PlayerConfig::default(), engine, metadata, stream, history);
/// player.initialize().await?;
///
/// player.add_to_queue(AddToQueue::play_now(tracks)).await?;
/// player.toggle_play().await?;
/// player.skip_to_next().await?;
/// ```
#[derive(Clone)]
pub struct PlayerManager {
    inner: Arc<PlayerInner>,
}

impl PlayerManager {
    /// Create a player over the given collaborators.
    ///
    /// Pass `None` for `history` when the platform offers no play-history
    /// endpoint; the `report_history` config flag gates reporting at runtime.
    pub fn new(
        config: PlayerConfig,
        engine: Arc<dyn PlaybackEngine>,
        metadata: Arc<dyn MetadataSource>,
        stream: Arc<dyn StreamSource>,
        history: Option<Arc<dyn HistoryReporter>>,
    ) -> Self {
        let resolver = TrackResolver::new(
            metadata,
            stream,
            config.audio_ttl,
            config.preferred_quality,
        );
        Self {
            inner: Arc::new(PlayerInner {
                engine,
                resolver,
                history,
                config,
                state: Mutex::new(PlayerState::default()),
            }),
        }
    }

    /// Mark the engine ready for operations.
    ///
    /// The engine's native repeat is forced off here: the event bridge owns
    /// all repeat semantics and needs every "playback ended" event.
    pub async fn initialize(&self) -> Result<()> {
        self.inner.engine.set_native_repeat(false).await?;
        let mut state = self.lock().await;
        state.engine_ready = true;
        info!("playback core initialized");
        Ok(())
    }

    // ===== Queue Operations =====

    /// Insert tracks into the queue, optionally starting playback.
    ///
    /// Tracks whose identity is already queued are skipped. `play_next`
    /// inserts right after the current track; `play_now` additionally picks a
    /// starting track (the `start_from` part-id match, else its primary-id
    /// match, else the first newly inserted track, else the queue head) and
    /// switches to it.
    pub async fn add_to_queue(&self, params: AddToQueue) -> Result<()> {
        let mut state = self.lock().await;
        Self::ensure_ready(&state)?;

        if params.play_now && params.play_next {
            return Err(PlayerError::InvalidOperation(
                "play_now and play_next are mutually exclusive".to_string(),
            ));
        }

        if params.clear_queue {
            self.clear_queue_locked(&mut state).await?;
        }

        let had_current = state.queue.current_index().is_some();
        let inserted = state.queue.insert(params.tracks, params.play_next);
        if !inserted.is_empty() {
            let length = state.queue.len();
            Self::emit(&mut state, PlaybackEvent::QueueChanged { length });
        }

        if params.play_now {
            if state.queue.is_empty() {
                return Ok(());
            }
            let target =
                Self::resolve_play_target(&state.queue, params.start_from.as_ref(), &inserted);
            state.queue.set_current_index(Some(target));
            return self.skip_to_track_locked(&mut state, target).await;
        }

        if !had_current && !state.queue.is_empty() {
            // First tracks in an idle queue become current without playing
            state.queue.set_current_index(Some(0));
        }
        Ok(())
    }

    /// Switch playback to the track at `index` in the active queue.
    ///
    /// Out-of-bounds indices are ignored. Resolution or conversion failures
    /// pause playback, surface a `PlaybackFailed` event naming the track,
    /// and leave the queue otherwise unchanged.
    pub async fn skip_to_track(&self, index: usize) -> Result<()> {
        let mut state = self.lock().await;
        Self::ensure_ready(&state)?;
        self.skip_to_track_locked(&mut state, index).await
    }

    /// Remove a track from the queue by identity.
    ///
    /// Removing the current track switches to a neighbor first (previous for
    /// the tail entry, next otherwise); removing the only track clears the
    /// queue and stops the engine. A key missing from either queue means the
    /// queues already disagree: the whole player is defensively reset.
    pub async fn remove_track(&self, key: &TrackKey) -> Result<()> {
        let mut state = self.lock().await;
        Self::ensure_ready(&state)?;

        let is_current = state.queue.current().is_some_and(|t| &t.key == key);
        if is_current {
            if state.queue.len() <= 1 {
                return self.clear_queue_locked(&mut state).await;
            }
            let index = state.queue.current_index().unwrap_or(0);
            let last = state.queue.active().len() - 1;
            // Switch away before splicing so the engine is never left
            // pointing at a track about to disappear
            let neighbor = if index >= last { index - 1 } else { index + 1 };
            self.skip_to_track_locked(&mut state, neighbor).await?;
        }

        match state.queue.remove_by_key(key) {
            Ok(()) => {
                let length = state.queue.len();
                Self::emit(&mut state, PlaybackEvent::QueueChanged { length });
                Ok(())
            }
            Err(side) => {
                let err = PlayerError::QueueDesync {
                    key: key.clone(),
                    queue: side.as_str(),
                };
                warn!(key = %key, queue = side.as_str(), "queue desync during removal; resetting");
                Self::emit(
                    &mut state,
                    PlaybackEvent::QueueReset {
                        reason: err.to_string(),
                    },
                );
                self.clear_queue_locked(&mut state).await?;
                Err(err)
            }
        }
    }

    /// Stop the engine and reset the queue to its initial empty state
    pub async fn clear_queue(&self) -> Result<()> {
        let mut state = self.lock().await;
        Self::ensure_ready(&state)?;
        self.clear_queue_locked(&mut state).await
    }

    // ===== Playback Control =====

    /// Toggle between playing and paused.
    ///
    /// Resuming re-checks the stream URL: a stale one is refreshed in place,
    /// and when the URL actually changed the engine is reloaded and seeked
    /// back to where it was, so the user never notices the swap.
    pub async fn toggle_play(&self) -> Result<()> {
        let mut state = self.lock().await;
        Self::ensure_ready(&state)?;

        let Some(index) = state.queue.current_index() else {
            return Ok(());
        };
        let Some(current) = state.queue.current().cloned() else {
            return Ok(());
        };

        // The engine can lose its load slot (service restart); recover by
        // re-issuing the switch, which also resumes playback
        if self.inner.engine.active_payload().await.is_none() {
            return self.skip_to_track_locked(&mut state, index).await;
        }

        if state.playing {
            self.inner.engine.pause().await?;
            Self::set_playing(&mut state, false);
            return Ok(());
        }

        if !current.audio_is_fresh(self.inner.config.audio_ttl) {
            self.refresh_current_audio(&mut state, current).await?;
        }

        self.inner.engine.play().await?;
        Self::set_playing(&mut state, true);
        Ok(())
    }

    /// Advance to the next track.
    ///
    /// With queue repeat the index wraps; otherwise running off the end (or
    /// having nothing to advance to) pauses playback and stays put.
    pub async fn skip_to_next(&self) -> Result<()> {
        let mut state = self.lock().await;
        Self::ensure_ready(&state)?;

        let len = state.queue.active().len();
        if len <= 1 {
            self.inner.engine.pause().await?;
            Self::set_playing(&mut state, false);
            return Ok(());
        }

        let current = state.queue.current_index().unwrap_or(0);
        let next = if state.repeat == RepeatMode::Queue {
            (current + 1) % len
        } else if current + 1 >= len {
            self.inner.engine.pause().await?;
            Self::set_playing(&mut state, false);
            return Ok(());
        } else {
            current + 1
        };
        self.skip_to_track_locked(&mut state, next).await
    }

    /// Go back to the previous track. Wraps unconditionally: the head of the
    /// queue goes to the tail, whatever the repeat mode.
    pub async fn skip_to_previous(&self) -> Result<()> {
        let mut state = self.lock().await;
        Self::ensure_ready(&state)?;

        let len = state.queue.active().len();
        if len <= 1 {
            return Ok(());
        }
        let Some(current) = state.queue.current_index() else {
            return Ok(());
        };
        let previous = if current == 0 { len - 1 } else { current - 1 };
        self.skip_to_track_locked(&mut state, previous).await
    }

    /// Seek within the current track
    pub async fn seek_to(&self, position: Duration) -> Result<()> {
        let state = self.lock().await;
        Self::ensure_ready(&state)?;
        drop(state);
        self.inner.engine.seek_to(position).await?;
        Ok(())
    }

    // ===== Shuffle & Repeat =====

    /// Toggle shuffle mode; returns the new state.
    ///
    /// Turning shuffle on pins the current track to the front of the
    /// shuffled queue; turning it off relocates the current track in the
    /// ordered queue.
    pub async fn toggle_shuffle(&self) -> Result<bool> {
        let mut state = self.lock().await;
        Self::ensure_ready(&state)?;

        let enabled = if state.queue.shuffle_on() {
            state.queue.disable_shuffle();
            false
        } else {
            state.queue.enable_shuffle();
            true
        };
        debug!(enabled, "shuffle toggled");
        let length = state.queue.len();
        Self::emit(&mut state, PlaybackEvent::QueueChanged { length });
        Ok(enabled)
    }

    /// Cycle the repeat mode off → track → queue → off; returns the new mode.
    pub async fn toggle_repeat(&self) -> Result<RepeatMode> {
        let mut state = self.lock().await;
        Self::ensure_ready(&state)?;

        state.repeat = state.repeat.next();
        // Repeat semantics live here; the engine's native repeat stays off
        // so every "playback ended" event reaches the bridge
        self.inner.engine.set_native_repeat(false).await?;
        debug!(mode = %state.repeat, "repeat toggled");
        Ok(state.repeat)
    }

    // ===== Observers =====

    /// The current track, if any
    pub async fn current_track(&self) -> Option<Track> {
        self.lock().await.queue.current().cloned()
    }

    /// The queue in its active (playback) order
    pub async fn queue_tracks(&self) -> Vec<Track> {
        self.lock().await.queue.active().to_vec()
    }

    /// The queue in insertion order, regardless of shuffle
    pub async fn ordered_tracks(&self) -> Vec<Track> {
        self.lock().await.queue.ordered().to_vec()
    }

    /// A consistent snapshot of the player for UI rendering
    pub async fn snapshot(&self) -> PlaybackSnapshot {
        let state = self.lock().await;
        PlaybackSnapshot {
            current: state.queue.current().cloned(),
            current_index: state.queue.current_index(),
            queue_length: state.queue.len(),
            playing: state.playing,
            buffering: state.buffering,
            repeat: state.repeat,
            shuffle: state.queue.shuffle_on(),
        }
    }

    /// Whether audio is currently playing
    pub async fn is_playing(&self) -> bool {
        self.lock().await.playing
    }

    /// The current repeat mode
    pub async fn repeat_mode(&self) -> RepeatMode {
        self.lock().await.repeat
    }

    /// Whether shuffle mode is on
    pub async fn shuffle_enabled(&self) -> bool {
        self.lock().await.queue.shuffle_on()
    }

    /// Position, duration, and buffer state of the loaded item
    pub async fn progress(&self) -> Result<PlaybackProgress> {
        let state = self.lock().await;
        Self::ensure_ready(&state)?;
        drop(state);
        Ok(self.inner.engine.progress().await?)
    }

    /// Drain all events emitted since the last drain.
    ///
    /// The UI should call this after operations (or on a timer) to stay in
    /// sync with playback state.
    pub async fn drain_events(&self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.lock().await.pending_events)
    }

    // ===== Engine feedback (called by the event bridge) =====

    /// Mirror an engine state change into the playing/buffering flags
    pub(crate) async fn sync_engine_state(&self, engine_state: EngineState) {
        let mut state = self.lock().await;
        Self::set_playing(&mut state, engine_state.is_playing());
        Self::set_buffering(&mut state, engine_state.is_buffering());
    }

    /// React to the loaded item reaching its natural end
    pub(crate) async fn handle_playback_ended(&self) -> Result<()> {
        let repeat = {
            let state = self.lock().await;
            Self::ensure_ready(&state)?;
            state.repeat
        };

        if repeat == RepeatMode::Track {
            // Replay the same loaded item; the queue does not move
            self.inner.engine.seek_to(Duration::ZERO).await?;
            self.inner.engine.play().await?;
            Ok(())
        } else {
            self.skip_to_next().await
        }
    }

    /// React to a runtime playback failure reported by the engine
    pub(crate) async fn handle_playback_error(&self, code: i32, message: String) {
        let mut state = self.lock().await;
        let key = state.queue.current().map(|t| t.key.clone());
        let err = PlayerError::Engine(EngineError::Playback { code, message });
        self.fail_playback(&mut state, key, &err).await;
    }

    // ===== Internals =====

    async fn lock(&self) -> MutexGuard<'_, PlayerState> {
        self.inner.state.lock().await
    }

    fn ensure_ready(state: &PlayerState) -> Result<()> {
        if state.engine_ready {
            Ok(())
        } else {
            Err(PlayerError::EngineNotReady)
        }
    }

    fn emit(state: &mut PlayerState, event: PlaybackEvent) {
        state.pending_events.push(event);
    }

    fn set_playing(state: &mut PlayerState, playing: bool) {
        if state.playing != playing {
            state.playing = playing;
            Self::emit(state, PlaybackEvent::StateChanged { playing });
        }
    }

    fn set_buffering(state: &mut PlayerState, buffering: bool) {
        if state.buffering != buffering {
            state.buffering = buffering;
            Self::emit(state, PlaybackEvent::BufferingChanged { buffering });
        }
    }

    /// Where `play_now` starts: the `start_from` part-id match, else its
    /// primary-id match, else the first newly inserted track, else the head
    /// of the queue (pure duplicate adds)
    fn resolve_play_target(
        queue: &TrackQueue,
        start_from: Option<&TrackKey>,
        inserted: &[TrackKey],
    ) -> usize {
        if let Some(key) = start_from {
            if let Some(index) = queue.find_start_index(key) {
                return index;
            }
        }
        inserted
            .first()
            .and_then(|key| queue.position_in_active(key))
            .unwrap_or(0)
    }

    async fn skip_to_track_locked(&self, state: &mut PlayerState, index: usize) -> Result<()> {
        let Some(target) = state.queue.active().get(index).cloned() else {
            debug!(index, "skip target out of bounds; ignoring");
            return Ok(());
        };

        let previous = state.queue.current().map(|t| t.key.clone());

        // Optimistic switch: a track whose metadata is already confirmed is
        // shown as current immediately, while resolution still runs
        let mut announced = false;
        if target.has_metadata {
            state.queue.set_current_index(Some(index));
            Self::set_buffering(state, true);
            Self::emit(
                state,
                PlaybackEvent::TrackChanged {
                    key: target.key.clone(),
                    previous: previous.clone(),
                },
            );
            announced = true;
        }

        let mut working = target;

        match self.inner.resolver.ensure_metadata(&mut working).await {
            Ok(true) => {
                // Splice the enriched entry back right away so the queue
                // shows title/cover before the stream fetch completes
                state.queue.update_by_key(&working);
            }
            Ok(false) => {}
            Err(err) => {
                self.fail_playback(state, Some(working.key.clone()), &err)
                    .await;
                return Err(err);
            }
        }

        if let Err(err) = self.inner.resolver.ensure_audio(&mut working).await {
            self.fail_playback(state, Some(working.key.clone()), &err)
                .await;
            return Err(err);
        }

        let payload = match to_engine_payload(&working) {
            Ok(payload) => payload,
            Err(err) => {
                self.fail_playback(state, Some(working.key.clone()), &err)
                    .await;
                return Err(err);
            }
        };

        if let Err(err) = self.inner.engine.load(payload).await {
            let err = PlayerError::Engine(err);
            self.fail_playback(state, Some(working.key.clone()), &err)
                .await;
            return Err(err);
        }

        // Reporting is fire-and-forget: a failed report is logged, never
        // surfaced, and never blocks the switch
        if self.inner.config.report_history {
            if let Some(reporter) = &self.inner.history {
                Self::report_history_detached(Arc::clone(reporter), working.key.clone());
            }
        }

        state.queue.update_by_key(&working);
        state.queue.set_current_index(Some(index));

        self.inner.engine.play().await?;
        Self::set_playing(state, true);
        Self::set_buffering(state, false);
        if !announced {
            Self::emit(
                state,
                PlaybackEvent::TrackChanged {
                    key: working.key.clone(),
                    previous,
                },
            );
        }

        // Warm the next few tracks in the background; resolution only, the
        // engine slot stays untouched
        let upcoming = preload::upcoming_slice(
            state.queue.active(),
            index,
            self.inner.config.preload_count,
        );
        if !upcoming.is_empty() {
            self.spawn_preload(upcoming);
        }

        Ok(())
    }

    /// Refresh a stale stream URL in place, preserving the playback position
    /// across the reload
    async fn refresh_current_audio(&self, state: &mut PlayerState, current: Track) -> Result<()> {
        let previous_url = current.audio.as_ref().map(|a| a.url.clone());
        let mut working = current;

        if let Err(err) = self.inner.resolver.ensure_metadata(&mut working).await {
            self.fail_playback(state, Some(working.key.clone()), &err)
                .await;
            return Err(err);
        }
        if let Err(err) = self.inner.resolver.ensure_audio(&mut working).await {
            self.fail_playback(state, Some(working.key.clone()), &err)
                .await;
            return Err(err);
        }

        state.queue.update_by_key(&working);

        let refreshed_url = working.audio.as_ref().map(|a| a.url.clone());
        if refreshed_url == previous_url {
            return Ok(());
        }

        debug!(key = %working.key, "stream URL rotated; reloading at captured position");
        let position = self
            .inner
            .engine
            .progress()
            .await
            .map(|p| p.position)
            .unwrap_or_default();
        let payload = match to_engine_payload(&working) {
            Ok(payload) => payload,
            Err(err) => {
                self.fail_playback(state, Some(working.key.clone()), &err)
                    .await;
                return Err(err);
            }
        };
        self.inner.engine.load(payload).await?;
        self.inner.engine.seek_to(position).await?;
        Ok(())
    }

    async fn clear_queue_locked(&self, state: &mut PlayerState) -> Result<()> {
        self.inner.engine.stop().await?;
        state.queue.clear();
        Self::set_playing(state, false);
        Self::set_buffering(state, false);
        Self::emit(state, PlaybackEvent::QueueChanged { length: 0 });
        Ok(())
    }

    /// Pause and surface a failure without touching queue contents
    async fn fail_playback(
        &self,
        state: &mut PlayerState,
        key: Option<TrackKey>,
        err: &PlayerError,
    ) {
        warn!(error = %err, "playback operation failed; pausing");
        if let Err(pause_err) = self.inner.engine.pause().await {
            warn!(error = %pause_err, "engine pause after failure also failed");
        }
        Self::set_playing(state, false);
        Self::set_buffering(state, false);
        Self::emit(
            state,
            PlaybackEvent::PlaybackFailed {
                key,
                message: err.to_string(),
            },
        );
    }

    fn report_history_detached(reporter: Arc<dyn HistoryReporter>, key: TrackKey) {
        tokio::spawn(async move {
            if let Err(err) = reporter.report(&key).await {
                warn!(key = %key, error = %err, "history report failed");
            }
        });
    }

    fn spawn_preload(&self, upcoming: Vec<Track>) {
        let manager = self.clone();
        tokio::spawn(async move {
            let resolved = preload::resolve_upcoming(&manager.inner.resolver, upcoming).await;
            if resolved.is_empty() {
                return;
            }
            let mut state = manager.lock().await;
            for track in resolved {
                state.queue.update_by_key(&track);
            }
        });
    }
}
