//! Playback events and the engine event bridge
//!
//! Two event streams meet here: `PlaybackEvent` flows out of the core toward
//! the UI, and `EngineEvent` flows from the external engine back into the
//! core. The bridge owns the feedback loop, most importantly deciding what a
//! natural end of the loaded item means under the current repeat mode.

use crate::manager::PlayerManager;
use ripple_core::{EngineEvent, TrackKey};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Events emitted by the playback core for UI synchronization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// The playing flag changed
    StateChanged {
        /// Whether audio is playing now
        playing: bool,
    },

    /// The buffering flag changed
    BufferingChanged {
        /// Whether the current track is resolving/buffering
        buffering: bool,
    },

    /// The current track changed
    TrackChanged {
        /// Identity of the new current track
        key: TrackKey,
        /// Identity of the previous current track, if any
        previous: Option<TrackKey>,
    },

    /// Queue contents changed (tracks added, removed, or reordered)
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// A track switch or refresh failed; playback was paused
    PlaybackFailed {
        /// Identity of the failing track, when known
        key: Option<TrackKey>,
        /// Human-readable failure description
        message: String,
    },

    /// The queue was defensively reset after an inconsistency.
    /// The UI should treat this as "the player had to recover".
    QueueReset {
        /// Why the reset happened
        reason: String,
    },
}

/// Feed engine events back into the player until the channel closes.
///
/// Spawn one bridge per engine connection:
///
/// ```rust,ignore
/// let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
/// tokio::spawn(run_event_bridge(player.clone(), receiver));
/// ```
///
/// The engine's "playback ended" is interpreted here, never by the engine
/// itself: with track repeat the same item replays from zero, otherwise the
/// queue advances.
pub async fn run_event_bridge(
    player: PlayerManager,
    mut events: mpsc::UnboundedReceiver<EngineEvent>,
) {
    while let Some(event) = events.recv().await {
        match event {
            EngineEvent::StateChanged(engine_state) => {
                player.sync_engine_state(engine_state).await;
            }
            EngineEvent::PlaybackEnded => {
                if let Err(err) = player.handle_playback_ended().await {
                    warn!(error = %err, "failed to advance after natural end");
                }
            }
            EngineEvent::PlaybackError { code, message } => {
                player.handle_playback_error(code, message).await;
            }
        }
    }
    debug!("engine event channel closed; bridge exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{titled_track, FakeEngine, FakeMetadata, FakeStream};
    use crate::types::{AddToQueue, PlayerConfig};
    use ripple_core::{EngineState, Track};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::sleep;

    struct Bridged {
        player: PlayerManager,
        engine: Arc<FakeEngine>,
        sender: mpsc::UnboundedSender<EngineEvent>,
    }

    async fn bridged_player(tracks: Vec<Track>) -> Bridged {
        let engine = Arc::new(FakeEngine::default());
        let player = PlayerManager::new(
            PlayerConfig::default(),
            engine.clone(),
            Arc::new(FakeMetadata::default()),
            Arc::new(FakeStream::default()),
            None,
        );
        player.initialize().await.unwrap();
        player
            .add_to_queue(AddToQueue::play_now(tracks))
            .await
            .unwrap();

        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(run_event_bridge(player.clone(), receiver));

        Bridged {
            player,
            engine,
            sender,
        }
    }

    fn tracks(ids: &[&str]) -> Vec<Track> {
        ids.iter().map(|id| titled_track(id)).collect()
    }

    #[tokio::test]
    async fn natural_end_advances_the_queue() {
        let bridged = bridged_player(tracks(&["a", "b"])).await;

        bridged.sender.send(EngineEvent::PlaybackEnded).unwrap();
        sleep(Duration::from_millis(50)).await;

        let snapshot = bridged.player.snapshot().await;
        assert_eq!(snapshot.current_index, Some(1));
        assert!(snapshot.playing);
    }

    #[tokio::test]
    async fn natural_end_with_track_repeat_replays_in_place() {
        let bridged = bridged_player(tracks(&["a", "b"])).await;
        bridged.player.toggle_repeat().await.unwrap(); // off -> track

        bridged.sender.send(EngineEvent::PlaybackEnded).unwrap();
        sleep(Duration::from_millis(50)).await;

        let snapshot = bridged.player.snapshot().await;
        assert_eq!(snapshot.current_index, Some(0));

        let commands = bridged.engine.commands();
        assert!(commands.contains(&"seek 0".to_string()));
        // Exactly one load: the replay reuses the loaded item
        assert_eq!(commands.iter().filter(|c| c.starts_with("load")).count(), 1);
    }

    #[tokio::test]
    async fn natural_end_at_queue_tail_stops() {
        let bridged = bridged_player(tracks(&["a", "b"])).await;
        bridged.player.skip_to_track(1).await.unwrap();

        bridged.sender.send(EngineEvent::PlaybackEnded).unwrap();
        sleep(Duration::from_millis(50)).await;

        let snapshot = bridged.player.snapshot().await;
        assert_eq!(snapshot.current_index, Some(1));
        assert!(!snapshot.playing);
    }

    #[tokio::test]
    async fn engine_state_changes_sync_the_flags() {
        let bridged = bridged_player(tracks(&["a"])).await;
        assert!(bridged.player.is_playing().await);

        bridged
            .sender
            .send(EngineEvent::StateChanged(EngineState::Paused))
            .unwrap();
        sleep(Duration::from_millis(50)).await;
        assert!(!bridged.player.is_playing().await);

        bridged
            .sender
            .send(EngineEvent::StateChanged(EngineState::Playing))
            .unwrap();
        sleep(Duration::from_millis(50)).await;
        assert!(bridged.player.is_playing().await);
    }

    #[tokio::test]
    async fn engine_errors_pause_and_surface() {
        let bridged = bridged_player(tracks(&["a"])).await;
        bridged.player.drain_events().await;

        bridged
            .sender
            .send(EngineEvent::PlaybackError {
                code: -1004,
                message: "connection lost".to_string(),
            })
            .unwrap();
        sleep(Duration::from_millis(50)).await;

        assert!(!bridged.player.is_playing().await);
        let events = bridged.player.drain_events().await;
        assert!(events.iter().any(|e| matches!(
            e,
            PlaybackEvent::PlaybackFailed { key: Some(_), .. }
        )));
    }
}
