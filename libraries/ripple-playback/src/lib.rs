//! Ripple Player - Playback Core
//!
//! The playback queue orchestration core for Ripple Player.
//!
//! This crate provides:
//! - Ordered/shuffled play queue with identity-key deduplication
//! - On-demand resolution of track metadata and stream URLs (TTL-refreshed)
//! - A player manager driving an external single-slot playback engine
//! - Repeat modes (off, track, queue) owned by the core, never the engine
//! - Background preloading of upcoming tracks
//! - An event bridge feeding engine events back into the queue
//!
//! # Architecture
//!
//! `ripple-playback` never performs I/O itself: the remote platform, the
//! playback engine, and the history endpoint are reached through the trait
//! contracts in `ripple-core`. The manager owns all mutable state behind one
//! async lock, so every mutating operation holds exclusive access for its
//! whole duration; reads can happen at any time.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ripple_playback::{run_event_bridge, AddToQueue, PlayerConfig, PlayerManager};
//!
//! // Platform shells provide the collaborators
//! let player = PlayerManager::new(
//!     PlayerConfig::default(),
//!     engine.clone(),
//!     Arc::new(platform_client.clone()),
//!     Arc::new(platform_client),
//!     Some(history),
//! );
//! player.initialize().await?;
//!
//! // Wire the engine's event stream back into the core
//! tokio::spawn(run_event_bridge(player.clone(), engine_events));
//!
//! // Drive it from the UI
//! player.add_to_queue(AddToQueue::play_now(search_results)).await?;
//! player.toggle_play().await?;
//! player.skip_to_next().await?;
//! ```

mod adapter;
mod error;
mod events;
mod manager;
mod preload;
mod queue;
mod resolver;
mod shuffle;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// Public exports
pub use adapter::to_engine_payload;
pub use error::{PlayerError, Result};
pub use events::{run_event_bridge, PlaybackEvent};
pub use manager::PlayerManager;
pub use queue::TrackQueue;
pub use resolver::{Resolution, TrackResolver};
pub use types::{AddToQueue, PlaybackSnapshot, PlayerConfig};
