//! Domain types for Ripple Player

mod engine;
mod ids;
mod playback;
mod track;

pub use engine::{EngineEvent, EnginePayload, EngineState, PlaybackProgress};
pub use ids::TrackKey;
pub use playback::RepeatMode;
pub use track::{AudioDescriptor, AudioQuality, Track, TrackMetadata, TrackOrigin, TransportKind};
