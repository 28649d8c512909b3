/// Core error types for Ripple Player
use thiserror::Error;

/// Result type alias using `SourceError`
pub type Result<T> = std::result::Result<T, SourceError>;

/// Failures reported by the metadata, stream, and history collaborators.
///
/// Retry and backoff policy is the collaborator's own concern; the playback
/// core only classifies what came back.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Entity not found on the platform
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind (e.g. "item", "part")
        entity: String,
        /// Platform id that was looked up
        id: String,
    },

    /// Network-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// The resource exists but cannot be served (region lock, takedown, paywall)
    #[error("Resource unavailable: {0}")]
    Unavailable(String),

    /// The platform answered with something we could not interpret
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl SourceError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Failures reported by the external playback engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine has not been set up yet
    #[error("Playback engine not initialized")]
    NotReady,

    /// The engine rejected the item it was asked to load
    #[error("Failed to load item: {0}")]
    LoadFailed(String),

    /// A runtime playback failure with the engine's native error code
    #[error("Playback error {code}: {message}")]
    Playback {
        /// Engine-native error code
        code: i32,
        /// Engine-provided description
        message: String,
    },

    /// Other errors
    #[error("{0}")]
    Other(String),
}
