/// Playback mode types
use serde::{Deserialize, Serialize};

/// Repeat mode, owned entirely by the playback core.
///
/// The external engine's native repeat feature is never used, so that
/// "playback ended" events can be interpreted uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when the queue ends
    #[default]
    Off,
    /// Loop the current track
    Track,
    /// Loop the entire queue
    Queue,
}

impl RepeatMode {
    /// The next mode in the off → track → queue cycle
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Off => Self::Track,
            Self::Track => Self::Queue,
            Self::Queue => Self::Off,
        }
    }

    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Track => "track",
            Self::Queue => "queue",
        }
    }
}

impl std::fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
