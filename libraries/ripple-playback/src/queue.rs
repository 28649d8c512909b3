//! Ordered/shuffled queue aggregate
//!
//! Owns the canonical insertion-ordered queue, the optional shuffled
//! permutation, and the current-track index into whichever of the two is
//! driving playback. All splicing goes through identity-key lookups so the
//! two queues can never disagree about which entry is which.

use crate::shuffle;
use ripple_core::{Track, TrackKey};

/// Which of the parallel queues an identity went missing from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QueueSide {
    Ordered,
    Shuffled,
}

impl QueueSide {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Ordered => "ordered",
            Self::Shuffled => "shuffled",
        }
    }
}

/// The play queue.
///
/// `ordered` is the canonical queue in insertion order. `shuffled` is a
/// permutation of it, present only while shuffle is on. The current track is
/// derived from the active queue and the index, so it can never go stale.
#[derive(Debug, Clone, Default)]
pub struct TrackQueue {
    /// Canonical queue in insertion order
    ordered: Vec<Track>,

    /// Shuffled permutation of `ordered`; empty while shuffle is off
    shuffled: Vec<Track>,

    /// Whether the shuffled queue is driving playback
    shuffle_on: bool,

    /// Index of the current track in the active queue
    current_index: Option<usize>,
}

impl TrackQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// The queue currently driving playback order
    pub fn active(&self) -> &[Track] {
        if self.shuffle_on {
            &self.shuffled
        } else {
            &self.ordered
        }
    }

    /// The canonical insertion-ordered queue
    pub fn ordered(&self) -> &[Track] {
        &self.ordered
    }

    /// The current track, derived from the active queue
    pub fn current(&self) -> Option<&Track> {
        self.current_index.and_then(|i| self.active().get(i))
    }

    /// Index of the current track in the active queue
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Point the current index at a new position in the active queue.
    ///
    /// Out-of-bounds positions clear the index rather than dangle.
    pub fn set_current_index(&mut self, index: Option<usize>) {
        self.current_index = index.filter(|&i| i < self.active().len());
    }

    /// Number of queued tracks
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Whether shuffle mode is on
    pub fn shuffle_on(&self) -> bool {
        self.shuffle_on
    }

    /// Whether an identity is already queued
    pub fn contains(&self, key: &TrackKey) -> bool {
        self.ordered.iter().any(|t| &t.key == key)
    }

    /// Position of an identity in the active queue
    pub fn position_in_active(&self, key: &TrackKey) -> Option<usize> {
        self.active().iter().position(|t| &t.key == key)
    }

    /// Resolve a `start_from` preference against the active queue: first the
    /// exact part id, then any track of the same platform item.
    pub fn find_start_index(&self, start_from: &TrackKey) -> Option<usize> {
        if let Some(part) = start_from.part() {
            if let Some(index) = self.active().iter().position(|t| t.key.matches_part(part)) {
                return Some(index);
            }
        }
        self.active()
            .iter()
            .position(|t| t.key.matches_primary(start_from.primary()))
    }

    /// Insert tracks, skipping identities that are already queued.
    ///
    /// Default insertion point is the end of the queue; with `play_next` the
    /// tracks land right after the current track. When shuffle is on the
    /// same rule is mirrored into the shuffled queue.
    ///
    /// Returns the identities that were actually inserted, in order.
    pub fn insert(&mut self, tracks: Vec<Track>, play_next: bool) -> Vec<TrackKey> {
        let mut fresh: Vec<Track> = Vec::new();
        for track in tracks {
            if !self.contains(&track.key) && !fresh.iter().any(|t| t.key == track.key) {
                fresh.push(track);
            }
        }
        if fresh.is_empty() {
            return Vec::new();
        }
        let keys: Vec<TrackKey> = fresh.iter().map(|t| t.key.clone()).collect();

        let ordered_at = if play_next {
            self.current_ordered_position()
                .map_or(self.ordered.len(), |p| p + 1)
        } else {
            self.ordered.len()
        };
        if self.shuffle_on {
            let shuffled_at = if play_next {
                self.current_index
                    .map_or(self.shuffled.len(), |i| (i + 1).min(self.shuffled.len()))
            } else {
                self.shuffled.len()
            };
            self.shuffled
                .splice(shuffled_at..shuffled_at, fresh.iter().cloned());
        }
        self.ordered.splice(ordered_at..ordered_at, fresh);

        keys
    }

    /// Replace the entry with the same identity in both queues.
    ///
    /// This is the single splice-by-identity path used by metadata updates,
    /// post-resolution commits, and preload results. Positions and the
    /// current index are never touched.
    ///
    /// Returns whether any entry matched.
    pub fn update_by_key(&mut self, track: &Track) -> bool {
        let mut matched = false;
        if let Some(position) = self.ordered.iter().position(|t| t.key == track.key) {
            self.ordered[position] = track.clone();
            matched = true;
        }
        if let Some(position) = self.shuffled.iter().position(|t| t.key == track.key) {
            self.shuffled[position] = track.clone();
            matched = true;
        }
        matched
    }

    /// Remove an identity from both queues, keeping the current index
    /// pointing at the same track.
    ///
    /// The caller is expected to have moved the current index off the entry
    /// first. A missing identity means the queues already disagree; the
    /// error names the side that lost it.
    pub(crate) fn remove_by_key(&mut self, key: &TrackKey) -> Result<(), QueueSide> {
        let ordered_at = self
            .ordered
            .iter()
            .position(|t| &t.key == key)
            .ok_or(QueueSide::Ordered)?;

        // Empty shuffled queue is valid (shuffle never used / turned off)
        let shuffled_at = if self.shuffled.is_empty() {
            None
        } else {
            Some(
                self.shuffled
                    .iter()
                    .position(|t| &t.key == key)
                    .ok_or(QueueSide::Shuffled)?,
            )
        };

        let active_at = if self.shuffle_on {
            shuffled_at
        } else {
            Some(ordered_at)
        };

        self.ordered.remove(ordered_at);
        if let Some(position) = shuffled_at {
            self.shuffled.remove(position);
        }

        if let (Some(current), Some(removed)) = (self.current_index, active_at) {
            if removed < current {
                self.current_index = Some(current - 1);
            } else if removed == current {
                // Caller should have switched away; don't leave a dangling index
                self.current_index = None;
            }
        }
        // Guard against the index outliving the queue tail
        self.set_current_index(self.current_index);

        Ok(())
    }

    /// Build the shuffled permutation and make it active, pinning the
    /// current track to its front.
    pub fn enable_shuffle(&mut self) {
        let current_key = self.current().map(|t| t.key.clone());

        self.shuffled = self.ordered.clone();
        shuffle::shuffle_tracks(&mut self.shuffled);

        if let Some(key) = current_key {
            shuffle::pin_to_front(&mut self.shuffled, &key);
            self.current_index = Some(0);
        }
        self.shuffle_on = true;
    }

    /// Discard the shuffled permutation and return to insertion order,
    /// relocating the current track.
    pub fn disable_shuffle(&mut self) {
        let current_key = self.current().map(|t| t.key.clone());

        self.shuffle_on = false;
        self.shuffled.clear();

        self.current_index =
            current_key.and_then(|key| self.ordered.iter().position(|t| t.key == key));
    }

    /// Reset to the initial empty state
    pub fn clear(&mut self) {
        self.ordered.clear();
        self.shuffled.clear();
        self.shuffle_on = false;
        self.current_index = None;
    }

    /// Position of the current track in the ordered queue
    fn current_ordered_position(&self) -> Option<usize> {
        if self.shuffle_on {
            let key = &self.current()?.key;
            self.ordered.iter().position(|t| &t.key == key)
        } else {
            self.current_index
        }
    }
}
