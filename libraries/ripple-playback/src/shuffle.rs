//! Shuffle helpers for queue randomization

use rand::seq::SliceRandom;
use rand::thread_rng;
use ripple_core::{Track, TrackKey};

/// Fisher–Yates shuffle of the track list
pub fn shuffle_tracks(tracks: &mut [Track]) {
    let mut rng = thread_rng();
    tracks.shuffle(&mut rng);
}

/// Force-swap the entry with the given identity to position 0.
///
/// Used when shuffle is enabled so the current track stays current at the
/// front of the shuffled queue. No-op when the key is absent.
pub fn pin_to_front(tracks: &mut [Track], key: &TrackKey) {
    if let Some(position) = tracks.iter().position(|t| &t.key == key) {
        tracks.swap(0, position);
    }
}
