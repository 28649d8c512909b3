//! Background preloading of upcoming tracks
//!
//! After every track switch the manager resolves the next few tracks so
//! their stream URLs are warm before they are needed. Preloading only
//! resolves; it never loads anything into the engine and never moves the
//! current index.

use crate::resolver::TrackResolver;
use futures::future::join_all;
use ripple_core::Track;
use tracing::{debug, warn};

/// The slice of the active queue strictly after `index`, bounded to `width`
pub(crate) fn upcoming_slice(tracks: &[Track], index: usize, width: usize) -> Vec<Track> {
    tracks.iter().skip(index + 1).take(width).cloned().collect()
}

/// Resolve the given upcoming tracks concurrently.
///
/// Individual failures are logged and swallowed; preloading is purely an
/// optimization and the failing track will be resolved again when it is
/// actually switched to.
pub(crate) async fn resolve_upcoming(resolver: &TrackResolver, tracks: Vec<Track>) -> Vec<Track> {
    let resolutions = tracks.iter().map(|track| {
        let resolver = resolver.clone();
        async move {
            match resolver.resolve(track).await {
                Ok(resolution) => Some(resolution.track),
                Err(err) => {
                    warn!(key = %track.key, error = %err, "preload resolution failed");
                    None
                }
            }
        }
    });

    let resolved: Vec<Track> = join_all(resolutions).await.into_iter().flatten().collect();
    debug!(count = resolved.len(), "preload resolved upcoming tracks");
    resolved
}
