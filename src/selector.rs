//! Greedy track selection: cover the main track's duration with candidates.
//!
//! The selector consumes a pre-shuffled [`TrackPool`] from the end, probing
//! each candidate's duration as it goes, until the accumulated BGM length
//! reaches the target. It stops at the first track that crosses the
//! threshold, so the bed is always at least as long as the main track and
//! typically slightly longer; trimming to exact length is the composer's
//! job, not the selector's.
//!
//! The selector performs no randomization of its own. Given a fixed pool
//! order it is fully deterministic, which keeps it testable without any
//! random-seed control leaking into its interface.

use crate::error::{MixError, MixResult};
use crate::probe::DurationProber;
use crate::track::{Track, TrackPool};
use log::info;
use serde::Serialize;

/// The ordered outcome of selection: chosen tracks plus their summed
/// duration. On success `total_duration >= target`, each track appears at
/// most once, and the selection is never empty for a positive target.
#[derive(Debug, Clone, Serialize)]
pub struct Selection {
    pub tracks: Vec<Track>,
    pub total_duration: f64,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Pop tracks off the pool until their cumulative duration reaches
/// `target_duration`.
///
/// The pool is taken by value and exhausted as far as needed; tracks left
/// unconsumed are dropped with it. Probe failures propagate unchanged: a
/// missing file is a configuration error, not something to retry around.
///
/// # Errors
///
/// - [`MixError::InvalidSpec`] if `target_duration` is negative or not
///   finite (checked precondition, never a panic).
/// - [`MixError::Probe`] if any consumed candidate cannot be probed.
/// - [`MixError::InsufficientTracks`] if the pool runs dry before the
///   target is reached.
pub fn select(
    mut pool: TrackPool,
    target_duration: f64,
    prober: &dyn DurationProber,
) -> MixResult<Selection> {
    if !target_duration.is_finite() || target_duration < 0.0 {
        return Err(MixError::InvalidSpec(format!(
            "target duration must be a non-negative number of seconds, got {target_duration}"
        )));
    }

    let mut tracks: Vec<Track> = Vec::new();
    let mut accumulated = 0.0_f64;

    while accumulated < target_duration {
        let Some(track) = pool.pop() else {
            return Err(MixError::InsufficientTracks {
                target: target_duration,
                accumulated,
                selected: tracks.len(),
            });
        };

        let duration = prober.duration(&track.path)?;
        info!("BGM: {} ({duration:.1}s)", track.id);
        accumulated += duration;
        tracks.push(track);
    }

    Ok(Selection {
        tracks,
        total_duration: accumulated,
    })
}
