//! Track identity and the consumable candidate pool.
//!
//! A [`Track`] pairs the identifier a playlist hands out (a path relative to
//! the music collection) with its resolved absolute location on disk. The
//! [`TrackPool`] holds the shuffled candidates and is consumed destructively
//! from the end by the selector, so each track is used at most once.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A single BGM candidate: the playlist's string handle plus its resolved
/// filesystem path. Duration is not stored here; it is probed lazily when
/// the selector actually consumes the track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Track {
    /// Identifier as reported by the playlist source, e.g.
    /// `artist/album/01 song.flac`.
    pub id: String,
    /// Absolute path under the configured track root.
    pub path: PathBuf,
}

impl Track {
    /// Resolve a playlist identifier against the track root directory.
    ///
    /// This is a pure path join with no I/O; whether the file exists is the
    /// prober's business.
    pub fn resolve(id: &str, root: &Path) -> Self {
        Self {
            id: id.to_string(),
            path: root.join(id),
        }
    }
}

/// An ordered pool of candidate tracks, consumed from the end.
///
/// The order *after* shuffling is the consumption order: [`TrackPool::pop`]
/// removes the last element first. The pool itself never shuffles on its
/// own; the caller decides the ordering (seeded or not), which keeps
/// selection deterministic and testable.
#[derive(Debug, Default)]
pub struct TrackPool {
    tracks: Vec<Track>,
}

impl TrackPool {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Build a pool by resolving playlist identifiers against `root`,
    /// preserving the given order.
    pub fn resolve(ids: &[String], root: &Path) -> Self {
        Self {
            tracks: ids.iter().map(|id| Track::resolve(id, root)).collect(),
        }
    }

    /// Uniformly permute the pool with the caller's RNG.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.tracks.shuffle(rng);
    }

    /// Remove and return the next track in consumption order.
    pub fn pop(&mut self) -> Option<Track> {
        self.tracks.pop()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
