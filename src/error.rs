//! Error taxonomy for the mix pipeline.
//!
//! Every failure mode maps to a distinct, user-reportable condition. All of
//! them are fatal to the single mix request: either a complete, correctly
//! durationed output file is produced, or none is.

use std::path::PathBuf;
use thiserror::Error;

/// Library-wide result alias.
pub type MixResult<T> = Result<T, MixError>;

/// Errors produced while assembling and mixing a BGM bed.
#[derive(Debug, Error)]
pub enum MixError {
    /// A file path does not reference a readable media file.
    ///
    /// Probing failures abort the whole pipeline immediately; a missing file
    /// is a configuration error, not a transient condition, so there is no
    /// retry and no partial output.
    #[error("cannot probe '{}': {reason}", .path.display())]
    Probe { path: PathBuf, reason: String },

    /// The track pool ran dry before the accumulated BGM duration reached
    /// the target. The pool is too small or the target too large.
    #[error(
        "track pool exhausted after {selected} track(s): \
         accumulated {accumulated:.1}s of {target:.1}s target"
    )]
    InsufficientTracks {
        target: f64,
        accumulated: f64,
        selected: usize,
    },

    /// Mix parameters are mutually inconsistent, e.g. a fade longer than the
    /// main track. Caught before any graph construction.
    #[error("invalid mix parameters: {0}")]
    InvalidSpec(String),

    /// The playlist daemon call itself failed (daemon down, unknown
    /// playlist, mpc missing).
    #[error("playlist '{name}' could not be read: {reason}")]
    Playlist { name: String, reason: String },

    /// The external mixing back-end exited with failure. Reported as-is,
    /// never retried, no degraded fallback.
    #[error("mix back-end failed: {0}")]
    Execution(String),
}
