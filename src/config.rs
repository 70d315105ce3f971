//! Resolved configuration values for one mix request.
//!
//! Everything the core consumes arrives here fully resolved: playlist name,
//! track root, volume, fade length, variant flag. How those values were
//! parsed (flags, environment variables) is the CLI's business; nothing in
//! the library reads ambient state.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Playlist consulted when none is given.
pub const DEFAULT_PLAYLIST: &str = "best";
/// Default weight applied to the BGM channels in the downmix.
pub const DEFAULT_BGM_VOLUME: f64 = 0.5;
/// Default fade in/out length in seconds.
pub const DEFAULT_FADE_DURATION: f64 = 10.0;
/// Default VBR quality handed to the encoder's `-q:a`.
pub const DEFAULT_QUALITY: u32 = 3;

/// The track root used when neither flag nor environment supplies one:
/// `~/media/music`, matching where the playlist daemon conventionally keeps
/// the collection.
pub fn default_track_root() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| anyhow!("could not determine home directory for the default track root"))?;
    Ok(home.join("media").join("music"))
}

/// Fully resolved parameters of one mix request, threaded by value into the
/// pipeline. No module-level defaults, no ambient state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MixConfig {
    /// Playlist to draw BGM candidates from.
    pub playlist: String,
    /// Directory the playlist's track identifiers are relative to.
    pub track_root: PathBuf,
    /// Weight for the BGM channels, 0-1 by contract.
    pub bgm_volume: f64,
    /// Fade in/out length in seconds.
    pub fade_duration: f64,
    /// `false` selects the raw concat-merge rendition (no trim, no fades).
    pub apply_fade_and_trim: bool,
    /// Encoder VBR quality (`-q:a`).
    pub quality: u32,
    /// Seed for the pool shuffle; `None` means a fresh random permutation
    /// per run.
    pub shuffle_seed: Option<u64>,
}

impl Default for MixConfig {
    fn default() -> Self {
        Self {
            playlist: DEFAULT_PLAYLIST.to_string(),
            track_root: default_track_root().unwrap_or_else(|_| PathBuf::from("music")),
            bgm_volume: DEFAULT_BGM_VOLUME,
            fade_duration: DEFAULT_FADE_DURATION,
            apply_fade_and_trim: true,
            quality: DEFAULT_QUALITY,
            shuffle_seed: None,
        }
    }
}
