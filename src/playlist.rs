//! Candidate retrieval from the music daemon's playlists.
//!
//! Uses the `mpc` command-line client rather than the raw MPD protocol: mpc
//! is well-tested, ships everywhere MPD does, and gives clear error messages
//! when the daemon is down. A failing call surfaces as an explicit
//! [`MixError::Playlist`]; an empty playlist flows through and becomes
//! `InsufficientTracks` once the selector runs dry, never a silent success.

use crate::error::{MixError, MixResult};
use log::debug;
use std::process::Command;

/// Ordered retrieval of candidate track identifiers from a named playlist.
pub trait PlaylistSource {
    fn list_tracks(&self, playlist: &str) -> MixResult<Vec<String>>;
}

/// Playlist source backed by `mpc playlist -f %file%`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MpcPlaylist;

impl PlaylistSource for MpcPlaylist {
    fn list_tracks(&self, playlist: &str) -> MixResult<Vec<String>> {
        debug!("listing tracks of playlist '{playlist}'");
        let output = Command::new("mpc")
            .args(["playlist", "-f", "%file%"])
            .arg(playlist)
            .output()
            .map_err(|e| MixError::Playlist {
                name: playlist.to_string(),
                reason: format!("failed to execute mpc (is it installed?): {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MixError::Playlist {
                name: playlist.to_string(),
                reason: format!("mpc exited with {}: {}", output.status, stderr.trim()),
            });
        }

        let tracks = parse_track_list(&String::from_utf8_lossy(&output.stdout));
        debug!("playlist '{playlist}' yielded {} track(s)", tracks.len());
        Ok(tracks)
    }
}

/// One identifier per non-empty line, order preserved.
fn parse_track_list(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
