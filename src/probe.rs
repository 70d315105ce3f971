//! Media duration probing via ffprobe.
//!
//! The selector and the pipeline only ever ask one question of a media file:
//! how long is it. [`DurationProber`] is that question as a trait, so tests
//! can answer it without touching the filesystem; [`FfprobeProber`] is the
//! real answer, delegating to the `ffprobe` binary.

use crate::error::{MixError, MixResult};
use log::debug;
use std::path::Path;
use std::process::Command;

/// Read-only duration inspection of a media file.
pub trait DurationProber {
    /// Duration of the file at `path`, in seconds.
    ///
    /// Fails with [`MixError::Probe`] if the path does not reference a
    /// readable media file. A missing file is a configuration error, never
    /// a zero duration.
    fn duration(&self, path: &Path) -> MixResult<f64>;
}

/// Prober backed by the `ffprobe` command-line tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct FfprobeProber;

impl DurationProber for FfprobeProber {
    fn duration(&self, path: &Path) -> MixResult<f64> {
        if !path.is_file() {
            return Err(MixError::Probe {
                path: path.to_path_buf(),
                reason: "not a file".to_string(),
            });
        }

        debug!("probing duration of {}", path.display());
        let output = Command::new("ffprobe")
            .arg("-i")
            .arg(path)
            .args(["-show_entries", "format=duration", "-v", "quiet", "-of", "csv=p=0"])
            .output()
            .map_err(|e| MixError::Probe {
                path: path.to_path_buf(),
                reason: format!("failed to execute ffprobe: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MixError::Probe {
                path: path.to_path_buf(),
                reason: format!("ffprobe exited with {}: {}", output.status, stderr.trim()),
            });
        }

        parse_duration(&String::from_utf8_lossy(&output.stdout)).map_err(|reason| {
            MixError::Probe {
                path: path.to_path_buf(),
                reason,
            }
        })
    }
}

/// Parse ffprobe's `csv=p=0` duration output into seconds.
fn parse_duration(raw: &str) -> Result<f64, String> {
    let trimmed = raw.trim();
    let seconds: f64 = trimmed
        .parse()
        .map_err(|_| format!("unparseable duration '{trimmed}'"))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("nonsensical duration {seconds}"));
    }
    Ok(seconds)
}
