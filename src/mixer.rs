//! Mix execution: hand the graph and inputs to the ffmpeg encoder.
//!
//! The executor is a boundary, not core logic: it binds the composer's
//! positional input list to `-i` flags, passes the rendered graph through
//! `-filter_complex`, maps the terminal pin, and waits for the encoder to
//! finish. One scoped process per mix, no retry, nothing left running.

use crate::error::{MixError, MixResult};
use crate::filtergraph::FilterGraph;
use log::{debug, info};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Executes a composed filtergraph against an ordered input list.
pub trait MixBackend {
    /// Run the mix, writing the result to `output`. Success is defined by
    /// the back-end's exit status.
    fn execute(&self, graph: &FilterGraph, inputs: &[PathBuf], output: &Path) -> MixResult<()>;
}

/// Back-end invoking the `ffmpeg` binary.
#[derive(Debug, Clone)]
pub struct FfmpegMixer {
    /// VBR audio quality handed to `-q:a`.
    quality: u32,
}

impl FfmpegMixer {
    pub fn new(quality: u32) -> Self {
        Self { quality }
    }

    /// The full argument vector, program name first. Input 0 must be the
    /// main file; the graph's pin numbers assume the composer's ordering.
    fn args_os(&self, graph: &FilterGraph, inputs: &[PathBuf], output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["ffmpeg".into()];
        for input in inputs {
            args.push("-i".into());
            args.push(input.into());
        }
        args.push("-filter_complex".into());
        args.push(graph.render().into());
        args.push("-map".into());
        args.push(graph.output_pin().into());
        args.push("-q:a".into());
        args.push(self.quality.to_string().into());
        args.push(output.into());
        args
    }

    /// Lossy string rendition of the command, for logging and dry runs.
    pub fn command_line(
        &self,
        graph: &FilterGraph,
        inputs: &[PathBuf],
        output: &Path,
    ) -> Vec<String> {
        self.args_os(graph, inputs, output)
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }
}

impl Default for FfmpegMixer {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_QUALITY)
    }
}

impl MixBackend for FfmpegMixer {
    fn execute(&self, graph: &FilterGraph, inputs: &[PathBuf], output: &Path) -> MixResult<()> {
        let args = self.args_os(graph, inputs, output);
        debug!("running: {}", self.command_line(graph, inputs, output).join(" "));

        let result = Command::new(&args[0])
            .args(&args[1..])
            .output()
            .map_err(|e| MixError::Execution(format!("failed to execute ffmpeg: {e}")))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(MixError::Execution(format!(
                "ffmpeg exited with {}: {}",
                result.status,
                stderr.trim()
            )));
        }

        info!("mixed {} input(s) into {}", inputs.len(), output.display());
        Ok(())
    }
}
