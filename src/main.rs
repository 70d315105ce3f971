//! # bgmix - BGM bed creation and mixing
//!
//! Creates a background-music track for a given main track and merges the
//! two with ffmpeg. Candidate tracks come from an MPD playlist via mpc;
//! durations come from ffprobe.
//!
//! ## Usage
//!
//! ```bash
//! # Mix a BGM bed under an episode recording
//! bgmix mix episode.ogg episode-with-bgm.mp3
//!
//! # Quieter bed from a different playlist, no fades
//! bgmix mix -p ambient -b 0.2 --raw-merge narration.wav out.mp3
//!
//! # Inspect the selection and encoder command without running it
//! bgmix plan --seed 42 episode.ogg out.mp3
//! ```

use anyhow::{Context, Result};
use bgmix::cli;
use bgmix::completion;
use bgmix::mixer::FfmpegMixer;
use bgmix::pipeline::{self, MixRequest};
use bgmix::playlist::MpcPlaylist;
use bgmix::probe::FfprobeProber;
use clap::{CommandFactory, Parser};
use log::info;

/// Main entry point.
///
/// Initializes logging, parses command-line arguments, and routes commands
/// to the pipeline. Logging is controlled via `RUST_LOG`:
/// `RUST_LOG=info bgmix mix ...` prints each chosen BGM track,
/// `RUST_LOG=debug` additionally shows every external command.
fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();

    match args.command {
        cli::Command::Mix {
            main_file,
            output,
            options,
        } => {
            let config = options.into_config()?;
            let backend = FfmpegMixer::new(config.quality);
            let request = MixRequest {
                main_file,
                output,
                config,
            };
            info!(
                "mixing BGM from playlist '{}' under {}",
                request.config.playlist,
                request.main_file.display()
            );
            pipeline::run(&request, &FfprobeProber, &MpcPlaylist, &backend)
                .with_context(|| {
                    format!("failed to mix BGM under {}", request.main_file.display())
                })?;
        }
        cli::Command::Plan {
            main_file,
            output,
            options,
        } => {
            let config = options.into_config()?;
            let request = MixRequest {
                main_file,
                output,
                config,
            };
            let plan = pipeline::plan(&request, &FfprobeProber, &MpcPlaylist)
                .with_context(|| {
                    format!("failed to plan a mix for {}", request.main_file.display())
                })?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        cli::Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            completion::generate_completions(completion::shell_to_completion_shell(&shell), &mut cmd);
        }
    }

    Ok(())
}
