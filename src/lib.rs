//! Assemble a background-music bed for a main audio track and mix them.
//!
//! Core modules:
//! - [`selector`] - Greedy duration-covering track selection
//! - [`filtergraph`] - Mix graph composition (concat, trim, fades, pan)
//! - [`pipeline`] - End-to-end orchestration of one mix request
//! - [`probe`] - Media duration probing via ffprobe
//! - [`playlist`] - Candidate retrieval from MPD playlists via mpc
//! - [`mixer`] - Graph execution via ffmpeg
//!
//! ### Supporting Modules
//!
//! - [`track`] - Track identity and the consumable candidate pool
//! - [`config`] - Resolved mix parameters and defaults
//! - [`error`] - The pipeline's error taxonomy
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use bgmix::config::MixConfig;
//! use bgmix::mixer::FfmpegMixer;
//! use bgmix::pipeline::{self, MixRequest};
//! use bgmix::playlist::MpcPlaylist;
//! use bgmix::probe::FfprobeProber;
//! use std::path::PathBuf;
//!
//! let request = MixRequest {
//!     main_file: PathBuf::from("episode.ogg"),
//!     output: PathBuf::from("episode-with-bgm.mp3"),
//!     config: MixConfig::default(),
//! };
//!
//! pipeline::run(
//!     &request,
//!     &FfprobeProber,
//!     &MpcPlaylist,
//!     &FfmpegMixer::new(request.config.quality),
//! )?;
//! # Ok::<(), bgmix::error::MixError>(())
//! ```
//!
//! ## How a mix is built
//!
//! 1. The main file's duration is probed with ffprobe.
//! 2. The configured MPD playlist is listed with mpc and shuffled
//!    (seedable for reproducible beds).
//! 3. Tracks are popped off the shuffled pool, each probed in turn, until
//!    the accumulated bed duration covers the main file's length.
//! 4. A filtergraph concatenates the bed, trims it to the main duration,
//!    fades it in and out, and pans it under the main track at the
//!    configured volume. The main track is never attenuated; only the bed
//!    is.
//! 5. ffmpeg executes the graph and writes the output.
//!
//! Steps 3 and 4 are pure given their inputs; all randomness lives in the
//! shuffle of step 2 and all I/O behind the trait seams of steps 1, 2
//! and 5.
//!
//! ## Error Handling
//!
//! Library functions return [`error::MixError`], one variant per
//! user-reportable condition: an unreadable media file, a pool too small
//! for the target duration, inconsistent mix parameters, a failing
//! playlist daemon, or a failing encoder. Every error aborts the whole
//! request; no partial output is written.

pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod filtergraph;
pub mod mixer;
pub mod pipeline;
pub mod playlist;
pub mod probe;
pub mod selector;
pub mod track;
