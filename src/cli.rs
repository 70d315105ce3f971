//! Command-line interface definitions using Clap derive macros.
//!
//! Every mix parameter can also come from the environment (`BGMIX_*`
//! variables), so the tool drops into cron jobs and shell scripts without a
//! wall of flags. Values arrive here as strings and leave as a fully
//! resolved [`MixConfig`]; nothing downstream parses anything.
//!
//! ## Examples
//!
//! ```bash
//! bgmix mix episode.ogg episode-with-bgm.mp3
//! bgmix mix -p chill -b 0.3 narration.wav out.mp3
//! bgmix plan --seed 42 episode.ogg out.mp3
//! ```

use crate::config::{self, MixConfig};
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
#[derive(Parser)]
#[command(name = "bgmix")]
#[command(about = "Create a BGM bed for a given main track and merge them")]
#[command(version)]
pub struct Args {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Enumeration of all available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Assemble a BGM bed and mix it under the main file
    ///
    /// Probes the main file's duration, draws shuffled tracks from the
    /// configured playlist until the bed covers that duration, then runs
    /// the encoder to produce the mixed output. The bed is trimmed to the
    /// main file's exact length and faded in and out unless --raw-merge
    /// is given.
    Mix {
        /// Main file to fit the BGM to
        main_file: PathBuf,

        /// Name of the output file
        output: PathBuf,

        #[command(flatten)]
        options: MixOptions,
    },

    /// Show what a mix would do, without running the encoder
    ///
    /// Makes every decision the real pipeline would (probing, selection,
    /// graph composition) and prints the resulting plan as JSON: chosen
    /// tracks, total bed duration, the filtergraph, and the exact encoder
    /// command line. Combine with --seed for a reproducible preview.
    Plan {
        /// Main file to fit the BGM to
        main_file: PathBuf,

        /// Output file the printed command would write
        output: PathBuf,

        #[command(flatten)]
        options: MixOptions,
    },

    /// Generate shell completions
    ///
    /// Usage: bgmix completion bash > ~/.local/share/bash-completion/completions/bgmix
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Mix parameters shared by `mix` and `plan`.
#[derive(clap::Args, Debug)]
pub struct MixOptions {
    /// MPD playlist to draw BGM tracks from
    #[arg(short, long, env = "BGMIX_PLAYLIST", default_value = config::DEFAULT_PLAYLIST)]
    pub playlist: String,

    /// Directory of all tracks in the given playlist (default: ~/media/music)
    #[arg(short = 'd', long, env = "BGMIX_TRACK_ROOT")]
    pub track_root: Option<PathBuf>,

    /// Volume of the BGM between 0 and 1
    #[arg(short, long, env = "BGMIX_VOLUME", default_value_t = config::DEFAULT_BGM_VOLUME)]
    pub bgm_volume: f64,

    /// Fade in/out duration for the BGM in seconds
    #[arg(short, long, env = "BGMIX_FADE", default_value_t = config::DEFAULT_FADE_DURATION)]
    pub fade_duration: f64,

    /// Merge the raw concatenated bed without trimming or fading
    #[arg(long)]
    pub raw_merge: bool,

    /// Encoder VBR quality (ffmpeg -q:a)
    #[arg(long, default_value_t = config::DEFAULT_QUALITY)]
    pub quality: u32,

    /// Shuffle seed for a reproducible track selection
    #[arg(long)]
    pub seed: Option<u64>,
}

impl MixOptions {
    /// Resolve the parsed options into the configuration the pipeline
    /// consumes, filling in the home-derived track root when none was
    /// supplied.
    pub fn into_config(self) -> Result<MixConfig> {
        let track_root = match self.track_root {
            Some(root) => root,
            None => config::default_track_root()?,
        };
        Ok(MixConfig {
            playlist: self.playlist,
            track_root,
            bgm_volume: self.bgm_volume,
            fade_duration: self.fade_duration,
            apply_fade_and_trim: !self.raw_merge,
            quality: self.quality,
            shuffle_seed: self.seed,
        })
    }
}
