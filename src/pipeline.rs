//! The mix pipeline: probe, retrieve, shuffle, select, compose, execute.
//!
//! Each stage completes fully before the next begins, and no shared mutable
//! state crosses a component boundary; the pipeline hands each collaborator
//! its inputs and passes the returned value on. All collaborators arrive as
//! trait objects, so the whole flow runs under test with fakes and no
//! external processes.

use crate::config::MixConfig;
use crate::error::MixResult;
use crate::filtergraph::{compose, FilterGraph, MixSpec};
use crate::mixer::{FfmpegMixer, MixBackend};
use crate::playlist::PlaylistSource;
use crate::probe::DurationProber;
use crate::selector::{select, Selection};
use crate::track::TrackPool;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{thread_rng, SeedableRng};
use serde::Serialize;
use std::path::PathBuf;

/// One fully specified mix request.
#[derive(Debug, Clone)]
pub struct MixRequest {
    /// The main file the BGM bed is fitted to.
    pub main_file: PathBuf,
    /// Where the mixed result is written.
    pub output: PathBuf,
    pub config: MixConfig,
}

/// Everything the pipeline decided for one request, short of running the
/// encoder. This is what the dry-run subcommand prints as JSON.
#[derive(Debug, Serialize)]
pub struct MixPlan {
    pub main_duration: f64,
    pub selection: Selection,
    pub filtergraph: String,
    pub inputs: Vec<PathBuf>,
    pub command: Vec<String>,
}

/// Probe, retrieve, shuffle, select, compose. Shared by [`run`] and
/// [`plan`]; execution is the only step they differ in.
fn assemble(
    request: &MixRequest,
    prober: &dyn DurationProber,
    playlists: &dyn PlaylistSource,
) -> MixResult<(f64, Selection, FilterGraph, Vec<PathBuf>)> {
    let config = &request.config;

    let main_duration = prober.duration(&request.main_file)?;
    info!(
        "main file {} runs {main_duration:.1}s",
        request.main_file.display()
    );

    // Catch inconsistent parameters before any playlist or probe work.
    let spec = MixSpec {
        main_duration,
        bgm_volume: config.bgm_volume,
        fade_duration: config.fade_duration,
        apply_fade_and_trim: config.apply_fade_and_trim,
    };
    spec.validate()?;

    let ids = playlists.list_tracks(&config.playlist)?;
    let mut pool = TrackPool::resolve(&ids, &config.track_root);
    debug!(
        "playlist '{}' resolved to {} candidate(s) under {}",
        config.playlist,
        pool.len(),
        config.track_root.display()
    );

    // Shuffling is the caller's concern, not the selector's: a seeded RNG
    // here makes the whole pipeline reproducible without the selector ever
    // seeing a random number.
    match config.shuffle_seed {
        Some(seed) => pool.shuffle(&mut StdRng::seed_from_u64(seed)),
        None => pool.shuffle(&mut thread_rng()),
    }

    let selection = select(pool, main_duration, prober)?;
    info!(
        "selected {} track(s), {:.1}s of BGM for {main_duration:.1}s of main audio",
        selection.len(),
        selection.total_duration
    );

    let (graph, inputs) = compose(&selection, &request.main_file, &spec)?;
    Ok((main_duration, selection, graph, inputs))
}

/// Run the full pipeline and write the mixed output.
///
/// Errors are fatal to the request: either a complete, correctly durationed
/// output file is produced, or none is.
pub fn run(
    request: &MixRequest,
    prober: &dyn DurationProber,
    playlists: &dyn PlaylistSource,
    backend: &dyn MixBackend,
) -> MixResult<()> {
    let (_, _, graph, inputs) = assemble(request, prober, playlists)?;
    backend.execute(&graph, &inputs, &request.output)?;
    info!("wrote {}", request.output.display());
    Ok(())
}

/// Dry run: make every decision the real pipeline would, but return the
/// plan instead of invoking the encoder.
pub fn plan(
    request: &MixRequest,
    prober: &dyn DurationProber,
    playlists: &dyn PlaylistSource,
) -> MixResult<MixPlan> {
    let (main_duration, selection, graph, inputs) = assemble(request, prober, playlists)?;
    let command = FfmpegMixer::new(request.config.quality).command_line(
        &graph,
        &inputs,
        &request.output,
    );
    Ok(MixPlan {
        main_duration,
        selection,
        filtergraph: graph.render(),
        inputs,
        command,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MixError;
    use std::collections::HashMap;
    use std::path::Path;

    struct TableProber(HashMap<String, f64>);

    impl DurationProber for TableProber {
        fn duration(&self, path: &Path) -> MixResult<f64> {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.0.get(&name).copied().ok_or_else(|| MixError::Probe {
                path: path.to_path_buf(),
                reason: "not a file".to_string(),
            })
        }
    }

    struct FixedPlaylist(Vec<String>);

    impl PlaylistSource for FixedPlaylist {
        fn list_tracks(&self, _playlist: &str) -> MixResult<Vec<String>> {
            Ok(self.0.clone())
        }
    }

    fn request(seed: u64) -> MixRequest {
        MixRequest {
            main_file: PathBuf::from("/cast/episode.ogg"),
            output: PathBuf::from("/cast/episode-bgm.mp3"),
            config: MixConfig {
                track_root: PathBuf::from("/music"),
                shuffle_seed: Some(seed),
                ..MixConfig::default()
            },
        }
    }

    fn collaborators(track_count: usize) -> (TableProber, FixedPlaylist) {
        let mut durations: HashMap<String, f64> = (0..track_count)
            .map(|i| (format!("t{i}.ogg"), 45.0))
            .collect();
        durations.insert("episode.ogg".to_string(), 100.0);
        let ids = (0..track_count).map(|i| format!("t{i}.ogg")).collect();
        (TableProber(durations), FixedPlaylist(ids))
    }

    #[test]
    fn plan_covers_the_main_duration() {
        let (prober, playlist) = collaborators(10);
        let plan = plan(&request(1), &prober, &playlist).unwrap();

        assert_eq!(plan.main_duration, 100.0);
        assert!(plan.selection.total_duration >= 100.0);
        // 45s tracks: exactly three cross the 100s threshold.
        assert_eq!(plan.selection.len(), 3);
        assert_eq!(plan.inputs[0], PathBuf::from("/cast/episode.ogg"));
        assert_eq!(plan.inputs.len(), plan.selection.len() + 1);
    }

    #[test]
    fn plan_is_deterministic_for_a_fixed_seed() {
        let (prober, playlist) = collaborators(20);
        let first = plan(&request(7), &prober, &playlist).unwrap();
        let second = plan(&request(7), &prober, &playlist).unwrap();

        let ids = |p: &MixPlan| {
            p.selection
                .tracks
                .iter()
                .map(|t| t.id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&first), ids(&second));
        assert_eq!(first.filtergraph, second.filtergraph);
        assert_eq!(first.command, second.command);
    }

    #[test]
    fn empty_playlist_surfaces_as_insufficient_tracks() {
        let (prober, _) = collaborators(0);
        let playlist = FixedPlaylist(Vec::new());
        let err = plan(&request(1), &prober, &playlist).unwrap_err();
        assert!(matches!(err, MixError::InsufficientTracks { selected: 0, .. }));
    }

    #[test]
    fn invalid_fade_fails_before_any_selection_work() {
        let (prober, playlist) = collaborators(5);
        let mut req = request(1);
        req.config.fade_duration = 500.0;

        let err = plan(&req, &prober, &playlist).unwrap_err();
        assert!(matches!(err, MixError::InvalidSpec(_)));
    }

    #[test]
    fn missing_main_file_aborts_immediately() {
        let (_, playlist) = collaborators(5);
        let prober = TableProber(HashMap::new());
        let err = plan(&request(1), &prober, &playlist).unwrap_err();
        assert!(matches!(err, MixError::Probe { .. }));
    }

    #[test]
    fn raw_merge_config_produces_a_fadeless_graph() {
        let (prober, playlist) = collaborators(10);
        let mut req = request(3);
        req.config.apply_fade_and_trim = false;

        let result = plan(&req, &prober, &playlist).unwrap();
        assert!(!result.filtergraph.contains("afade"));
        assert!(!result.filtergraph.contains("atrim"));
        assert!(result.filtergraph.contains("amerge=inputs=2"));
    }
}
