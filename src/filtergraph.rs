//! Filtergraph composition: from a selection to an executable mix graph.
//!
//! The composer turns a [`Selection`] and a [`MixSpec`] into the textual
//! `filter_complex` description the back-end encoder executes, plus the
//! ordered input list that binds graph pin numbers to files. The graph is
//! built once per mix request and never mutated afterwards.
//!
//! Two historical renditions of this tool existed: one that merged the raw
//! concatenated bed under the main track, and one that first trimmed the bed
//! to the main track's length and faded it in and out. Both live here as a
//! single composer behind [`MixSpec::apply_fade_and_trim`]; the merge and
//! pan stages are shared and mandatory in either mode.
//!
//! ## Stage order
//!
//! 1. `concat`: all selected tracks, end to end, in selection order
//! 2. `atrim`: truncate the bed to exactly the main duration (fade mode)
//! 3. `afade=type=in`: ramp from silence over the fade duration (fade mode)
//! 4. `afade=type=out`: mirrored ramp ending at the main duration (fade mode)
//! 5. `amerge`: bed + main track into one multi-channel stream
//! 6. `pan`: weighted stereo downmix, BGM channels scaled by the volume
//!    weight, main-track channels passed through at full amplitude
//!
//! The asymmetry in stage 6 is intentional: the bed is attenuated, the main
//! track never is.

use crate::error::{MixError, MixResult};
use crate::selector::Selection;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Pin label of the concatenated (and possibly faded) BGM stream.
const BGM_PIN: &str = "bgm";
/// Pin label of the graph's single terminal output.
const MERGED_PIN: &str = "merged";

/// Immutable parameters of one mix request.
///
/// `bgm_volume` is a 0-1 weight by contract; out-of-range values are
/// accepted and produce perceptually invalid output rather than an error.
/// `fade_duration` only makes musical sense below half the main duration;
/// that remains a caller contract, and only the case that would push the
/// fade-out start time negative is rejected outright.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MixSpec {
    /// Duration of the main file in seconds.
    pub main_duration: f64,
    /// Weight applied to both BGM channels in the final downmix.
    pub bgm_volume: f64,
    /// Fade in/out length in seconds. Ignored when `apply_fade_and_trim`
    /// is off.
    pub fade_duration: f64,
    /// `true` selects the trim-and-fade rendition; `false` the raw
    /// concat-merge one.
    pub apply_fade_and_trim: bool,
}

impl MixSpec {
    /// Start time of the fade-out ramp, so it ends exactly at the main
    /// track's end.
    pub fn fade_out_start(&self) -> f64 {
        self.main_duration - self.fade_duration
    }

    /// Reject mutually inconsistent parameters before any graph exists.
    pub fn validate(&self) -> MixResult<()> {
        if !self.main_duration.is_finite() || self.main_duration <= 0.0 {
            return Err(MixError::InvalidSpec(format!(
                "main duration must be positive, got {}",
                self.main_duration
            )));
        }
        if !self.bgm_volume.is_finite() {
            return Err(MixError::InvalidSpec(format!(
                "BGM volume must be a finite number, got {}",
                self.bgm_volume
            )));
        }
        if self.apply_fade_and_trim {
            if !self.fade_duration.is_finite() || self.fade_duration < 0.0 {
                return Err(MixError::InvalidSpec(format!(
                    "fade duration must be a non-negative number of seconds, got {}",
                    self.fade_duration
                )));
            }
            if self.fade_duration > self.main_duration {
                return Err(MixError::InvalidSpec(format!(
                    "fade duration {}s exceeds main duration {}s \
                     (fade-out would start before 0)",
                    self.fade_duration, self.main_duration
                )));
            }
        }
        Ok(())
    }
}

/// One linear run of filter stages: named input pins, stages applied in
/// order, one labelled output pin.
#[derive(Debug, Clone, Serialize)]
pub struct FilterChain {
    /// Input pin labels, without brackets, e.g. `1:0` or `bgm`.
    pub inputs: Vec<String>,
    /// Filter stages in application order, already formatted.
    pub stages: Vec<String>,
    /// Output pin label, without brackets.
    pub output: String,
}

impl FilterChain {
    fn render(&self) -> String {
        let inputs: String = self.inputs.iter().map(|pin| format!("[{pin}]")).collect();
        format!("{} {} [{}]", inputs, self.stages.join(", "), self.output)
    }
}

/// A complete mix graph: chains in data-dependency order, the last one
/// producing the single terminal output pin.
#[derive(Debug, Clone, Serialize)]
pub struct FilterGraph {
    chains: Vec<FilterChain>,
}

impl FilterGraph {
    pub fn chains(&self) -> &[FilterChain] {
        &self.chains
    }

    /// The terminal output pin in bracketed form, as the back-end's stream
    /// selector expects it.
    pub fn output_pin(&self) -> String {
        format!("[{MERGED_PIN}]")
    }

    /// The back-end's textual graph syntax: chains joined by `;`, stages
    /// within a chain by `,`.
    pub fn render(&self) -> String {
        self.chains
            .iter()
            .map(FilterChain::render)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl fmt::Display for FilterGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Build the mix graph and its input binding for one request.
///
/// The returned input list is positional: index 0 is always the main file,
/// indexes 1..=N the selected BGM tracks in selection order. Pin references
/// inside the graph use exactly these positions; the pair is the binding
/// contract between composer and executor.
///
/// # Errors
///
/// [`MixError::InvalidSpec`] if the spec fails [`MixSpec::validate`] or the
/// selection is empty. Validation happens before any graph is constructed.
pub fn compose(
    selection: &Selection,
    main_file: &Path,
    spec: &MixSpec,
) -> MixResult<(FilterGraph, Vec<PathBuf>)> {
    spec.validate()?;
    if selection.is_empty() {
        return Err(MixError::InvalidSpec(
            "cannot compose a mix from an empty selection".to_string(),
        ));
    }

    let track_count = selection.len();

    // Stage 1: concatenate every selected track's audio channel. Inputs are
    // numbered from 1 because input 0 is the main file.
    let mut bgm_stages = vec![format!("concat=n={track_count}:v=0:a=1")];

    if spec.apply_fade_and_trim {
        // Stages 2-4: cut the bed to the main track's length, then ramp the
        // edges. The fade-out ends exactly at the main duration.
        bgm_stages.push(format!("atrim=duration={}", spec.main_duration));
        bgm_stages.push(format!("afade=type=in:duration={}", spec.fade_duration));
        bgm_stages.push(format!(
            "afade=type=out:start_time={}:duration={}",
            spec.fade_out_start(),
            spec.fade_duration
        ));
    }

    let bgm_chain = FilterChain {
        inputs: (1..=track_count).map(|n| format!("{n}:0")).collect(),
        stages: bgm_stages,
        output: BGM_PIN.to_string(),
    };

    // Stages 5-6: merge the bed under the main track, then downmix to
    // stereo with the bed attenuated and the main track untouched.
    let merge_chain = FilterChain {
        inputs: vec![BGM_PIN.to_string(), "0:0".to_string()],
        stages: vec![
            "amerge=inputs=2".to_string(),
            format!(
                "pan=stereo|FL<{v}*FL+FC|FR<{v}*FR+FC",
                v = spec.bgm_volume
            ),
        ],
        output: MERGED_PIN.to_string(),
    };

    let graph = FilterGraph {
        chains: vec![bgm_chain, merge_chain],
    };

    let mut inputs = Vec::with_capacity(track_count + 1);
    inputs.push(main_file.to_path_buf());
    inputs.extend(selection.tracks.iter().map(|t| t.path.clone()));

    Ok((graph, inputs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::Track;

    fn selection_of(durations: &[f64]) -> Selection {
        Selection {
            tracks: durations
                .iter()
                .enumerate()
                .map(|(i, _)| Track::resolve(&format!("t{}.ogg", i + 1), Path::new("/music")))
                .collect(),
            total_duration: durations.iter().sum(),
        }
    }

    fn fade_spec(main: f64, fade: f64) -> MixSpec {
        MixSpec {
            main_duration: main,
            bgm_volume: 0.5,
            fade_duration: fade,
            apply_fade_and_trim: true,
        }
    }

    #[test]
    fn fade_out_starts_where_the_fade_fits_exactly() {
        let spec = fade_spec(30.0, 5.0);
        assert_eq!(spec.fade_out_start(), 25.0);
    }

    #[test]
    fn main_file_is_always_input_zero() {
        for n in 1..=5 {
            let selection = selection_of(&vec![30.0; n]);
            let (_, inputs) =
                compose(&selection, Path::new("/cast/episode.ogg"), &fade_spec(100.0, 10.0))
                    .unwrap();

            assert_eq!(inputs.len(), n + 1);
            assert_eq!(inputs[0], PathBuf::from("/cast/episode.ogg"));
            for (i, track) in selection.tracks.iter().enumerate() {
                assert_eq!(inputs[i + 1], track.path);
            }
        }
    }

    #[test]
    fn full_graph_matches_the_backend_syntax() {
        let selection = selection_of(&[40.0, 30.0, 20.0, 10.0]);
        let (graph, _) =
            compose(&selection, Path::new("/cast/main.ogg"), &fade_spec(100.0, 10.0)).unwrap();

        assert_eq!(
            graph.render(),
            "[1:0][2:0][3:0][4:0] concat=n=4:v=0:a=1, atrim=duration=100, \
             afade=type=in:duration=10, afade=type=out:start_time=90:duration=10 [bgm]; \
             [bgm][0:0] amerge=inputs=2, pan=stereo|FL<0.5*FL+FC|FR<0.5*FR+FC [merged]"
        );
        assert_eq!(graph.output_pin(), "[merged]");
    }

    #[test]
    fn raw_merge_variant_skips_trim_and_fades() {
        let selection = selection_of(&[40.0, 30.0]);
        let spec = MixSpec {
            main_duration: 60.0,
            bgm_volume: 0.5,
            fade_duration: 10.0,
            apply_fade_and_trim: false,
        };
        let (graph, _) = compose(&selection, Path::new("/cast/main.ogg"), &spec).unwrap();

        let rendered = graph.render();
        assert_eq!(
            rendered,
            "[1:0][2:0] concat=n=2:v=0:a=1 [bgm]; \
             [bgm][0:0] amerge=inputs=2, pan=stereo|FL<0.5*FL+FC|FR<0.5*FR+FC [merged]"
        );
        assert!(!rendered.contains("atrim"));
        assert!(!rendered.contains("afade"));
    }

    #[test]
    fn bgm_channels_are_weighted_and_main_channels_are_not() {
        let selection = selection_of(&[90.0]);
        let (graph, _) =
            compose(&selection, Path::new("/cast/main.ogg"), &fade_spec(80.0, 10.0)).unwrap();

        let pan = graph
            .chains()
            .last()
            .unwrap()
            .stages
            .last()
            .unwrap()
            .clone();
        // Both bed channels carry the 0.5 coefficient; the main-track
        // contribution (FC) has none.
        assert_eq!(pan, "pan=stereo|FL<0.5*FL+FC|FR<0.5*FR+FC");
    }

    #[test]
    fn fade_longer_than_main_is_rejected_before_composition() {
        let selection = selection_of(&[30.0]);
        let err = compose(&selection, Path::new("/cast/main.ogg"), &fade_spec(8.0, 10.0))
            .unwrap_err();
        match err {
            MixError::InvalidSpec(msg) => assert!(msg.contains("fade")),
            other => panic!("expected InvalidSpec, got {other}"),
        }
    }

    #[test]
    fn fade_equal_to_main_is_accepted_at_start_zero() {
        let selection = selection_of(&[30.0]);
        let spec = fade_spec(20.0, 20.0);
        let (graph, _) = compose(&selection, Path::new("/m.ogg"), &spec).unwrap();
        assert!(graph.render().contains("afade=type=out:start_time=0:duration=20"));
    }

    #[test]
    fn nonpositive_main_duration_is_rejected() {
        let selection = selection_of(&[30.0]);
        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = compose(&selection, Path::new("/m.ogg"), &fade_spec(bad, 1.0)).unwrap_err();
            assert!(matches!(err, MixError::InvalidSpec(_)), "main={bad}");
        }
    }

    #[test]
    fn empty_selection_is_rejected() {
        let empty = Selection {
            tracks: Vec::new(),
            total_duration: 0.0,
        };
        let err = compose(&empty, Path::new("/m.ogg"), &fade_spec(30.0, 5.0)).unwrap_err();
        assert!(matches!(err, MixError::InvalidSpec(_)));
    }

    #[test]
    fn out_of_range_volume_is_accepted_as_documented() {
        let selection = selection_of(&[60.0]);
        let spec = MixSpec {
            main_duration: 50.0,
            bgm_volume: 1.5,
            fade_duration: 5.0,
            apply_fade_and_trim: true,
        };
        let (graph, _) = compose(&selection, Path::new("/m.ogg"), &spec).unwrap();
        assert!(graph.render().contains("FL<1.5*FL+FC"));
    }

    #[test]
    fn fractional_durations_render_as_plain_decimals() {
        let selection = selection_of(&[120.0]);
        let spec = fade_spec(93.25, 7.5);
        let (graph, _) = compose(&selection, Path::new("/m.ogg"), &spec).unwrap();

        let rendered = graph.render();
        assert!(rendered.contains("atrim=duration=93.25"));
        assert!(rendered.contains("afade=type=in:duration=7.5"));
        assert!(rendered.contains("afade=type=out:start_time=85.75:duration=7.5"));
    }
}
