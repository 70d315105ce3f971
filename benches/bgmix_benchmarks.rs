//! # bgmix Performance Benchmarks
//!
//! Benchmarks for the hot paths of the mix pipeline: greedy selection over
//! large pools and filtergraph composition/rendering for wide selections.
//!
//! ```bash
//! cargo bench
//! cargo bench selector
//! cargo bench filtergraph
//! ```

use bgmix::error::MixResult;
use bgmix::filtergraph::{compose, MixSpec};
use bgmix::probe::DurationProber;
use bgmix::selector::{select, Selection};
use bgmix::track::{Track, TrackPool};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use std::hint::black_box;
use std::path::Path;

/// Prober with a constant answer; keeps the benchmark free of I/O so only
/// the selection loop is measured.
struct ConstProber(f64);

impl DurationProber for ConstProber {
    fn duration(&self, _path: &Path) -> MixResult<f64> {
        Ok(self.0)
    }
}

fn build_pool(size: usize) -> TrackPool {
    let ids: Vec<String> = (0..size).map(|i| format!("artist/album/{i}.flac")).collect();
    TrackPool::resolve(&ids, Path::new("/music"))
}

fn build_selection(size: usize) -> Selection {
    Selection {
        tracks: (0..size)
            .map(|i| Track::resolve(&format!("{i}.flac"), Path::new("/music")))
            .collect(),
        total_duration: size as f64 * 180.0,
    }
}

fn bench_selector(c: &mut Criterion) {
    let mut group = c.benchmark_group("selector");
    let prober = ConstProber(180.0);

    for pool_size in [10usize, 100, 1000] {
        // Target that consumes roughly half the pool.
        let target = pool_size as f64 * 90.0;
        group.bench_with_input(
            BenchmarkId::new("select_half_pool", pool_size),
            &pool_size,
            |b, &size| {
                b.iter_batched(
                    || build_pool(size),
                    |pool| select(black_box(pool), black_box(target), &prober),
                    BatchSize::SmallInput,
                );
            },
        );
    }
    group.finish();
}

fn bench_filtergraph(c: &mut Criterion) {
    let mut group = c.benchmark_group("filtergraph");
    let spec = MixSpec {
        main_duration: 3600.0,
        bgm_volume: 0.5,
        fade_duration: 10.0,
        apply_fade_and_trim: true,
    };

    for track_count in [1usize, 8, 64] {
        let selection = build_selection(track_count);
        group.bench_with_input(
            BenchmarkId::new("compose", track_count),
            &selection,
            |b, selection| {
                b.iter(|| {
                    compose(
                        black_box(selection),
                        black_box(Path::new("/cast/main.ogg")),
                        black_box(&spec),
                    )
                });
            },
        );

        let (graph, _) = compose(&selection, Path::new("/cast/main.ogg"), &spec).unwrap();
        group.bench_with_input(
            BenchmarkId::new("render", track_count),
            &graph,
            |b, graph| {
                b.iter(|| black_box(graph).render());
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_selector, bench_filtergraph);
criterion_main!(benches);
