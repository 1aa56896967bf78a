//! Criterion benchmarks for a full MINI cluster build on the reference backend.
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p thumbcluster

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use thumbcluster::prelude::*;

/// Default parameters with every anchor nudged by up to ±1 mm / ±1°.
fn jittered_params(seed: u64) -> ClusterParameters {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut params = ClusterParameters::default();
    for name in AnchorName::ALL {
        let anchor = params.anchor_mut(name);
        for v in anchor.rotation.iter_mut().chain(anchor.position.iter_mut()) {
            *v += rng.gen_range(-1.0..1.0);
        }
    }
    params
}

fn bench_cluster(c: &mut Criterion) {
    let body = ReferenceBody::default();
    let (backend, shapes) = (PointSolidBackend, BoxShapes::default());
    let mut group = c.benchmark_group("cluster");

    group.bench_function("validate", |b| {
        b.iter_batched(
            || jittered_params(7),
            |params| {
                let cluster =
                    ThumbCluster::new(&params, ClusterVariant::Mini, &body, MountDims::default())
                        .expect("jittered MINI parameters validate");
                black_box(cluster.validation().hull_windows)
            },
            BatchSize::SmallInput,
        )
    });

    let cluster = ThumbCluster::new(
        &ClusterParameters::default(),
        ClusterVariant::Mini,
        &body,
        MountDims::default(),
    )
    .unwrap();
    group.bench_function("web_and_walls", |b| {
        b.iter(|| black_box(cluster.build(&backend, &shapes).unwrap()))
    });
    group.bench_function("points", |b| {
        b.iter(|| black_box(cluster.points()))
    });
    group.finish();
}

criterion_group!(benches, bench_cluster);
criterion_main!(benches);
