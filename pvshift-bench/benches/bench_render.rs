use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pvshift::{BendPoint, Envelope, OfflineRenderer, RenderCache};

fn clip(len: usize) -> Vec<f32> {
    (0..len).map(|n| 0.4 * (n as f32 * 0.031).sin()).collect()
}

fn bench_render(c: &mut Criterion) {
    let input = clip(44_100);
    let renderer = OfflineRenderer::new();
    let bend = Envelope::new(vec![BendPoint::new(0, -7.0), BendPoint::new(344, 7.0)])
        .unwrap();

    let mut group = c.benchmark_group("render_one_second");
    group.sample_size(20);
    for (name, env) in [
        ("bypass", Envelope::constant(0.0)),
        ("fifth_up", Envelope::constant(7.0)),
        ("bend", bend),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &env, |b, env| {
            b.iter(|| renderer.render(&input, env).unwrap())
        });
    }

    let mut cache = RenderCache::new(8);
    let env = Envelope::constant(3.0);
    cache.render(&renderer, &input, &env).unwrap();
    group.bench_function("cache_hit", |b| {
        b.iter(|| cache.render(&renderer, &input, &env).unwrap())
    });
    group.finish();
}

#[cfg(feature = "parallel")]
fn bench_batch(c: &mut Criterion) {
    use pvshift::{render_batch, WindowTable};

    let clips: Vec<Vec<f32>> = (0..8).map(|_| clip(22_050)).collect();
    let env = Envelope::constant(5.0);
    let jobs: Vec<(&[f32], &Envelope)> = clips.iter().map(|c| (c.as_slice(), &env)).collect();
    let window = WindowTable::shared();
    let mut group = c.benchmark_group("render_batch");
    group.sample_size(10);
    group.bench_function("eight_clips", |b| {
        b.iter(|| render_batch(&window, &jobs).unwrap())
    });
    group.finish();
}

#[cfg(feature = "parallel")]
criterion_group!(benches, bench_render, bench_batch);
#[cfg(not(feature = "parallel"))]
criterion_group!(benches, bench_render);
criterion_main!(benches);
