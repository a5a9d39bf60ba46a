//! Demonstrates enabling verbose logging for pvshift.
use pvshift::{Envelope, OfflineRenderer, RenderCache};

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let clip = vec![0.25f32; 4_096];
    let renderer = OfflineRenderer::new();
    let mut cache = RenderCache::new(1);

    for semitones in [3.0, 3.0, -3.0, 5.0] {
        cache
            .render(&renderer, &clip, &Envelope::constant(semitones))
            .unwrap();
    }
    renderer.render(&clip, &Envelope::constant(0.0)).unwrap();
}
