//! Offline rendering with a pitch-bend envelope and the render cache.

use pvshift::{frame_count, BendPoint, Envelope, OfflineRenderer, RenderCache};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let sample_rate = 44_100.0f32;
    let clip: Vec<f32> = (0..88_200)
        .map(|n| 0.4 * (2.0 * std::f32::consts::PI * 330.0 * n as f32 / sample_rate).sin())
        .collect();

    let frames = frame_count(clip.len());
    // Glide up an octave over the first half, then back down to a fifth.
    let envelope = Envelope::new(vec![
        BendPoint::new(0, 0.0),
        BendPoint::new(frames / 2, 12.0),
        BendPoint::new(frames, 7.0),
    ])?;

    let renderer = OfflineRenderer::new();
    let mut cache = RenderCache::from_env();

    let start = std::time::Instant::now();
    let first = cache.render(&renderer, &clip, &envelope)?;
    let cold = start.elapsed();
    let start = std::time::Instant::now();
    let second = cache.render(&renderer, &clip, &envelope)?;
    let warm = start.elapsed();

    println!("frames:       {}", frames);
    println!("output:       {} samples", first.len());
    println!("cold render:  {:?}", cold);
    println!("cached:       {:?} (same buffer: {})", warm, std::sync::Arc::ptr_eq(&first, &second));
    println!("cache size:   {}/{}", cache.len(), cache.capacity());
    Ok(())
}
