use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use pvshift::{BendPoint, Envelope, OfflineRenderer, RenderCache};
use std::error::Error;
use std::fs::File;
use std::io;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};

/// Average interleaved frames down to one channel.
pub fn mix_to_mono(interleaved: &[f32], channels: usize, out: &mut Vec<f32>) {
    if channels <= 1 {
        out.extend_from_slice(interleaved);
        return;
    }
    for frame in interleaved.chunks(channels) {
        let sum: f32 = frame.iter().sum();
        out.push(sum / channels as f32);
    }
}

/// Decode `path` to mono `f32` samples and its sample rate.
///
/// `.wav` files go through hound; everything else is probed with symphonia.
pub fn read_audio(path: &Path) -> Result<(Vec<f32>, u32), Box<dyn Error>> {
    if path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"))
    {
        return read_wav(path);
    }
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }
    let probed = get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "no supported audio tracks"))?;
    let params = track.codec_params.clone();
    let mut decoder = get_codecs().make(&params, &DecoderOptions::default())?;
    let sample_rate = params
        .sample_rate
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "unknown sample rate"))?;
    let channels = params
        .channels
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "unknown channel count"))?
        .count();

    let mut samples = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    loop {
        match format.next_packet() {
            Ok(packet) => {
                let decoded = decoder.decode(&packet)?;
                let frames = decoded.frames();
                let buf = sample_buf.get_or_insert_with(|| {
                    SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec())
                });
                buf.copy_interleaved_ref(decoded);
                mix_to_mono(&buf.samples()[..frames * channels], channels, &mut samples);
            }
            Err(SymphoniaError::IoError(err)) if err.kind() == io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => decoder.reset(),
            Err(e) => return Err(Box::new(e)),
        }
    }

    if let Some(n) = params.n_frames {
        samples.truncate(n as usize);
    }
    Ok((samples, sample_rate))
}

fn read_wav(path: &Path) -> Result<(Vec<f32>, u32), Box<dyn Error>> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / full_scale))
                .collect::<Result<_, _>>()?
        }
    };
    let mut samples = Vec::with_capacity(interleaved.len() / spec.channels.max(1) as usize);
    mix_to_mono(&interleaved, spec.channels as usize, &mut samples);
    Ok((samples, spec.sample_rate))
}

/// Write mono 32-bit float WAV.
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), Box<dyn Error>> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for &s in samples {
        writer.write_sample(s)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Parse `"frame:semitones,frame:semitones,..."` into an [`Envelope`].
pub fn parse_envelope(text: &str) -> Result<Envelope, Box<dyn Error>> {
    let mut points = Vec::new();
    for item in text.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (frame, semitones) = item
            .split_once(':')
            .ok_or_else(|| format!("expected FRAME:SEMITONES, got `{}`", item))?;
        points.push(BendPoint::new(
            frame.trim().parse()?,
            semitones.trim().parse()?,
        ));
    }
    Ok(Envelope::new(points)?)
}

/// Outcome of [`shift_file`].
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftReport {
    pub samples: usize,
    pub sample_rate: u32,
    pub bypassed: bool,
}

/// Decode `input`, render it through `envelope` and write `output`.
pub fn shift_file(
    input: &Path,
    output: &Path,
    envelope: &Envelope,
    cache: &mut RenderCache,
) -> Result<ShiftReport, Box<dyn Error>> {
    let (samples, sample_rate) = read_audio(input)?;
    log::info!(
        "decoded {} ({} samples at {} Hz)",
        input.display(),
        samples.len(),
        sample_rate
    );
    let renderer = OfflineRenderer::new();
    let rendered = cache.render(&renderer, &samples, envelope)?;
    write_wav(output, &rendered, sample_rate)?;
    log::info!("wrote {}", output.display());
    Ok(ShiftReport {
        samples: rendered.len(),
        sample_rate,
        bypassed: envelope.is_bypass(),
    })
}
