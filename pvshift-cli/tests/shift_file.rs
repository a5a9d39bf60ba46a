use assert_cmd::Command;
use pvshift::{BendPoint, Envelope, EnvelopeError, RenderCache};
use pvshift_cli::{parse_envelope, read_audio, shift_file, write_wav};
use std::f32::consts::PI;

fn tone(len: usize) -> Vec<f32> {
    (0..len)
        .map(|n| 0.4 * (2.0 * PI * 330.0 * n as f32 / 44_100.0).sin())
        .collect()
}

#[test]
fn parses_envelope_pairs() {
    let env = parse_envelope("0:0, 344:12,400:-3.5").unwrap();
    assert_eq!(
        env.points(),
        &[
            BendPoint::new(0, 0.0),
            BendPoint::new(344, 12.0),
            BendPoint::new(400, -3.5)
        ]
    );
}

#[test]
fn rejects_malformed_envelopes() {
    assert!(parse_envelope("12").is_err());
    assert!(parse_envelope("a:1").is_err());
    assert!(parse_envelope("0:x").is_err());
    let err = parse_envelope("").unwrap_err();
    assert_eq!(
        err.downcast_ref::<EnvelopeError>(),
        Some(&EnvelopeError::Empty)
    );
    let err = parse_envelope("5:1,5:2").unwrap_err();
    assert_eq!(
        err.downcast_ref::<EnvelopeError>(),
        Some(&EnvelopeError::UnorderedPoints { index: 1 })
    );
}

#[test]
fn bypass_copies_input() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("in.wav");
    let output = tmp.path().join("out.wav");
    let samples = tone(5000);
    write_wav(&input, &samples, 44_100).unwrap();

    let mut cache = RenderCache::new(4);
    let report = shift_file(&input, &output, &Envelope::constant(0.0), &mut cache).unwrap();
    assert!(report.bypassed);
    assert_eq!(report.samples, 5000);
    let (out, sr) = read_audio(&output).unwrap();
    assert_eq!(sr, 44_100);
    assert_eq!(out, samples);
}

#[test]
fn shifted_file_keeps_length_and_rate() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("in.wav");
    let output = tmp.path().join("up.wav");
    write_wav(&input, &tone(9000), 44_100).unwrap();

    let mut cache = RenderCache::new(4);
    let report = shift_file(&input, &output, &Envelope::constant(7.0), &mut cache).unwrap();
    assert!(!report.bypassed);
    assert_eq!(cache.len(), 1);
    let (out, sr) = read_audio(&output).unwrap();
    assert_eq!(sr, 44_100);
    assert_eq!(out.len(), 9000);
    assert!(out.iter().all(|v| v.is_finite()));
    assert!(out.iter().any(|v| v.abs() > 1e-3));
}

#[test]
fn out_of_range_shift_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("in.wav");
    write_wav(&input, &tone(2048), 44_100).unwrap();
    let mut cache = RenderCache::new(4);
    let result = shift_file(
        &input,
        &tmp.path().join("never.wav"),
        &Envelope::constant(48.0),
        &mut cache,
    );
    assert!(result.is_err());
    assert!(!tmp.path().join("never.wav").exists());
}

#[test]
fn binary_shifts_by_semitones() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("in.wav");
    let output = tmp.path().join("down.wav");
    write_wav(&input, &tone(4096), 44_100).unwrap();

    Command::cargo_bin("pvshift-cli")
        .unwrap()
        .arg(&input)
        .arg(&output)
        .args(["--semitones", "-5"])
        .assert()
        .success();
    let (out, _) = read_audio(&output).unwrap();
    assert_eq!(out.len(), 4096);
}

#[test]
fn binary_requires_a_shift() {
    let tmp = tempfile::tempdir().unwrap();
    let input = tmp.path().join("in.wav");
    write_wav(&input, &tone(256), 44_100).unwrap();
    Command::cargo_bin("pvshift-cli")
        .unwrap()
        .arg(&input)
        .arg(tmp.path().join("out.wav"))
        .assert()
        .failure();
}
