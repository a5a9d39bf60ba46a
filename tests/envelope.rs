use pvshift::{semitones_to_factor, BendPoint, Envelope, EnvelopeError};

#[test]
fn semitone_factors() {
    assert_eq!(semitones_to_factor(0.0), 1.0);
    assert!((semitones_to_factor(12.0) - 2.0).abs() < 1e-6);
    assert!((semitones_to_factor(-24.0) - 0.25).abs() < 1e-6);
    let up = semitones_to_factor(5.0);
    let down = semitones_to_factor(-5.0);
    assert!((up * down - 1.0).abs() < 1e-6);
}

#[test]
fn ramp_between_two_points() {
    let env = Envelope::new(vec![BendPoint::new(10, -12.0), BendPoint::new(20, 12.0)]).unwrap();
    assert_eq!(env.value_at(0), -12.0);
    assert_eq!(env.value_at(10), -12.0);
    assert_eq!(env.value_at(15), 0.0);
    assert_eq!(env.value_at(20), 12.0);
    assert_eq!(env.value_at(1_000), 12.0);
    assert!((env.factor_at(15) - 1.0).abs() < 1e-6);
    assert!((env.factor_at(20) - 2.0).abs() < 1e-6);
}

#[test]
fn frame_values_cover_every_frame() {
    let env = Envelope::new(vec![
        BendPoint::new(0, 0.0),
        BendPoint::new(4, 2.0),
        BendPoint::new(5, -1.0),
    ])
    .unwrap();
    assert_eq!(env.frame_values(7), vec![0.0, 0.5, 1.0, 1.5, 2.0, -1.0, -1.0]);
    assert!(env.frame_values(0).is_empty());
}

#[test]
fn constant_envelope_is_flat() {
    let env = Envelope::constant(3.0);
    assert_eq!(env.points(), &[BendPoint::new(0, 3.0)]);
    assert!(env.frame_values(50).iter().all(|&v| v == 3.0));
}

#[test]
fn bypass_only_when_all_points_are_zero() {
    assert!(Envelope::constant(0.0).is_bypass());
    let flat_zero =
        Envelope::new(vec![BendPoint::new(0, 0.0), BendPoint::new(8, 0.0)]).unwrap();
    assert!(flat_zero.is_bypass());
    let bend = Envelope::new(vec![BendPoint::new(0, 0.0), BendPoint::new(8, 0.1)]).unwrap();
    assert!(!bend.is_bypass());
}

#[test]
fn validation_errors() {
    assert_eq!(Envelope::new(Vec::new()), Err(EnvelopeError::Empty));
    assert_eq!(
        Envelope::new(vec![BendPoint::new(0, f32::INFINITY)]),
        Err(EnvelopeError::NonFiniteSemitones { index: 0 })
    );
    assert_eq!(
        Envelope::new(vec![
            BendPoint::new(0, 0.0),
            BendPoint::new(5, 1.0),
            BendPoint::new(3, 2.0),
        ]),
        Err(EnvelopeError::UnorderedPoints { index: 2 })
    );
    let msg = EnvelopeError::UnorderedPoints { index: 2 }.to_string();
    assert!(msg.contains("breakpoint 2"));
}
