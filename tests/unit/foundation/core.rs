use super::*;

#[test]
fn frame_span_contains_boundaries() {
    let s = FrameSpan::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert!(!s.contains(FrameIndex(1)));
    assert!(s.contains(FrameIndex(2)));
    assert!(s.contains(FrameIndex(5)));
    assert!(!s.contains(FrameIndex(6)));
    assert_eq!(s.len_frames(), 4);
}

#[test]
fn frame_span_rejects_inverted_bounds() {
    assert!(FrameSpan::new(FrameIndex(3), FrameIndex(2)).is_err());
}

#[test]
fn frame_span_offset_stays_inside() {
    let s = FrameSpan::new(FrameIndex(1), FrameIndex(10)).unwrap();
    assert_eq!(s.offset(FrameIndex(5), 2), Some(FrameIndex(7)));
    assert_eq!(s.offset(FrameIndex(1), -1), None);
    assert_eq!(s.offset(FrameIndex(10), 1), None);
    assert_eq!(s.offset(FrameIndex(0), -3), None);
}

#[test]
fn progress_clamps_and_maps_nan() {
    assert_eq!(Progress::new(-0.5).get(), 0.0);
    assert_eq!(Progress::new(1.5).get(), 1.0);
    assert_eq!(Progress::new(f64::NAN).get(), 0.0);
    let p: Progress = serde_json::from_str("2.0").unwrap();
    assert_eq!(p, Progress::END);
}

#[test]
fn hex_colours_parse() {
    assert_eq!(
        Rgba8Premul::from_hex("#84cc16").unwrap(),
        Rgba8Premul::opaque(0x84, 0xcc, 0x16)
    );
    let half = Rgba8Premul::from_hex("#ff000080").unwrap();
    assert_eq!(half.a, 0x80);
    assert_eq!(half.r, 128);
    assert!(Rgba8Premul::from_hex("84cc16").is_err());
    assert!(Rgba8Premul::from_hex("#84cc1").is_err());
    assert!(Rgba8Premul::from_hex("#zzzzzz").is_err());
}

#[test]
fn frame_span_clamp_pins_to_bounds() {
    let s = FrameSpan::new(FrameIndex(3), FrameIndex(8)).unwrap();
    assert_eq!(s.clamp(FrameIndex(0)), FrameIndex(3));
    assert_eq!(s.clamp(FrameIndex(5)), FrameIndex(5));
    assert_eq!(s.clamp(FrameIndex(99)), FrameIndex(8));
}
