use super::*;

fn selector(first: u32, last: u32) -> FrameSelector {
    FrameSelector::new(FrameSpan::new(FrameIndex(first), FrameIndex(last)).unwrap())
}

#[test]
fn midpoint_of_zero_based_sequence() {
    let s = selector(0, 200);
    assert_eq!(s.select(Progress::new(0.5)), FrameIndex(100));
}

#[test]
fn endpoints_map_to_span_bounds() {
    for (first, last) in [(0, 200), (1, 240), (7, 9)] {
        let s = selector(first, last);
        assert_eq!(s.select(Progress::START), FrameIndex(first));
        assert_eq!(s.select(Progress::END), FrameIndex(last));
    }
}

#[test]
fn sweep_stays_in_bounds_and_never_reverses() {
    let s = selector(1, 240);
    let mut prev = s.select(Progress::START);
    for i in 0..=10_000 {
        let f = s.select(Progress::new(f64::from(i) / 10_000.0));
        assert!(s.span().contains(f), "{f:?} out of span");
        assert!(f >= prev, "reversed at step {i}");
        prev = f;
    }
}

#[test]
fn single_frame_span_is_constant() {
    let s = selector(5, 5);
    assert_eq!(s.select(Progress::new(0.3)), FrameIndex(5));
    assert_eq!(s.select(Progress::END), FrameIndex(5));
}

#[test]
fn same_progress_same_frame() {
    let s = selector(0, 199);
    let p = Progress::new(0.123_456);
    assert_eq!(s.select(p), s.select(p));
}
