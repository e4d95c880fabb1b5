use std::io::Cursor;

use super::*;
use crate::assets::{
    scheduler::{InlineScheduler, ManualScheduler},
    source::MemorySource,
};

fn png(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn source(frames: std::ops::RangeInclusive<u32>) -> Arc<MemorySource> {
    let mut src = MemorySource::new();
    for f in frames {
        src.insert(&format!("/seq/{f}.jpg"), png(2, 2, [f as u8, 0, 0, 255]))
            .unwrap();
    }
    Arc::new(src)
}

fn span(first: u32, last: u32) -> FrameSpan {
    FrameSpan::new(FrameIndex(first), FrameIndex(last)).unwrap()
}

fn cache_with(
    scheduler: Arc<dyn LoadScheduler>,
    src: Arc<MemorySource>,
    first: u32,
    last: u32,
) -> FrameCache {
    FrameCache::new(
        SessionId::next(),
        "/seq",
        FrameFormat::Jpg,
        span(first, last),
        src,
        scheduler,
    )
}

#[test]
fn pending_request_is_not_dispatched_twice() {
    let sched = ManualScheduler::new();
    let mut cache = cache_with(Arc::new(sched.clone()), source(1..=10), 1, 10);

    assert_eq!(cache.request(FrameIndex(3)), RequestOutcome::Dispatched);
    assert_eq!(cache.request(FrameIndex(3)), RequestOutcome::AlreadyPending);
    assert_eq!(sched.pending(), 1);
    assert_eq!(cache.stats().dispatched, 1);
    assert!(matches!(
        cache.state(FrameIndex(3)),
        Some(EntryState::Pending)
    ));
}

#[test]
fn completed_load_becomes_drawable_after_drain() {
    let mut cache = cache_with(Arc::new(InlineScheduler), source(1..=10), 1, 10);
    cache.request(FrameIndex(4));
    assert!(cache.image(FrameIndex(4)).is_none());

    assert_eq!(cache.drain_completions(), 1);
    let img = cache.image(FrameIndex(4)).unwrap();
    assert_eq!((img.width, img.height), (2, 2));
    assert_eq!(img.px(0, 0), [4, 0, 0, 255]);
    assert_eq!(cache.request(FrameIndex(4)), RequestOutcome::AlreadyLoaded);
}

#[test]
fn failed_load_is_terminal() {
    let mut cache = cache_with(Arc::new(InlineScheduler), source(1..=2), 1, 10);
    cache.request(FrameIndex(9));
    cache.drain_completions();

    assert!(matches!(
        cache.state(FrameIndex(9)),
        Some(EntryState::Failed(_))
    ));
    assert_eq!(cache.request(FrameIndex(9)), RequestOutcome::AlreadyFailed);
    assert_eq!(cache.stats().failed, 1);
}

#[test]
fn out_of_span_requests_are_dropped() {
    let mut cache = cache_with(Arc::new(InlineScheduler), source(1..=10), 1, 10);
    assert_eq!(cache.request(FrameIndex(0)), RequestOutcome::OutOfRange);
    assert_eq!(cache.request(FrameIndex(11)), RequestOutcome::OutOfRange);
    assert!(cache.is_empty());
}

#[test]
fn window_is_nearest_first_and_clipped() {
    let s = span(1, 10);
    assert_eq!(
        window_order(s, FrameIndex(5), 2).as_slice(),
        &[5, 6, 4, 7, 3].map(FrameIndex)
    );
    assert_eq!(
        window_order(s, FrameIndex(1), 2).as_slice(),
        &[1, 2, 3].map(FrameIndex)
    );
    assert_eq!(
        window_order(s, FrameIndex(10), 0).as_slice(),
        &[FrameIndex(10)]
    );
}

#[test]
fn prefetch_window_skips_known_frames() {
    let sched = ManualScheduler::new();
    let mut cache = cache_with(Arc::new(sched.clone()), source(1..=10), 1, 10);
    assert_eq!(cache.prefetch_window(FrameIndex(5), 2), 5);
    assert_eq!(cache.prefetch_window(FrameIndex(6), 2), 1);
    assert_eq!(sched.pending(), 6);
    assert!(cache.pending() <= 2 * 2 + 2);
}

#[test]
fn progressive_order_is_coarse_then_fine() {
    assert_eq!(
        progressive_order(span(1, 7), 3),
        [1, 4, 7, 2, 3, 5, 6].map(FrameIndex).to_vec()
    );
    assert_eq!(progressive_order(span(0, 2), 0).len(), 3);
}

#[test]
fn completion_from_another_session_is_discarded() {
    let sched = ManualScheduler::new();
    let mut cache = cache_with(Arc::new(sched), source(1..=10), 1, 10);
    cache.request(FrameIndex(2));

    let img = decode_image(&png(1, 1, [9, 9, 9, 255])).unwrap();
    let outcome = cache.apply(LoadCompletion {
        session: SessionId::next(),
        frame: FrameIndex(2),
        result: Ok(img),
    });

    assert_eq!(outcome, ApplyOutcome::Discarded);
    assert!(matches!(
        cache.state(FrameIndex(2)),
        Some(EntryState::Pending)
    ));
    assert_eq!(cache.stats().discarded, 1);
}

#[test]
fn cancelled_cache_ignores_late_loads_and_new_requests() {
    let sched = ManualScheduler::new();
    let mut cache = cache_with(Arc::new(sched.clone()), source(1..=10), 1, 10);
    cache.request(FrameIndex(1));
    cache.cancel();

    assert_eq!(sched.run_pending(), 1);
    assert_eq!(cache.drain_completions(), 0);
    assert!(cache.image(FrameIndex(1)).is_none());
    assert_eq!(cache.request(FrameIndex(2)), RequestOutcome::Cancelled);
}
