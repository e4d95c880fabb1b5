use super::*;

fn section(start: f64, end: f64) -> TextSection {
    TextSection {
        title: "t".into(),
        subtitle: "s".into(),
        extra_text: None,
        start,
        end,
        align: Align::Center,
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn section_fades_in_holds_and_fades_out() {
    let tl = TextTimeline::new(vec![section(0.3, 0.5)]).unwrap();
    let at = |p: f64| tl.sample(Progress::new(p))[0];

    let before = at(0.2);
    assert_eq!((before.opacity, before.offset_y), (0.0, RISE_PX));

    let rising = at(0.325);
    assert!(close(rising.opacity, 0.5));
    assert!(close(rising.offset_y, 25.0));

    let plateau = at(0.4);
    assert_eq!((plateau.opacity, plateau.offset_y), (1.0, 0.0));

    let after = at(0.6);
    assert_eq!((after.opacity, after.offset_y), (0.0, -RISE_PX));
}

#[test]
fn narrow_window_still_peaks() {
    let tl = TextTimeline::new(vec![section(0.5, 0.52)]).unwrap();
    let mid = Progress::new((0.5 + 0.52) / 2.0);
    assert!(close(tl.sample(mid)[0].opacity, 1.0));
}

#[test]
fn invalid_windows_are_rejected() {
    assert!(TextTimeline::new(vec![section(0.5, 0.5)]).is_err());
    assert!(TextTimeline::new(vec![section(-0.1, 0.5)]).is_err());
    assert!(TextTimeline::new(vec![section(0.2, 1.5)]).is_err());
}

#[test]
fn default_sections_follow_standard_windows() {
    let copy = (1..=5).map(|i| (format!("title {i}"), format!("sub {i}")));
    let sections = default_sections(copy);
    assert_eq!(sections.len(), 4);
    assert_eq!((sections[1].start, sections[1].end), (0.3, 0.5));
    assert_eq!(sections[1].align, Align::Left);
    assert_eq!(sections[2].align, Align::Right);
}

#[test]
fn product_timeline_starts_with_hero() {
    let product: ProductRecord = serde_json::from_value(serde_json::json!({
        "id": "mango",
        "name": "Mango Chew",
        "subName": "Sun ripened",
        "heroHeadline": "Pure mango",
        "imageSequenceLocation": "/mango",
        "frameCount": 10,
        "themeColor": "#ffaa00",
        "gradient": { "from": "#ffffff", "to": "#ffaa00" },
        "textTimeline": [
            { "title": "A", "subtitle": "a", "start": 0.15, "end": 0.35 }
        ]
    }))
    .unwrap();
    let tl = TextTimeline::for_product(&product).unwrap();

    assert_eq!(tl.len(), 2);
    let hero = tl.section(0).unwrap();
    assert_eq!(hero.title, "Mango Chew");
    assert_eq!(hero.extra_text.as_deref(), Some("Pure mango"));
    assert!(tl.shows_scroll_hint(0));
    assert!(!tl.shows_scroll_hint(1));

    let visible = tl.visible(Progress::new(0.1));
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].index, 0);
    // Hero has faded out by the time the first section has faded in.
    let visible = tl.visible(Progress::new(0.25));
    assert_eq!(visible.iter().map(|s| s.index).collect::<Vec<_>>(), vec![1]);
}
