use super::*;

#[test]
fn empty_object_gives_defaults() {
    let cfg = PlayerConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, PlayerConfig::default());
    assert_eq!(cfg.prefetch, PrefetchPolicy::Window { radius: 6 });
    assert_eq!(cfg.offsets, ScrollOffsets::player());
    assert_eq!(cfg.clear_color().unwrap(), Rgba8Premul::transparent());
}

#[test]
fn full_document_parses() {
    let cfg = PlayerConfig::from_json_str(
        r##"{
            "prefetch": { "kind": "progressive", "stride": 5 },
            "frame_format": "webp",
            "device_pixel_ratio": 2.0,
            "offsets": ["start start", "end end"],
            "region_viewports": 4,
            "placeholder": "#112233",
            "clear": "#000000"
        }"##,
    )
    .unwrap();
    assert_eq!(cfg.prefetch, PrefetchPolicy::Progressive { stride: 5 });
    assert_eq!(cfg.frame_format, FrameFormat::Webp);
    assert_eq!(cfg.offsets, ScrollOffsets::contained());
    assert_eq!(
        cfg.placeholder_for(&Theme::default()).unwrap(),
        Placeholder::Solid(Rgba8Premul::opaque(0x11, 0x22, 0x33))
    );
}

#[test]
fn theme_gradient_is_the_default_placeholder() {
    let theme = Theme {
        accent: Rgba8Premul::opaque(1, 1, 1),
        gradient_from: Rgba8Premul::opaque(2, 2, 2),
        gradient_to: Rgba8Premul::opaque(3, 3, 3),
    };
    assert_eq!(
        PlayerConfig::default().placeholder_for(&theme).unwrap(),
        Placeholder::Gradient {
            from: theme.gradient_from,
            to: theme.gradient_to,
        }
    );
}

#[test]
fn invalid_values_are_rejected() {
    for doc in [
        r#"{"device_pixel_ratio": 0}"#,
        r#"{"region_viewports": -1}"#,
        r#"{"prefetch": {"kind": "progressive", "stride": 0}}"#,
        r#"{"clear": "black"}"#,
        r##"{"placeholder": "#12"}"##,
        r#"{"offsets": ["start", "middle"]}"#,
        r#"{"unknown": true}"#,
    ] {
        assert!(PlayerConfig::from_json_str(doc).is_err(), "{doc}");
    }
}
