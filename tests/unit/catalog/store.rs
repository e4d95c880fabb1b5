use super::*;

fn product(id: &str, frames: u32) -> String {
    format!(
        r##"{{
            "id": "{id}",
            "imageSequenceLocation": "/images/{id}/",
            "frameCount": {frames},
            "themeColor": "#f97316",
            "gradient": {{ "from": "#fb923c", "to": "#ef4444" }}
        }}"##
    )
}

#[test]
fn frame_uri_joins_location_index_and_extension() {
    assert_eq!(
        frame_uri("/images/orange-blast/", FrameIndex(12), FrameFormat::Jpg),
        "/images/orange-blast/12.jpg"
    );
    assert_eq!(
        frame_uri("seq", FrameIndex(1), FrameFormat::Webp),
        "seq/1.webp"
    );
}

#[test]
fn preferred_format_follows_host_support() {
    assert_eq!(FrameFormat::preferred(true), FrameFormat::Webp);
    assert_eq!(FrameFormat::preferred(false), FrameFormat::Jpg);
}

#[test]
fn parses_bare_and_wrapped_documents() {
    let bare = format!("[{}, {}]", product("a", 10), product("b", 20));
    let c = Catalogue::from_json_str(&bare).unwrap();
    assert_eq!(c.len(), 2);
    assert_eq!(c.by_id("b").unwrap().frame_count, 20);

    let wrapped = format!("{{ \"products\": [{}] }}", product("a", 10));
    let c = Catalogue::from_json_str(&wrapped).unwrap();
    assert_eq!(c.index_of("a"), Some(0));
}

#[test]
fn navigation_wraps_both_ways() {
    let doc = format!(
        "[{}, {}, {}]",
        product("a", 1),
        product("b", 1),
        product("c", 1)
    );
    let c = Catalogue::from_json_str(&doc).unwrap();
    assert_eq!(c.next_index(2), 0);
    assert_eq!(c.next_index(0), 1);
    assert_eq!(c.prev_index(0), 2);
    assert_eq!(c.prev_index(1), 0);
}

#[test]
fn rejects_empty_duplicate_and_out_of_range() {
    assert!(Catalogue::from_json_str("[]").is_err());
    let dup = format!("[{}, {}]", product("a", 1), product("a", 2));
    assert!(Catalogue::from_json_str(&dup).is_err());

    let c = Catalogue::from_json_str(&format!("[{}]", product("a", 1))).unwrap();
    assert!(c.get(1).is_err());
    assert!(c.by_id("zzz").is_err());
}
