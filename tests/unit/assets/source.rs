use super::*;

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "candyscroll_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn normalize_strips_root_and_dots() {
    assert_eq!(
        normalize_uri_path("/images/mango/1.jpg").unwrap(),
        "images/mango/1.jpg"
    );
    assert_eq!(normalize_uri_path("a\\.\\b.png").unwrap(), "a/b.png");
    assert!(normalize_uri_path("/images/../etc/passwd").is_err());
    assert!(normalize_uri_path("/").is_err());
}

#[test]
fn memory_source_matches_equivalent_uris() {
    let mut src = MemorySource::new();
    src.insert("/seq/1.jpg", vec![1, 2, 3]).unwrap();
    assert_eq!(src.fetch("seq/1.jpg").unwrap(), vec![1, 2, 3]);
    assert!(matches!(src.fetch("/seq/2.jpg"), Err(ScrollError::Asset(_))));
    assert_eq!(src.len(), 1);
}

#[test]
fn dir_source_reads_relative_to_root() {
    let tmp = temp_dir("dir_source");
    std::fs::create_dir_all(tmp.join("seq")).unwrap();
    std::fs::write(tmp.join("seq").join("3.jpg"), b"abc").unwrap();

    let src = DirSource::new(&tmp);
    assert_eq!(src.fetch("/seq/3.jpg").unwrap(), b"abc".to_vec());
    assert!(src.fetch("/seq/4.jpg").is_err());

    std::fs::remove_dir_all(&tmp).ok();
}
