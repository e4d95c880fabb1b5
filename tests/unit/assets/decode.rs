use std::io::Cursor;

use super::*;

fn encode(img: image::RgbaImage, format: image::ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), format)
        .unwrap();
    buf
}

#[test]
fn decode_png_dimensions_and_premul() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50u8, 200u8, 128u8]).unwrap();
    let prepared = decode_image(&encode(img, image::ImageFormat::Png)).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_jpeg_is_opaque() {
    let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 200, 30, 255]));
    let rgb = image::DynamicImage::ImageRgba8(img).to_rgb8();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(rgb)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
        .unwrap();

    let prepared = decode_image(&buf).unwrap();
    assert_eq!((prepared.width, prepared.height), (4, 2));
    assert!(prepared.rgba8_premul.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn garbage_bytes_fail_to_decode() {
    assert!(decode_image(b"definitely not an image").is_err());
}

#[test]
fn from_premul_checks_length() {
    assert!(PreparedImage::from_premul(2, 2, vec![0; 16]).is_some());
    assert!(PreparedImage::from_premul(2, 2, vec![0; 15]).is_none());
    assert!(PreparedImage::from_premul(0, 2, vec![]).is_none());
}
