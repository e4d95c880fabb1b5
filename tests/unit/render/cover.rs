use super::*;
use crate::foundation::core::Rgba8Premul;

fn image_from(width: u32, height: u32, px: &[[u8; 4]]) -> PreparedImage {
    PreparedImage::from_premul(width, height, px.concat()).unwrap()
}

#[test]
fn wide_image_is_cropped_horizontally() {
    let fit = cover_fit(Size::new(200.0, 100.0), Size::new(100.0, 100.0)).unwrap();
    assert_eq!(fit.scale, 1.0);
    assert_eq!(fit.src, Rect::new(50.0, 0.0, 150.0, 100.0));
}

#[test]
fn tall_image_is_cropped_vertically_and_scaled_up() {
    let fit = cover_fit(Size::new(100.0, 400.0), Size::new(400.0, 800.0)).unwrap();
    assert_eq!(fit.scale, 4.0);
    assert_eq!(fit.src, Rect::new(0.0, 100.0, 100.0, 300.0));
}

#[test]
fn empty_sizes_have_no_fit() {
    assert!(cover_fit(Size::ZERO, Size::new(10.0, 10.0)).is_none());
    assert!(cover_fit(Size::new(10.0, 10.0), Size::new(0.0, 10.0)).is_none());
}

#[test]
fn same_size_draw_copies_pixels() {
    let px = [[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255], [9, 9, 9, 255]];
    let img = image_from(2, 2, &px);
    let mut s = Surface::new(Size::new(2.0, 2.0), 1.0).unwrap();
    assert!(draw_cover(&mut s, &img));
    assert_eq!(s.pixel(0, 0), Some(px[0]));
    assert_eq!(s.pixel(1, 0), Some(px[1]));
    assert_eq!(s.pixel(0, 1), Some(px[2]));
    assert_eq!(s.pixel(1, 1), Some(px[3]));
}

#[test]
fn crop_keeps_the_centre() {
    let img = image_from(3, 1, &[[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255]]);
    let mut s = Surface::new(Size::new(1.0, 1.0), 1.0).unwrap();
    s.fill(Rgba8Premul::opaque(1, 2, 3));
    assert!(draw_cover(&mut s, &img));
    assert_eq!(s.pixel(0, 0), Some([0, 255, 0, 255]));
}

#[test]
fn empty_surface_draws_nothing() {
    let img = image_from(1, 1, &[[1, 1, 1, 255]]);
    let mut s = Surface::new(Size::new(0.0, 0.0), 1.0).unwrap();
    assert!(!draw_cover(&mut s, &img));
}
