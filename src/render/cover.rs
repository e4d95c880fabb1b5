use crate::{
    assets::decode::PreparedImage,
    foundation::core::{Rect, Size},
    render::composite::{bilerp, over},
    render::surface::Surface,
};

/// Placement of an image that fills a destination while preserving aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverFit {
    /// Visible region of the source image, in image pixels.
    pub src: Rect,
    /// Destination pixels per source pixel.
    pub scale: f64,
}

/// Cover-fit `image` into `dest`, centred on both axes. `None` if either size is empty.
pub fn cover_fit(image: Size, dest: Size) -> Option<CoverFit> {
    if image.is_zero_area() || dest.is_zero_area() || !image.is_finite() || !dest.is_finite() {
        return None;
    }
    let scale = (dest.width / image.width).max(dest.height / image.height);
    let visible = Size::new(dest.width / scale, dest.height / scale);
    let x0 = (image.width - visible.width) / 2.0;
    let y0 = (image.height - visible.height) / 2.0;
    Some(CoverFit {
        src: Rect::from_origin_size((x0, y0), visible),
        scale,
    })
}

/// Draw `image` over the whole surface with cover fit and bilinear sampling.
/// Returns `false` when nothing could be drawn.
pub fn draw_cover(surface: &mut Surface, image: &PreparedImage) -> bool {
    let (dw, dh) = surface.pixel_size();
    let img_size = Size::new(f64::from(image.width), f64::from(image.height));
    let Some(fit) = cover_fit(img_size, Size::new(f64::from(dw), f64::from(dh))) else {
        return false;
    };

    let max_x = f64::from(image.width - 1);
    let max_y = f64::from(image.height - 1);
    let inv = 1.0 / fit.scale;

    let row_len = (dw as usize) * 4;
    for (y, row) in surface.data_mut().chunks_exact_mut(row_len).enumerate() {
        let sy = (fit.src.y0 + (y as f64 + 0.5) * inv - 0.5).clamp(0.0, max_y);
        let y0 = sy.floor();
        let fy = sy - y0;
        let y0 = y0 as u32;
        let y1 = (y0 + 1).min(image.height - 1);

        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let sx = (fit.src.x0 + (x as f64 + 0.5) * inv - 0.5).clamp(0.0, max_x);
            let x0 = sx.floor();
            let fx = sx - x0;
            let x0 = x0 as u32;
            let x1 = (x0 + 1).min(image.width - 1);

            let texel = bilerp(
                image.px(x0, y0),
                image.px(x1, y0),
                image.px(x0, y1),
                image.px(x1, y1),
                fx,
                fy,
            );
            let out = over([px[0], px[1], px[2], px[3]], texel, 1.0);
            px.copy_from_slice(&out);
        }
    }
    true
}

#[cfg(test)]
#[path = "../../tests/unit/render/cover.rs"]
mod tests;
