use crate::foundation::math::mul_div255_u8;

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over with an extra opacity multiplier, premultiplied in and out.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }
    if opacity >= 1.0 && src[3] == 255 {
        return src;
    }

    let op = (opacity * 255.0).round() as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }
    let inv = 255 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Bilinear mix of four premultiplied texels; `fx`, `fy` in `[0, 1]`.
pub(crate) fn bilerp(
    p00: PremulRgba8,
    p10: PremulRgba8,
    p01: PremulRgba8,
    p11: PremulRgba8,
    fx: f64,
    fy: f64,
) -> PremulRgba8 {
    let mut out = [0u8; 4];
    for i in 0..4 {
        let top = f64::from(p00[i]) + (f64::from(p10[i]) - f64::from(p00[i])) * fx;
        let bot = f64::from(p01[i]) + (f64::from(p11[i]) - f64::from(p01[i])) * fx;
        out[i] = (top + (bot - top) * fy).round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
