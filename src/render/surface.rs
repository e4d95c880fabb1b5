use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::core::{Rgba8Premul, Size},
    foundation::error::{ScrollError, ScrollResult},
    foundation::math::{lerp_u8, unpremultiply_rgba8_in_place},
};

/// Device-pixel size of a host surface: `round(css * dpr)` per axis.
pub fn device_pixel_size(css: Size, device_pixel_ratio: f64) -> ScrollResult<(u32, u32)> {
    if !device_pixel_ratio.is_finite() || device_pixel_ratio <= 0.0 {
        return Err(ScrollError::validation(format!(
            "device pixel ratio must be finite and > 0, got {device_pixel_ratio}"
        )));
    }
    let axis = |v: f64, name: &str| -> ScrollResult<u32> {
        if !v.is_finite() || v < 0.0 {
            return Err(ScrollError::validation(format!(
                "surface {name} must be finite and >= 0, got {v}"
            )));
        }
        let px = (v * device_pixel_ratio).round();
        if px > f64::from(u16::MAX) {
            return Err(ScrollError::validation(format!(
                "surface {name} of {px}px exceeds {}",
                u16::MAX
            )));
        }
        Ok(px as u32)
    };
    Ok((axis(css.width, "width")?, axis(css.height, "height")?))
}

/// Premultiplied RGBA8 drawing target sized in CSS pixels times a device pixel ratio.
#[derive(Clone, Debug)]
pub struct Surface {
    css: Size,
    dpr: f64,
    width: u32,
    height: u32,
    data: Vec<u8>,
    generation: u64,
}

impl Surface {
    pub fn new(css: Size, device_pixel_ratio: f64) -> ScrollResult<Self> {
        let (width, height) = device_pixel_size(css, device_pixel_ratio)?;
        Ok(Self {
            css,
            dpr: device_pixel_ratio,
            width,
            height,
            data: vec![0; buffer_len(width, height)],
            generation: 0,
        })
    }

    /// Match the host size. Returns `true` when the pixel size changed; pixels are then cleared.
    pub fn resize(&mut self, css: Size, device_pixel_ratio: f64) -> ScrollResult<bool> {
        let (width, height) = device_pixel_size(css, device_pixel_ratio)?;
        self.css = css;
        self.dpr = device_pixel_ratio;
        if (width, height) == (self.width, self.height) {
            return Ok(false);
        }
        tracing::debug!(
            from_w = self.width,
            from_h = self.height,
            to_w = width,
            to_h = height,
            "surface resized"
        );
        self.width = width;
        self.height = height;
        self.data = vec![0; buffer_len(width, height)];
        self.generation += 1;
        Ok(true)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Bumped whenever the buffer is reallocated and its pixels are lost.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn css_size(&self) -> Size {
        self.css
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.dpr
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Raw premultiplied bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    pub fn fill(&mut self, color: Rgba8Premul) {
        let px = color.to_array();
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    /// Linear gradient from the top-left corner to the bottom-right corner.
    pub fn fill_diagonal_gradient(&mut self, from: Rgba8Premul, to: Rgba8Premul) {
        let (w, h) = (self.width as usize, self.height as usize);
        if w == 0 {
            return;
        }
        let (from, to) = (from.to_array(), to.to_array());
        let axis = |i: usize, n: usize| if n <= 1 { 0.0 } else { i as f64 / (n - 1) as f64 };
        for (y, row) in self.data.chunks_exact_mut(w * 4).enumerate() {
            let ty = axis(y, h);
            for (x, chunk) in row.chunks_exact_mut(4).enumerate() {
                let t = (axis(x, w) + ty) / 2.0;
                let px: [u8; 4] = std::array::from_fn(|i| lerp_u8(from[i], to[i], t));
                chunk.copy_from_slice(&px);
            }
        }
    }

    /// Straight-alpha copy of the pixels.
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }

    /// Write the surface as a straight-alpha PNG.
    pub fn write_png(&self, path: &Path) -> ScrollResult<()> {
        if self.is_empty() {
            return Err(ScrollError::render("cannot export an empty surface"));
        }
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output directory '{}'", parent.display()))?;
        }
        image::save_buffer_with_format(
            path,
            &self.to_straight_rgba(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

fn buffer_len(width: u32, height: u32) -> usize {
    (width as usize) * (height as usize) * 4
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
