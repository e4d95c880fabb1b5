use std::path::Path;

use anyhow::Context;

use crate::{
    catalog::model::Theme,
    catalog::store::FrameFormat,
    foundation::core::Rgba8Premul,
    foundation::error::{ScrollError, ScrollResult},
    render::compositor::Placeholder,
    scroll::tracker::ScrollOffsets,
};

/// Default neighbour radius of the lazy prefetch window.
pub const DEFAULT_PREFETCH_RADIUS: u32 = 6;
/// Default grid step of the progressive preload.
pub const DEFAULT_PROGRESSIVE_STRIDE: u32 = 5;
/// Default scroll region height, in viewport heights.
pub const DEFAULT_REGION_VIEWPORTS: f64 = 5.0;

/// Which frames a session asks for beyond the one on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PrefetchPolicy {
    /// On every frame change: the current frame, then `f+1, f-1, ...` out to `radius`.
    Window { radius: u32 },
    /// Once per session: every `stride`-th frame, then the gaps. The current frame is
    /// still requested on every change.
    Progressive { stride: u32 },
}

impl Default for PrefetchPolicy {
    fn default() -> Self {
        Self::Window {
            radius: DEFAULT_PREFETCH_RADIUS,
        }
    }
}

/// Player settings, loadable from JSON. Every field has a default.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerConfig {
    pub prefetch: PrefetchPolicy,
    pub frame_format: FrameFormat,
    pub device_pixel_ratio: f64,
    pub offsets: ScrollOffsets,
    /// Height of the scroll region in viewport heights.
    pub region_viewports: f64,
    /// Flat placeholder colour; the product's gradient when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Surface clear colour behind letterboxed or translucent frames.
    pub clear: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            prefetch: PrefetchPolicy::default(),
            frame_format: FrameFormat::Jpg,
            device_pixel_ratio: 1.0,
            offsets: ScrollOffsets::player(),
            region_viewports: DEFAULT_REGION_VIEWPORTS,
            placeholder: None,
            clear: "#00000000".to_string(),
        }
    }
}

impl PlayerConfig {
    pub fn from_json_str(s: &str) -> ScrollResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> ScrollResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read player config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> ScrollResult<()> {
        if !self.device_pixel_ratio.is_finite() || self.device_pixel_ratio <= 0.0 {
            return Err(ScrollError::validation(format!(
                "device_pixel_ratio must be finite and > 0, got {}",
                self.device_pixel_ratio
            )));
        }
        if !self.region_viewports.is_finite() || self.region_viewports <= 0.0 {
            return Err(ScrollError::validation(format!(
                "region_viewports must be finite and > 0, got {}",
                self.region_viewports
            )));
        }
        if let PrefetchPolicy::Progressive { stride: 0 } = self.prefetch {
            return Err(ScrollError::validation("progressive stride must be >= 1"));
        }
        self.clear_color()?;
        if let Some(p) = &self.placeholder {
            Rgba8Premul::from_hex(p)?;
        }
        Ok(())
    }

    pub fn clear_color(&self) -> ScrollResult<Rgba8Premul> {
        Rgba8Premul::from_hex(&self.clear)
    }

    /// Placeholder for a product with `theme`.
    pub fn placeholder_for(&self, theme: &Theme) -> ScrollResult<Placeholder> {
        match &self.placeholder {
            Some(hex) => Ok(Placeholder::Solid(Rgba8Premul::from_hex(hex)?)),
            None => Ok(Placeholder::from_theme(theme)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/player/config.rs"]
mod tests;
