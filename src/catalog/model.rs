use std::collections::HashSet;

use crate::{
    foundation::core::{FrameIndex, FrameSpan, Rgba8Premul},
    foundation::error::{ScrollError, ScrollResult},
};

/// First frame used when a record omits `startFrame`.
pub const DEFAULT_START_FRAME: u32 = 1;

/// Product family, pass-through for presentation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Chewy candy.
    #[default]
    Candy,
    /// Post-meal mouth freshener.
    MouthFreshener,
}

/// Horizontal placement of an overlay section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// Flush left.
    Left,
    /// Centred.
    #[default]
    Center,
    /// Flush right.
    Right,
}

/// One caption block shown while progress is inside `[start, end]`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSection {
    /// Headline.
    pub title: String,
    /// Supporting line.
    pub subtitle: String,
    /// Optional large call-out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_text: Option<String>,
    /// Progress where the section starts fading in.
    pub start: f64,
    /// Progress where the section has fully faded out.
    pub end: f64,
    /// Horizontal placement.
    #[serde(default)]
    pub align: Align,
}

/// Two-stop background gradient, top-left to bottom-right.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Gradient {
    /// Hex colour at the top-left corner.
    pub from: String,
    /// Hex colour at the bottom-right corner.
    pub to: String,
}

/// Resolved presentation colours handed to the compositor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    /// Accent colour.
    pub accent: Rgba8Premul,
    /// Gradient start.
    pub gradient_from: Rgba8Premul,
    /// Gradient end.
    pub gradient_to: Rgba8Premul,
}

impl Default for Theme {
    fn default() -> Self {
        let neutral = Rgba8Premul::opaque(0xf3, 0xf4, 0xf6);
        Self {
            accent: neutral,
            gradient_from: neutral,
            gradient_to: neutral,
        }
    }
}

/// Immutable catalogue entry describing one product and its frame sequence.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Unique key.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Tagline.
    #[serde(default)]
    pub sub_name: String,
    /// Large hero call-out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_headline: Option<String>,
    /// Product family.
    #[serde(default)]
    pub category: Category,
    /// Display price, opaque to the player.
    #[serde(default)]
    pub price: String,
    /// Base path of the per-frame assets.
    #[serde(alias = "folderPath")]
    pub image_sequence_location: String,
    /// Total frames in the sequence.
    pub frame_count: u32,
    /// First meaningful frame; earlier frames are intro material.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_frame: Option<u32>,
    /// Accent colour, `#rrggbb`.
    pub theme_color: String,
    /// Background gradient.
    pub gradient: Gradient,
    /// Caption sections in display order.
    #[serde(default)]
    pub text_timeline: Vec<TextSection>,
}

impl ProductRecord {
    /// First playable frame.
    pub fn start_frame(&self) -> FrameIndex {
        FrameIndex(self.start_frame.unwrap_or(DEFAULT_START_FRAME))
    }

    /// Last playable frame.
    pub fn end_frame(&self) -> FrameIndex {
        FrameIndex(self.frame_count)
    }

    /// Playable range `[start_frame, frame_count]`.
    pub fn span(&self) -> ScrollResult<FrameSpan> {
        FrameSpan::new(self.start_frame(), self.end_frame()).map_err(|_| {
            ScrollError::validation(format!(
                "product '{}': startFrame {} exceeds frameCount {}",
                self.id,
                self.start_frame(),
                self.frame_count
            ))
        })
    }

    /// Parse the colour fields.
    pub fn theme(&self) -> ScrollResult<Theme> {
        Ok(Theme {
            accent: Rgba8Premul::from_hex(&self.theme_color)?,
            gradient_from: Rgba8Premul::from_hex(&self.gradient.from)?,
            gradient_to: Rgba8Premul::from_hex(&self.gradient.to)?,
        })
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> ScrollResult<()> {
        if self.id.trim().is_empty() {
            return Err(ScrollError::validation("product id must be non-empty"));
        }
        if self.frame_count == 0 {
            return Err(ScrollError::validation(format!(
                "product '{}': frameCount must be >= 1",
                self.id
            )));
        }
        if self.image_sequence_location.trim().is_empty() {
            return Err(ScrollError::validation(format!(
                "product '{}': imageSequenceLocation must be non-empty",
                self.id
            )));
        }
        self.span()?;
        self.theme()
            .map_err(|e| ScrollError::validation(format!("product '{}': {e}", self.id)))?;
        for (i, s) in self.text_timeline.iter().enumerate() {
            let ok = s.start.is_finite()
                && s.end.is_finite()
                && 0.0 <= s.start
                && s.start < s.end
                && s.end <= 1.0;
            if !ok {
                return Err(ScrollError::validation(format!(
                    "product '{}': text section {i} needs 0 <= start < end <= 1 (got {}..{})",
                    self.id, s.start, s.end
                )));
            }
        }
        Ok(())
    }
}

pub(crate) fn ensure_unique_ids(records: &[ProductRecord]) -> ScrollResult<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for r in records {
        if !seen.insert(r.id.as_str()) {
            return Err(ScrollError::validation(format!(
                "duplicate product id '{}'",
                r.id
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/model.rs"]
mod tests;
