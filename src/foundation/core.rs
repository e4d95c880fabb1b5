use crate::foundation::error::{ScrollError, ScrollResult};

pub use kurbo::{Rect, Size};

/// Index of one still image in a product's frame sequence.
///
/// Frame numbering follows the asset layout on disk: `{location}/{index}.{ext}`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u32);

impl std::fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed frame range `[first, last]` that playback is allowed to visit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameSpan {
    /// First playable frame (inclusive).
    pub first: FrameIndex,
    /// Last playable frame (inclusive).
    pub last: FrameIndex,
}

impl FrameSpan {
    /// Create a validated span with `first <= last`.
    pub fn new(first: FrameIndex, last: FrameIndex) -> ScrollResult<Self> {
        if first.0 > last.0 {
            return Err(ScrollError::validation(format!(
                "frame span first ({first}) must be <= last ({last})"
            )));
        }
        Ok(Self { first, last })
    }

    /// Number of frames contained in the span.
    pub fn len_frames(self) -> u32 {
        self.last.0 - self.first.0 + 1
    }

    /// Return `true` when `f` lies inside `[first, last]`.
    pub fn contains(self, f: FrameIndex) -> bool {
        self.first.0 <= f.0 && f.0 <= self.last.0
    }

    /// Clamp a frame index into this span.
    pub fn clamp(self, f: FrameIndex) -> FrameIndex {
        FrameIndex(f.0.clamp(self.first.0, self.last.0))
    }

    /// Signed offset from `f`, or `None` when the result leaves the span.
    pub fn offset(self, f: FrameIndex, delta: i64) -> Option<FrameIndex> {
        let v = i64::from(f.0).checked_add(delta)?;
        let v = u32::try_from(v).ok()?;
        let out = FrameIndex(v);
        self.contains(out).then_some(out)
    }

    /// Iterate every frame of the span in ascending order.
    pub fn iter(self) -> impl Iterator<Item = FrameIndex> {
        (self.first.0..=self.last.0).map(FrameIndex)
    }
}

/// Normalized scroll completion in `[0, 1]`.
///
/// Construction clamps; NaN maps to `0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize)]
pub struct Progress(f64);

impl Progress {
    /// Region not yet entered.
    pub const START: Self = Self(0.0);
    /// Region fully scrolled past.
    pub const END: Self = Self(1.0);

    /// Clamp `v` into `[0, 1]`.
    pub fn new(v: f64) -> Self {
        if v.is_nan() {
            return Self::START;
        }
        Self(v.clamp(0.0, 1.0))
    }

    /// Raw value.
    pub fn get(self) -> f64 {
        self.0
    }
}

impl<'de> serde::Deserialize<'de> for Progress {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let v = f64::deserialize(d)?;
        Ok(Self::new(v))
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Opaque colour from straight channels.
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (straight alpha).
    pub fn from_hex(s: &str) -> ScrollResult<Self> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| ScrollError::validation(format!("colour '{s}' must start with '#'")))?;
        let channel = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|c| u8::from_str_radix(c, 16).ok())
                .ok_or_else(|| ScrollError::validation(format!("invalid hex colour '{s}'")))
        };
        match hex.len() {
            6 => Ok(Self::opaque(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Self::from_straight_rgba(
                channel(0)?,
                channel(2)?,
                channel(4)?,
                channel(6)?,
            )),
            _ => Err(ScrollError::validation(format!(
                "hex colour '{s}' must have 6 or 8 digits"
            ))),
        }
    }

    /// Channels as a byte quad.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
