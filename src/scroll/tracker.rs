//! Scroll position to normalized progress over a tall region.
//!
//! Offsets follow the `"<target> <viewport>"` notation used by scroll-linked animation
//! libraries: `"start end"` means "when the top of the region meets the bottom of the viewport".

use std::str::FromStr;

use crate::{
    foundation::core::Progress,
    foundation::error::{ScrollError, ScrollResult},
    scroll::signal::ProgressSignal,
};

/// A point along an element, as a fraction of its extent or a pixel distance from its top.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
    /// `0` is the top edge, `1` the bottom edge.
    Fraction(f64),
    /// Pixels from the top edge.
    Px(f64),
}

impl Anchor {
    fn resolve(self, extent: f64) -> f64 {
        match self {
            Self::Fraction(f) => f * extent,
            Self::Px(px) => px,
        }
    }
}

impl FromStr for Anchor {
    type Err = ScrollError;

    fn from_str(s: &str) -> ScrollResult<Self> {
        let bad = || ScrollError::validation(format!("invalid scroll anchor '{s}'"));
        let out = match s {
            "start" => Self::Fraction(0.0),
            "center" => Self::Fraction(0.5),
            "end" => Self::Fraction(1.0),
            _ => {
                if let Some(px) = s.strip_suffix("px") {
                    Self::Px(px.parse().map_err(|_| bad())?)
                } else if let Some(pct) = s.strip_suffix('%') {
                    Self::Fraction(pct.parse::<f64>().map_err(|_| bad())? / 100.0)
                } else {
                    Self::Fraction(s.parse().map_err(|_| bad())?)
                }
            }
        };
        match out {
            Self::Fraction(v) | Self::Px(v) if !v.is_finite() => Err(bad()),
            _ => Ok(out),
        }
    }
}

impl std::fmt::Display for Anchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Fraction(v) if v == 0.0 => write!(f, "start"),
            Self::Fraction(v) if v == 0.5 => write!(f, "center"),
            Self::Fraction(v) if v == 1.0 => write!(f, "end"),
            Self::Fraction(v) => write!(f, "{v}"),
            Self::Px(v) => write!(f, "{v}px"),
        }
    }
}

/// The moment a point of the region lines up with a point of the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollEdge {
    /// Point on the tracked region.
    pub target: Anchor,
    /// Point on the viewport.
    pub viewport: Anchor,
}

impl FromStr for ScrollEdge {
    type Err = ScrollError;

    /// `"start end"`, or a single anchor applied to both sides.
    fn from_str(s: &str) -> ScrollResult<Self> {
        let mut parts = s.split_whitespace();
        let first = parts
            .next()
            .ok_or_else(|| ScrollError::validation("scroll edge must be non-empty"))?;
        let target: Anchor = first.parse()?;
        let viewport = match parts.next() {
            Some(v) => v.parse()?,
            None => target,
        };
        if parts.next().is_some() {
            return Err(ScrollError::validation(format!(
                "scroll edge '{s}' has more than two anchors"
            )));
        }
        Ok(Self { target, viewport })
    }
}

impl std::fmt::Display for ScrollEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.target, self.viewport)
    }
}

/// Start and end edges of the tracked scroll range.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "[String; 2]", into = "[String; 2]")]
pub struct ScrollOffsets {
    /// Progress is 0 at and before this edge.
    pub start: ScrollEdge,
    /// Progress is 1 at and after this edge.
    pub end: ScrollEdge,
}

impl ScrollOffsets {
    /// Parse a pair such as `("start 80px", "end end")`.
    pub fn parse(start: &str, end: &str) -> ScrollResult<Self> {
        Ok(Self {
            start: start.parse()?,
            end: end.parse()?,
        })
    }

    /// Pinned player region: from its top sitting under an 80px header to its bottom meeting
    /// the viewport bottom.
    pub fn player() -> Self {
        Self {
            start: ScrollEdge {
                target: Anchor::Fraction(0.0),
                viewport: Anchor::Px(80.0),
            },
            end: ScrollEdge {
                target: Anchor::Fraction(1.0),
                viewport: Anchor::Fraction(1.0),
            },
        }
    }

    /// Whole pass of the region through the viewport (`"start end"` to `"end start"`).
    pub fn passage() -> Self {
        Self {
            start: ScrollEdge {
                target: Anchor::Fraction(0.0),
                viewport: Anchor::Fraction(1.0),
            },
            end: ScrollEdge {
                target: Anchor::Fraction(1.0),
                viewport: Anchor::Fraction(0.0),
            },
        }
    }

    /// Region pinned to the viewport top (`"start start"` to `"end end"`).
    pub fn contained() -> Self {
        Self {
            start: ScrollEdge {
                target: Anchor::Fraction(0.0),
                viewport: Anchor::Fraction(0.0),
            },
            end: ScrollEdge {
                target: Anchor::Fraction(1.0),
                viewport: Anchor::Fraction(1.0),
            },
        }
    }
}

impl Default for ScrollOffsets {
    fn default() -> Self {
        Self::player()
    }
}

impl TryFrom<[String; 2]> for ScrollOffsets {
    type Error = ScrollError;

    fn try_from(v: [String; 2]) -> ScrollResult<Self> {
        Self::parse(&v[0], &v[1])
    }
}

impl From<ScrollOffsets> for [String; 2] {
    fn from(o: ScrollOffsets) -> Self {
        [o.start.to_string(), o.end.to_string()]
    }
}

/// Document-space placement of the tracked region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionGeometry {
    /// Distance from the document top to the region top, in CSS px.
    pub top: f64,
    /// Region height in CSS px.
    pub height: f64,
}

impl RegionGeometry {
    /// Region `viewport_heights` tall (the player region is 5 viewports).
    pub fn viewports(top: f64, viewport_height: f64, viewport_heights: f64) -> Self {
        Self {
            top,
            height: viewport_height * viewport_heights,
        }
    }
}

fn edge_scroll_y(edge: ScrollEdge, region: RegionGeometry, viewport_height: f64) -> f64 {
    region.top + edge.target.resolve(region.height) - edge.viewport.resolve(viewport_height)
}

/// Pure progress computation for one scroll position.
///
/// A zero-length or inverted range yields 0 before the start edge and 1 from it on.
pub fn compute_progress(
    offsets: ScrollOffsets,
    region: RegionGeometry,
    viewport_height: f64,
    scroll_y: f64,
) -> Progress {
    let s0 = edge_scroll_y(offsets.start, region, viewport_height);
    let s1 = edge_scroll_y(offsets.end, region, viewport_height);
    let span = s1 - s0;
    if !span.is_finite() || span <= f64::EPSILON {
        return if scroll_y >= s0 {
            Progress::END
        } else {
            Progress::START
        };
    }
    Progress::new((scroll_y - s0) / span)
}

/// Stateful tracker fed by scroll and resize events; publishes through its [`ProgressSignal`].
#[derive(Debug)]
pub struct ScrollTracker {
    offsets: ScrollOffsets,
    region: RegionGeometry,
    viewport_height: f64,
    scroll_y: f64,
    signal: ProgressSignal,
}

impl ScrollTracker {
    pub fn new(
        offsets: ScrollOffsets,
        region: RegionGeometry,
        viewport_height: f64,
    ) -> ScrollResult<Self> {
        validate_geometry(region, viewport_height)?;
        let initial = compute_progress(offsets, region, viewport_height, 0.0);
        Ok(Self {
            offsets,
            region,
            viewport_height,
            scroll_y: 0.0,
            signal: ProgressSignal::new(initial),
        })
    }

    /// Handle a scroll event. Returns the (possibly unchanged) progress.
    pub fn on_scroll(&mut self, scroll_y: f64) -> Progress {
        if scroll_y.is_finite() {
            self.scroll_y = scroll_y;
        }
        self.publish()
    }

    /// Handle a layout change; invalid geometry is ignored and the last good one is kept.
    pub fn on_resize(&mut self, region: RegionGeometry, viewport_height: f64) -> Progress {
        match validate_geometry(region, viewport_height) {
            Ok(()) => {
                self.region = region;
                self.viewport_height = viewport_height;
            }
            Err(err) => tracing::warn!(%err, "ignoring invalid scroll geometry"),
        }
        self.publish()
    }

    pub fn progress(&self) -> Progress {
        self.signal.get()
    }

    pub fn offsets(&self) -> ScrollOffsets {
        self.offsets
    }

    /// Subscribe/unsubscribe access to the progress stream.
    pub fn signal_mut(&mut self) -> &mut ProgressSignal {
        &mut self.signal
    }

    fn publish(&mut self) -> Progress {
        let p = compute_progress(
            self.offsets,
            self.region,
            self.viewport_height,
            self.scroll_y,
        );
        if self.signal.set(p) {
            tracing::trace!(progress = p.get(), scroll_y = self.scroll_y, "scroll progress");
        }
        p
    }
}

fn validate_geometry(region: RegionGeometry, viewport_height: f64) -> ScrollResult<()> {
    let ok = region.top.is_finite()
        && region.height.is_finite()
        && region.height >= 0.0
        && viewport_height.is_finite()
        && viewport_height > 0.0;
    if ok {
        Ok(())
    } else {
        Err(ScrollError::validation(format!(
            "invalid scroll geometry: region {region:?}, viewport height {viewport_height}"
        )))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/tracker.rs"]
mod tests;
