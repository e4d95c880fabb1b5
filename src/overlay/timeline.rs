use crate::{
    animation::keyframes::ProgressKeyframes,
    catalog::model::{Align, ProductRecord, TextSection},
    foundation::core::Progress,
    foundation::error::{ScrollError, ScrollResult},
    scroll::tracker::ScrollOffsets,
};

/// Progress spent fading a section in, and again fading it out.
pub const FADE_SPAN: f64 = 0.05;
/// Vertical travel of a section while fading, in CSS px.
pub const RISE_PX: f64 = 50.0;

/// Window of the hero section built from the product's name and headline.
pub const HERO_WINDOW: (f64, f64) = (0.0, 0.15);

/// Windows and alignment of the four copy sections following the hero.
pub const DEFAULT_WINDOWS: [(f64, f64, Align); 4] = [
    (0.15, 0.35, Align::Center),
    (0.3, 0.5, Align::Left),
    (0.55, 0.75, Align::Right),
    (0.8, 0.95, Align::Center),
];

/// Lay `copy` (title, subtitle) out on [`DEFAULT_WINDOWS`]. Extra entries are dropped.
pub fn default_sections<I>(copy: I) -> Vec<TextSection>
where
    I: IntoIterator<Item = (String, String)>,
{
    copy.into_iter()
        .zip(DEFAULT_WINDOWS)
        .map(|((title, subtitle), (start, end, align))| TextSection {
            title,
            subtitle,
            extra_text: None,
            start,
            end,
            align,
        })
        .collect()
}

#[derive(Clone, Debug)]
struct Track {
    section: TextSection,
    opacity: ProgressKeyframes<f64>,
    offset_y: ProgressKeyframes<f64>,
}

/// Opacity and vertical offset of one section at one progress value.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct SectionSample {
    pub index: usize,
    pub opacity: f64,
    pub offset_y: f64,
}

impl SectionSample {
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

/// Caption crossfades driven by the same progress as the frame player.
#[derive(Clone, Debug)]
pub struct TextTimeline {
    tracks: Vec<Track>,
}

impl TextTimeline {
    pub fn new(sections: Vec<TextSection>) -> ScrollResult<Self> {
        let tracks = sections
            .into_iter()
            .enumerate()
            .map(|(i, s)| {
                track(s).map_err(|e| ScrollError::validation(format!("section {i}: {e}")))
            })
            .collect::<ScrollResult<Vec<_>>>()?;
        Ok(Self { tracks })
    }

    /// Hero section from the product's name, then its own text sections.
    pub fn for_product(product: &ProductRecord) -> ScrollResult<Self> {
        let hero = TextSection {
            title: product.name.clone(),
            subtitle: product.sub_name.clone(),
            extra_text: product.hero_headline.clone(),
            start: HERO_WINDOW.0,
            end: HERO_WINDOW.1,
            align: Align::Center,
        };
        let mut sections = Vec::with_capacity(product.text_timeline.len() + 1);
        sections.push(hero);
        sections.extend(product.text_timeline.iter().cloned());
        Self::new(sections)
    }

    /// Offsets the overlay region is tracked with: its own top to its own bottom.
    pub fn tracker_offsets() -> ScrollOffsets {
        ScrollOffsets::contained()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn section(&self, index: usize) -> Option<&TextSection> {
        self.tracks.get(index).map(|t| &t.section)
    }

    /// Sections whose window opens at progress 0 show the scroll hint.
    pub fn shows_scroll_hint(&self, index: usize) -> bool {
        self.section(index).is_some_and(|s| s.start == 0.0)
    }

    pub fn sample(&self, p: Progress) -> Vec<SectionSample> {
        self.tracks
            .iter()
            .enumerate()
            .map(|(index, t)| SectionSample {
                index,
                opacity: t.opacity.sample(p),
                offset_y: t.offset_y.sample(p),
            })
            .collect()
    }

    pub fn visible(&self, p: Progress) -> Vec<SectionSample> {
        let mut out = self.sample(p);
        out.retain(SectionSample::is_visible);
        out
    }
}

fn track(section: TextSection) -> ScrollResult<Track> {
    let (start, end) = (section.start, section.end);
    if !(start.is_finite() && end.is_finite() && 0.0 <= start && start < end && end <= 1.0) {
        return Err(ScrollError::validation(format!(
            "window must satisfy 0 <= start < end <= 1, got {start}..{end}"
        )));
    }
    // Narrow windows collapse the plateau to the midpoint.
    let mid = (start + end) / 2.0;
    let stops = [
        start,
        (start + FADE_SPAN).min(mid),
        (end - FADE_SPAN).max(mid),
        end,
    ];
    Ok(Track {
        opacity: ProgressKeyframes::linear(&stops, &[0.0, 1.0, 1.0, 0.0])?,
        offset_y: ProgressKeyframes::linear(&stops, &[RISE_PX, 0.0, 0.0, -RISE_PX])?,
        section,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/timeline.rs"]
mod tests;
