use std::sync::Arc;

use crate::{
    assets::cache::FrameCache,
    assets::decode::PreparedImage,
    catalog::model::Theme,
    foundation::core::{FrameIndex, Rgba8Premul},
    render::cover::draw_cover,
    render::surface::Surface,
};

/// What the surface shows when no frame has loaded yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placeholder {
    /// Theme gradient, top-left to bottom-right.
    Gradient {
        from: Rgba8Premul,
        to: Rgba8Premul,
    },
    /// Flat fill.
    Solid(Rgba8Premul),
}

impl Placeholder {
    pub fn from_theme(theme: &Theme) -> Self {
        Self::Gradient {
            from: theme.gradient_from,
            to: theme.gradient_to,
        }
    }
}

/// Content currently on the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawSource {
    Frame(FrameIndex),
    Placeholder,
}

/// Identity of one drawn image: redraw happens only when this changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawKey {
    pub source: DrawSource,
    pub pixel_size: (u32, u32),
    /// [`Surface::generation`] at draw time; a cleared buffer never matches.
    pub surface_generation: u64,
}

/// Result of [`Compositor::render`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The requested frame was drawn.
    Drawn(FrameIndex),
    /// Requested frame not ready; the last good frame was drawn instead.
    Fallback {
        requested: FrameIndex,
        shown: FrameIndex,
    },
    /// Nothing loaded yet; the placeholder was drawn.
    Placeholder,
    /// Same draw key as last time; the surface was left alone.
    Unchanged,
}

impl RenderOutcome {
    pub fn redrew(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Draws resolved frames onto a [`Surface`] with cover fit.
///
/// Holds the last successfully drawn image so a pending or failed frame never blanks the
/// surface, and the last draw key so unchanged requests cost nothing.
#[derive(Debug)]
pub struct Compositor {
    placeholder: Placeholder,
    clear: Rgba8Premul,
    last_key: Option<DrawKey>,
    last_good: Option<(FrameIndex, Arc<PreparedImage>)>,
    redraws: u64,
}

impl Compositor {
    pub fn new(placeholder: Placeholder, clear: Rgba8Premul) -> Self {
        Self {
            placeholder,
            clear,
            last_key: None,
            last_good: None,
            redraws: 0,
        }
    }

    pub fn last_key(&self) -> Option<DrawKey> {
        self.last_key
    }

    /// Frame kept for fallback draws.
    pub fn last_good_frame(&self) -> Option<FrameIndex> {
        self.last_good.as_ref().map(|(f, _)| *f)
    }

    /// Number of times the surface was actually painted.
    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    /// Force the next [`Compositor::render`] to paint.
    pub fn invalidate(&mut self) {
        self.last_key = None;
    }

    /// Show `frame` if it is loaded, otherwise the best fallback.
    pub fn render(
        &mut self,
        frame: FrameIndex,
        cache: &FrameCache,
        surface: &mut Surface,
    ) -> RenderOutcome {
        if let Some(img) = cache.image(frame) {
            self.last_good = Some((frame, img));
        }

        let (source, outcome) = match &self.last_good {
            Some((shown, _)) if *shown == frame => {
                (DrawSource::Frame(frame), RenderOutcome::Drawn(frame))
            }
            Some((shown, _)) => (
                DrawSource::Frame(*shown),
                RenderOutcome::Fallback {
                    requested: frame,
                    shown: *shown,
                },
            ),
            None => (DrawSource::Placeholder, RenderOutcome::Placeholder),
        };

        let key = DrawKey {
            source,
            pixel_size: surface.pixel_size(),
            surface_generation: surface.generation(),
        };
        if self.last_key == Some(key) {
            return RenderOutcome::Unchanged;
        }

        match &self.last_good {
            Some((_, img)) => {
                surface.fill(self.clear);
                draw_cover(surface, img);
            }
            None => match self.placeholder {
                Placeholder::Gradient { from, to } => surface.fill_diagonal_gradient(from, to),
                Placeholder::Solid(c) => surface.fill(c),
            },
        }
        self.last_key = Some(key);
        self.redraws += 1;
        tracing::trace!(?key, ?outcome, "surface painted");
        outcome
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
