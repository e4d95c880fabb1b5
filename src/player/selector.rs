use crate::foundation::core::{FrameIndex, FrameSpan, Progress};

/// Stateless progress to frame mapping for one product.
///
/// `index = clamp(floor(first + p * (last - first)), first, last)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameSelector {
    span: FrameSpan,
}

impl FrameSelector {
    pub fn new(span: FrameSpan) -> Self {
        Self { span }
    }

    pub fn span(&self) -> FrameSpan {
        self.span
    }

    pub fn select(&self, p: Progress) -> FrameIndex {
        let first = self.span.first.0;
        let last = self.span.last.0;
        if first == last {
            return self.span.first;
        }
        let p = p.get();
        if p <= 0.0 {
            return self.span.first;
        }
        if p >= 1.0 {
            return self.span.last;
        }
        let raw = (f64::from(first) + p * f64::from(last - first)).floor();
        self.span.clamp(FrameIndex(raw as u32))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/player/selector.rs"]
mod tests;
