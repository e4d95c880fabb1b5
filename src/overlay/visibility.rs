use crate::{
    foundation::core::Progress,
    foundation::error::{ScrollError, ScrollResult},
    scroll::signal::{ProgressSignal, SubscriptionId},
    scroll::tracker::ScrollOffsets,
};

/// Reports whether a tracked section is substantially on screen.
///
/// Active strictly between the two bounds; callers hear about transitions only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityGate {
    lower: f64,
    upper: f64,
    active: bool,
}

impl Default for VisibilityGate {
    fn default() -> Self {
        Self {
            lower: 0.05,
            upper: 0.95,
            active: false,
        }
    }
}

impl VisibilityGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounds(lower: f64, upper: f64) -> ScrollResult<Self> {
        if !(lower.is_finite() && upper.is_finite() && 0.0 <= lower && lower < upper && upper <= 1.0)
        {
            return Err(ScrollError::validation(format!(
                "visibility bounds must satisfy 0 <= lower < upper <= 1, got {lower}..{upper}"
            )));
        }
        Ok(Self {
            lower,
            upper,
            active: false,
        })
    }

    /// Offsets the gated region is tracked with: entering at the viewport bottom to leaving
    /// at its top.
    pub fn tracker_offsets() -> ScrollOffsets {
        ScrollOffsets::passage()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Feed progress; `Some(active)` when the state flipped.
    pub fn update(&mut self, p: Progress) -> Option<bool> {
        let v = p.get();
        let active = self.lower < v && v < self.upper;
        if active == self.active {
            return None;
        }
        self.active = active;
        Some(active)
    }

    /// Move the gate into a listener on `signal`; `on_change` runs on each transition.
    pub fn attach(
        mut self,
        signal: &mut ProgressSignal,
        mut on_change: impl FnMut(bool) + 'static,
    ) -> SubscriptionId {
        signal.subscribe(move |p| {
            if let Some(active) = self.update(p) {
                tracing::debug!(active, progress = p.get(), "section visibility changed");
                on_change(active);
            }
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/visibility.rs"]
mod tests;
