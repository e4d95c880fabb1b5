use crate::{
    foundation::core::Progress,
    foundation::error::{ScrollError, ScrollResult},
    foundation::math::lerp_f64,
};

/// Interpolation contract for values driven by scroll progress.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t` in `[0, 1]`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        lerp_f64(*a, *b, t)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One stop of a progress-driven transform.
pub struct ProgressKey<T> {
    /// Progress position of this stop.
    pub at: f64,
    /// Value at `at`.
    pub value: T,
}

/// Piecewise map from progress to a value, clamped at both ends.
///
/// Mirrors a scroll-linked transform: `[p0, p1, ...] -> [v0, v1, ...]`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProgressKeyframes<T> {
    keys: Vec<ProgressKey<T>>,
}

impl<T> ProgressKeyframes<T>
where
    T: Lerp + Clone,
{
    /// Build from explicit stops; positions must be finite and non-decreasing.
    pub fn new(keys: Vec<ProgressKey<T>>) -> ScrollResult<Self> {
        if keys.is_empty() {
            return Err(ScrollError::validation(
                "progress keyframes need at least one stop",
            ));
        }
        if keys.iter().any(|k| !k.at.is_finite()) {
            return Err(ScrollError::validation(
                "progress keyframe positions must be finite",
            ));
        }
        if !keys.windows(2).all(|w| w[0].at <= w[1].at) {
            return Err(ScrollError::validation(
                "progress keyframes must be sorted by position",
            ));
        }
        Ok(Self { keys })
    }

    /// Stops zipped from parallel position/value slices.
    pub fn linear(positions: &[f64], values: &[T]) -> ScrollResult<Self> {
        if positions.len() != values.len() {
            return Err(ScrollError::validation(
                "progress keyframes need one value per position",
            ));
        }
        Self::new(
            positions
                .iter()
                .zip(values)
                .map(|(&at, v)| ProgressKey {
                    at,
                    value: v.clone(),
                })
                .collect(),
        )
    }

    /// Sample at `p`.
    pub fn sample(&self, p: Progress) -> T {
        let p = p.get();
        let idx = self.keys.partition_point(|k| k.at <= p);

        if idx == 0 {
            return self.keys[0].value.clone();
        }
        if idx >= self.keys.len() {
            return self.keys[self.keys.len() - 1].value.clone();
        }

        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let span = b.at - a.at;
        if span <= 0.0 {
            return a.value.clone();
        }
        T::lerp(&a.value, &b.value, (p - a.at) / span)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/keyframes.rs"]
mod tests;
