//! Linear scale transformations of item parameters.
//!
//! A pair `(intercept B, slope A)` relates two ability scales through
//! `θ_Y = A·θ_X + B`. Item parameters follow the ability scale:
//!
//! | parameter kind | star (X → Y) | sharp (Y → X) |
//! |---|---|---|
//! | discrimination `a` | `a / A` | `a · A` |
//! | location `b`, step `s` | `A·b + B` | `(b − B) / A` |
//! | threshold offset `t` | `A·t` | `t / A` |
//!
//! Asymptotes (guessing, slipping) are scale free and never change.

/// Direction of a scale transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransformDirection {
    /// New-to-old: place Form X parameters on the Form Y scale.
    Star,
    /// Old-to-new: place Form Y parameters on the Form X scale.
    Sharp,
}

/// Linking coefficients as applied to item parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScaleTransform {
    pub intercept: f64,
    pub slope: f64,
    pub direction: TransformDirection,
}

impl ScaleTransform {
    pub fn star(intercept: f64, slope: f64) -> Self {
        Self { intercept, slope, direction: TransformDirection::Star }
    }

    pub fn sharp(intercept: f64, slope: f64) -> Self {
        Self { intercept, slope, direction: TransformDirection::Sharp }
    }

    /// The transformation that undoes `self`.
    pub fn inverse(self) -> Self {
        let direction = match self.direction {
            TransformDirection::Star => TransformDirection::Sharp,
            TransformDirection::Sharp => TransformDirection::Star,
        };
        Self { direction, ..self }
    }

    pub fn is_identity(&self) -> bool {
        self.intercept == 0.0 && self.slope == 1.0
    }

    pub fn discrimination(&self, a: f64) -> f64 {
        match self.direction {
            TransformDirection::Star => a / self.slope,
            TransformDirection::Sharp => a * self.slope,
        }
    }

    pub fn location(&self, b: f64) -> f64 {
        match self.direction {
            TransformDirection::Star => self.slope * b + self.intercept,
            TransformDirection::Sharp => (b - self.intercept) / self.slope,
        }
    }

    pub fn threshold(&self, t: f64) -> f64 {
        match self.direction {
            TransformDirection::Star => self.slope * t,
            TransformDirection::Sharp => t / self.slope,
        }
    }
}
