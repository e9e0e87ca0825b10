// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe definitions for property curves.

use serde::{Deserialize, Serialize};

/// Interpolation mode between a keyframe and the next one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterpolationMode {
    /// Constant (step)
    Constant,
    /// Linear interpolation
    Linear,
    /// Cubic bezier interpolation
    #[default]
    Bezier,
}

/// How a curve continues outside its first and last keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Extrapolation {
    /// Hold the end values
    #[default]
    Constant,
    /// Continue the slope of the end segments
    Linear,
}

/// A keyframe point on a property curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Frame (x coordinate)
    pub frame: f32,
    /// Value (y coordinate)
    pub value: f64,
    /// Interpolation mode to next keyframe
    #[serde(default)]
    pub interpolation: InterpolationMode,
}

impl Keyframe {
    /// Create a new keyframe
    pub fn new(frame: f32, value: f64) -> Self {
        Self {
            frame,
            value,
            interpolation: InterpolationMode::default(),
        }
    }

    /// Set interpolation mode
    pub fn with_interpolation(mut self, mode: InterpolationMode) -> Self {
        self.interpolation = mode;
        self
    }

    /// Interpolate towards `next` at `frame`, using this keyframe's mode.
    ///
    /// Bezier handles are not stored, so bezier segments evaluate linearly.
    pub fn interpolate(&self, next: &Keyframe, frame: f32) -> f64 {
        let span = next.frame - self.frame;
        if span.abs() < 0.0001 {
            return next.value;
        }
        match self.interpolation {
            InterpolationMode::Constant => self.value,
            InterpolationMode::Linear | InterpolationMode::Bezier => {
                let t = f64::from((frame - self.frame) / span);
                lerp(self.value, next.value, t)
            }
        }
    }
}

impl Default for Keyframe {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Linear interpolation between two values
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
