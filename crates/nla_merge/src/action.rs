// SPDX-License-Identifier: MIT OR Apache-2.0
//! Actions (clips) and the property curves they hold.

use crate::keyframe::{Extrapolation, Keyframe};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub Uuid);

impl ActionId {
    /// Create a new random action ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActionId {
    fn default() -> Self {
        Self::new()
    }
}

/// A curve animating one component of a property path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FCurve {
    /// Property path this curve animates
    pub data_path: String,
    /// Component index within the property
    #[serde(default)]
    pub array_index: usize,
    /// Behaviour outside the keyed range
    #[serde(default)]
    pub extrapolation: Extrapolation,
    /// Keyframe points, ordered by frame
    #[serde(default)]
    pub keyframes: Vec<Keyframe>,
}

impl FCurve {
    /// Create an empty curve
    pub fn new(data_path: impl Into<String>, array_index: usize) -> Self {
        Self {
            data_path: data_path.into(),
            array_index,
            extrapolation: Extrapolation::default(),
            keyframes: Vec::new(),
        }
    }

    /// Add a keyframe, keeping points ordered by frame
    pub fn add_keyframe(&mut self, keyframe: Keyframe) {
        let idx = self.keyframes.partition_point(|k| k.frame <= keyframe.frame);
        self.keyframes.insert(idx, keyframe);
    }

    /// Resize the point list to `count` points; new points are zeroed
    pub fn resize(&mut self, count: usize) {
        self.keyframes.resize(count, Keyframe::default());
    }

    /// First and last keyed frame
    pub fn frame_range(&self) -> Option<(f32, f32)> {
        let first = self.keyframes.first()?;
        let last = self.keyframes.last()?;
        Some((first.frame, last.frame))
    }

    /// Evaluate the curve at a frame
    pub fn evaluate(&self, frame: f32) -> Option<f64> {
        let first = self.keyframes.first()?;
        let last = self.keyframes.last()?;

        if frame <= first.frame {
            return Some(match (self.extrapolation, self.keyframes.get(1)) {
                (Extrapolation::Linear, Some(next)) => extend(first, next, frame),
                _ => first.value,
            });
        }
        if frame >= last.frame {
            let len = self.keyframes.len();
            return Some(match self.extrapolation {
                Extrapolation::Linear if len > 1 => {
                    extend(&self.keyframes[len - 2], last, frame)
                }
                _ => last.value,
            });
        }

        // Find the first keyframe after frame
        let next_idx = self.keyframes.partition_point(|k| k.frame <= frame);
        let a = &self.keyframes[next_idx - 1];
        let b = &self.keyframes[next_idx];
        Some(a.interpolate(b, frame))
    }
}

fn extend(a: &Keyframe, b: &Keyframe, frame: f32) -> f64 {
    let span = b.frame - a.frame;
    if span.abs() < 0.0001 {
        return b.value;
    }
    let slope = (b.value - a.value) / f64::from(span);
    a.value + slope * f64::from(frame - a.frame)
}

/// A named bundle of property curves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    /// Unique action ID
    pub id: ActionId,
    /// Action name
    pub name: String,
    /// Curves in creation order
    #[serde(default)]
    pub fcurves: Vec<FCurve>,
}

impl Action {
    /// Create an empty action
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ActionId::new(),
            name: name.into(),
            fcurves: Vec::new(),
        }
    }

    /// Append a new curve and return it
    pub fn new_fcurve(&mut self, data_path: &str, array_index: usize) -> &mut FCurve {
        self.fcurves.push(FCurve::new(data_path, array_index));
        let last = self.fcurves.len() - 1;
        &mut self.fcurves[last]
    }

    /// Find the curve for a path component
    pub fn fcurve(&self, data_path: &str, array_index: usize) -> Option<&FCurve> {
        self.fcurves
            .iter()
            .find(|c| c.data_path == data_path && c.array_index == array_index)
    }

    /// Keyed frame range over all curves, `(0, 0)` when nothing is keyed
    pub fn frame_range(&self) -> (f32, f32) {
        self.fcurves
            .iter()
            .filter_map(FCurve::frame_range)
            .reduce(|(a0, a1), (b0, b1)| (a0.min(b0), a1.max(b1)))
            .unwrap_or((0.0, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::InterpolationMode;

    fn ramp() -> FCurve {
        let mut curve = FCurve::new("location", 0);
        curve.add_keyframe(Keyframe::new(10.0, 10.0).with_interpolation(InterpolationMode::Linear));
        curve.add_keyframe(Keyframe::new(0.0, 0.0).with_interpolation(InterpolationMode::Linear));
        curve
    }

    #[test]
    fn test_keyframes_stay_sorted() {
        let curve = ramp();
        assert_eq!(curve.frame_range(), Some((0.0, 10.0)));
    }

    #[test]
    fn test_evaluate_inside_range() {
        assert!((ramp().evaluate(2.5).unwrap() - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_extrapolation() {
        let mut curve = ramp();
        assert_eq!(curve.evaluate(-5.0), Some(0.0));
        assert_eq!(curve.evaluate(20.0), Some(10.0));

        curve.extrapolation = Extrapolation::Linear;
        assert!((curve.evaluate(-5.0).unwrap() + 5.0).abs() < 1e-6);
        assert!((curve.evaluate(20.0).unwrap() - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_curve() {
        assert_eq!(FCurve::new("scale", 1).evaluate(0.0), None);
    }

    #[test]
    fn test_action_frame_range() {
        let mut action = Action::new("Walk");
        assert_eq!(action.frame_range(), (0.0, 0.0));

        action.fcurves.push(ramp());
        let other = action.new_fcurve("scale", 2);
        other.add_keyframe(Keyframe::new(-3.0, 1.0));
        assert_eq!(action.frame_range(), (-3.0, 10.0));
        assert!(action.fcurve("scale", 2).is_some());
        assert!(action.fcurve("scale", 0).is_none());
    }
}
