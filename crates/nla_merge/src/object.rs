// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animated objects and evaluation of their NLA stack.

use crate::action::{Action, ActionId};
use crate::keyframe::lerp;
use crate::track::{AnimData, BlendMode, NlaStrip};
use crate::value::PropertyValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub Uuid);

impl ObjectId {
    /// Create a new random object ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

/// An object with animatable properties and an NLA stack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimatedObject {
    /// Unique object ID
    #[serde(default)]
    pub id: ObjectId,
    /// Object name
    pub name: String,
    /// Rest values keyed by property path
    #[serde(default)]
    pub properties: IndexMap<String, PropertyValue>,
    /// NLA tracks
    #[serde(default)]
    pub anim_data: AnimData,
    /// Values after the last evaluation
    #[serde(skip)]
    evaluated: IndexMap<String, PropertyValue>,
}

impl AnimatedObject {
    /// Create an object with no properties
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ObjectId::new(),
            name: name.into(),
            properties: IndexMap::new(),
            anim_data: AnimData::default(),
            evaluated: IndexMap::new(),
        }
    }

    /// Declare a property with its rest value
    pub fn with_property(mut self, path: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(path.into(), value.into());
        self
    }

    /// Current value of a property, falling back to the rest value before any evaluation
    pub fn value(&self, path: &str) -> Option<&PropertyValue> {
        self.evaluated.get(path).or_else(|| self.properties.get(path))
    }

    /// Evaluate the NLA stack at `frame`, bottom track first.
    ///
    /// Curves targeting undeclared properties are ignored.
    pub fn evaluate(&mut self, frame: f32, actions: &IndexMap<ActionId, Action>) {
        let mut values = self.properties.clone();

        for track in &self.anim_data.tracks {
            if track.mute {
                continue;
            }
            for strip in track.strips.iter().filter(|s| !s.mute && s.contains(frame)) {
                let Some(action) = actions.get(&strip.action) else {
                    continue;
                };
                apply_strip(&mut values, &self.properties, strip, action, frame);
            }
        }

        self.evaluated = values;
    }
}

fn apply_strip(
    values: &mut IndexMap<String, PropertyValue>,
    rest: &IndexMap<String, PropertyValue>,
    strip: &NlaStrip,
    action: &Action,
    frame: f32,
) {
    let local = strip.action_frame(frame);
    let influence = f64::from(strip.influence);

    for curve in &action.fcurves {
        let Some(sample) = curve.evaluate(local) else {
            continue;
        };
        let Some(value) = values.get_mut(&curve.data_path) else {
            continue;
        };
        let idx = curve.array_index;
        let lower = value.component(idx).unwrap_or(0.0);
        let rest_value = rest
            .get(&curve.data_path)
            .and_then(|v| v.component(idx))
            .unwrap_or(0.0);

        let blended = match strip.blend_type {
            BlendMode::Replace => sample,
            BlendMode::Combine => lower + (sample - rest_value),
            BlendMode::Add => lower + sample,
            BlendMode::Subtract => lower - sample,
            BlendMode::Multiply => lower * sample,
        };
        value.set_component(idx, lerp(lower, blended, influence));
    }
}
