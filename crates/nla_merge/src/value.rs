// SPDX-License-Identifier: MIT OR Apache-2.0
//! Values read from animated properties.

use serde::{Deserialize, Serialize};

/// An owned copy of a property's current value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    /// Single float property
    Scalar(f64),
    /// Fixed-size float array (location, rotation, color, ...)
    Vector(Vec<f64>),
}

impl PropertyValue {
    /// Number of curve components this value fans out to
    pub fn component_count(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Vector(v) => v.len(),
        }
    }

    /// Component `idx`; a scalar answers every index with itself
    pub fn component(&self, idx: usize) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::Vector(v) => v.get(idx).copied(),
        }
    }

    /// Write component `idx`, growing a vector or promoting a scalar as needed
    pub fn set_component(&mut self, idx: usize, value: f64) {
        match self {
            Self::Scalar(v) if idx == 0 => *v = value,
            Self::Scalar(v) => {
                let mut components = vec![*v; idx + 1];
                components[idx] = value;
                *self = Self::Vector(components);
            }
            Self::Vector(v) => {
                if v.len() <= idx {
                    v.resize(idx + 1, 0.0);
                }
                v[idx] = value;
            }
        }
    }

    /// Whether this is a scalar
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<f64>> for PropertyValue {
    fn from(value: Vec<f64>) -> Self {
        Self::Vector(value)
    }
}

impl<const N: usize> From<[f64; N]> for PropertyValue {
    fn from(value: [f64; N]) -> Self {
        Self::Vector(value.to_vec())
    }
}
