// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for host access and the merge operation.

use crate::action::ActionId;
use crate::object::ObjectId;
use crate::track::StripId;
use thiserror::Error;

/// Failures reported by an animation host
#[derive(Debug, Error)]
pub enum HostError {
    /// Object is not part of the scene
    #[error("Object not found: {0:?}")]
    ObjectNotFound(ObjectId),

    /// Strip is not on any track of the object
    #[error("Strip not found: {0:?}")]
    StripNotFound(StripId),

    /// Action is not in the data store
    #[error("Action not found: {0:?}")]
    ActionNotFound(ActionId),

    /// No track/strip pair with these names
    #[error("No strip '{strip}' on track '{track}'")]
    StripNameNotFound {
        /// Track name
        track: String,
        /// Strip name
        strip: String,
    },

    /// Property path does not resolve on the object
    #[error("Path '{path}' could not be resolved on '{object}'")]
    UnresolvedPath {
        /// Name of the object the path was resolved against
        object: String,
        /// The property path
        path: String,
    },
}

/// Error type for the merge operation
#[derive(Debug, Error)]
pub enum MergeError {
    /// Fewer than two strips are selected
    #[error("At least two strips must be selected, found {0}")]
    NotEnoughStrips(usize),

    /// The selected strips span no whole frame
    #[error("Selected strips cover an empty frame range ({start}..{end})")]
    EmptyRange {
        /// First frame
        start: i32,
        /// End frame (exclusive)
        end: i32,
    },

    /// A sampled vector is shorter than the curve set built for its path
    #[error("Sample of '{path}' at frame {frame} has no component {index}")]
    ShapeMismatch {
        /// The property path
        path: String,
        /// Sampled frame, relative to the merged clip
        frame: usize,
        /// Missing component index
        index: usize,
    },

    /// Host level failure
    #[error("Host error: {0}")]
    Host(#[from] HostError),
}

/// Result type for merge operations
pub type Result<T> = std::result::Result<T, MergeError>;
