// SPDX-License-Identifier: MIT OR Apache-2.0
//! Merge selected NLA strips into one baked strip.
//!
//! This crate provides:
//! - NLA data model (tracks, strips, actions, property curves)
//! - Host capability traits for scene access and animation evaluation
//! - An in-memory scene implementing those capabilities
//! - The merge operator and the context menu registry exposing it
//!
//! ## Architecture
//!
//! The merge does not blend curves itself. It lets the host evaluate the
//! stacked strips frame by frame, reads back the evaluated values and bakes
//! them as linear keyframes into a new action, placed on a new track above
//! the merged strips. The originals are muted, never deleted.

pub mod action;
pub mod error;
pub mod history;
pub mod host;
pub mod keyframe;
pub mod merge;
pub mod object;
pub mod operator;
pub mod progress;
pub mod scene;
pub mod track;
pub mod value;

pub use action::{Action, ActionId, FCurve};
pub use error::{HostError, MergeError, Result};
pub use history::{History, HistoryError, StateSnapshot};
pub use host::{AnimationHost, ProgressSink, UndoHost};
pub use keyframe::{Extrapolation, InterpolationMode, Keyframe};
pub use merge::{MergeOutcome, MergePhase, MergeStrips, Selection};
pub use object::{AnimatedObject, ObjectId};
pub use operator::{
    MenuEntry, Operator, OperatorError, OperatorOptions, OperatorRegistry, OperatorResult,
    NLA_CONTEXT_MENU,
};
pub use progress::ProgressReporter;
pub use scene::{ProgressEvent, Scene};
pub use track::{AnimData, BlendMode, NlaStrip, NlaTrack, StripId, TrackId};
pub use value::PropertyValue;

/// Register the merge operator and add it to the NLA context menu
pub fn register<H>(registry: &mut OperatorRegistry<H>) -> std::result::Result<(), OperatorError>
where
    H: AnimationHost + UndoHost,
{
    registry.register(Box::new(MergeStrips::new()))?;
    registry.append_to_menu(NLA_CONTEXT_MENU, MergeStrips::IDNAME)
}

/// Remove the merge operator and its menu entry
pub fn unregister<H>(registry: &mut OperatorRegistry<H>) -> std::result::Result<(), OperatorError>
where
    H: AnimationHost + UndoHost,
{
    registry.unregister(MergeStrips::IDNAME)
}
