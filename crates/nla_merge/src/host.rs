// SPDX-License-Identifier: MIT OR Apache-2.0
//! Capabilities the merge operation needs from the application hosting it.
//!
//! The host owns the scene, evaluates the animation for a frame and shows
//! progress. [`crate::Scene`] is an in-memory implementation.

use crate::action::{Action, ActionId};
use crate::error::HostError;
use crate::history::HistoryError;
use crate::object::ObjectId;
use crate::track::{AnimData, StripId};
use crate::value::PropertyValue;

/// Progress bar of the host window
pub trait ProgressSink {
    /// Show a progress bar over `[min, max]`
    fn progress_begin(&mut self, min: i32, max: i32);

    /// Move the progress bar to `value`
    fn progress_update(&mut self, value: i32);

    /// Hide the progress bar
    fn progress_end(&mut self);
}

/// Scene access and animation evaluation
pub trait AnimationHost: ProgressSink {
    /// Selected strips across all objects, with their owning object
    fn selected_strips(&self) -> Vec<(ObjectId, StripId)>;

    /// NLA stack of an object
    fn anim_data(&self, object: ObjectId) -> Result<&AnimData, HostError>;

    /// NLA stack of an object for modification
    fn anim_data_mut(&mut self, object: ObjectId) -> Result<&mut AnimData, HostError>;

    /// Look up an action
    fn action(&self, id: ActionId) -> Result<&Action, HostError>;

    /// Look up an action for modification
    fn action_mut(&mut self, id: ActionId) -> Result<&mut Action, HostError>;

    /// Create an empty action; the stored name is made unique
    fn new_action(&mut self, name: &str) -> ActionId;

    /// Current scene frame
    fn frame_current(&self) -> i32;

    /// Move to `frame` and re-evaluate the animation
    fn frame_set(&mut self, frame: i32);

    /// Copy of the evaluated value of `path` on `object`
    fn path_resolve(&self, object: ObjectId, path: &str) -> Result<PropertyValue, HostError>;
}

/// Undo stack of the host
pub trait UndoHost {
    /// Record the current state before an undoable operation runs
    fn undo_push(&mut self, description: &str) -> Result<(), HistoryError>;
}
