// SPDX-License-Identifier: MIT OR Apache-2.0
//! In-memory scene implementing the host capabilities.
//!
//! Holds objects and the action data store, evaluates NLA stacks on
//! `frame_set`, records progress calls and keeps an undo history of whole
//! scene snapshots.

use crate::action::{Action, ActionId};
use crate::error::HostError;
use crate::history::{History, HistoryError, StateSnapshot};
use crate::host::{AnimationHost, ProgressSink, UndoHost};
use crate::object::{AnimatedObject, ObjectId};
use crate::track::{AnimData, StripId};
use crate::value::PropertyValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A progress bar call made by an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Progress bar shown
    Begin {
        /// Lower bound
        min: i32,
        /// Upper bound
        max: i32,
    },
    /// Progress bar moved
    Update(i32),
    /// Progress bar hidden
    End,
}

/// Scene with objects, actions and a current frame
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Scene {
    /// Objects keyed by ID
    #[serde(default)]
    pub objects: IndexMap<ObjectId, AnimatedObject>,
    /// Action data store
    #[serde(default)]
    pub actions: IndexMap<ActionId, Action>,
    /// Current frame
    #[serde(default)]
    frame_current: i32,
    #[serde(skip)]
    history: History,
    #[serde(skip)]
    progress_log: Vec<ProgressEvent>,
}

#[derive(Serialize)]
struct SceneStateRef<'a> {
    objects: &'a IndexMap<ObjectId, AnimatedObject>,
    actions: &'a IndexMap<ActionId, Action>,
    frame_current: i32,
}

#[derive(Deserialize)]
struct SceneState {
    objects: IndexMap<ObjectId, AnimatedObject>,
    actions: IndexMap<ActionId, Action>,
    frame_current: i32,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object
    pub fn add_object(&mut self, object: AnimatedObject) -> ObjectId {
        let id = object.id;
        self.objects.insert(id, object);
        id
    }

    /// Add an action to the data store as is
    pub fn add_action(&mut self, action: Action) -> ActionId {
        let id = action.id;
        self.actions.insert(id, action);
        id
    }

    /// Get an object
    pub fn object(&self, id: ObjectId) -> Option<&AnimatedObject> {
        self.objects.get(&id)
    }

    /// Get a mutable object
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut AnimatedObject> {
        self.objects.get_mut(&id)
    }

    /// Find an object by name
    pub fn object_by_name(&self, name: &str) -> Option<&AnimatedObject> {
        self.objects.values().find(|o| o.name == name)
    }

    /// Find an action by name
    pub fn action_by_name(&self, name: &str) -> Option<&Action> {
        self.actions.values().find(|a| a.name == name)
    }

    /// Replace the selection with the named strips of `object`
    pub fn select_strips<'a>(
        &mut self,
        object: ObjectId,
        names: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<(), HostError> {
        let anim = self.anim_data_mut(object)?;
        anim.deselect_all();
        for (track_name, strip_name) in names {
            let strip = anim
                .tracks
                .iter_mut()
                .filter(|t| t.name == track_name)
                .flat_map(|t| t.strips.iter_mut())
                .find(|s| s.name == strip_name)
                .ok_or_else(|| HostError::StripNameNotFound {
                    track: track_name.to_string(),
                    strip: strip_name.to_string(),
                })?;
            strip.select = true;
        }
        Ok(())
    }

    /// Progress calls recorded so far
    pub fn progress_log(&self) -> &[ProgressEvent] {
        &self.progress_log
    }

    /// Take and clear the recorded progress calls
    pub fn take_progress_log(&mut self) -> Vec<ProgressEvent> {
        std::mem::take(&mut self.progress_log)
    }

    /// Re-evaluate every object at the current frame
    pub fn evaluate(&mut self) {
        let frame = self.frame_current as f32;
        for object in self.objects.values_mut() {
            object.evaluate(frame, &self.actions);
        }
    }

    /// Revert to the state before the last undoable operation
    pub fn undo(&mut self) -> Result<(), HistoryError> {
        let current = self.snapshot()?;
        let step = self.history.undo(current)?;
        tracing::info!("Undo: {}", step.description);
        self.restore(&step.snapshot)
    }

    /// Re-apply the last undone operation
    pub fn redo(&mut self) -> Result<(), HistoryError> {
        let current = self.snapshot()?;
        let step = self.history.redo(current)?;
        tracing::info!("Redo: {}", step.description);
        self.restore(&step.snapshot)
    }

    /// Undo history
    pub fn history(&self) -> &History {
        &self.history
    }

    fn snapshot(&self) -> Result<StateSnapshot, HistoryError> {
        StateSnapshot::from_value(&SceneStateRef {
            objects: &self.objects,
            actions: &self.actions,
            frame_current: self.frame_current,
        })
    }

    fn restore(&mut self, snapshot: &StateSnapshot) -> Result<(), HistoryError> {
        let state: SceneState = snapshot.to_value()?;
        self.objects = state.objects;
        self.actions = state.actions;
        self.frame_current = state.frame_current;
        self.evaluate();
        Ok(())
    }

    fn unique_action_name(&self, name: &str) -> String {
        let taken = |candidate: &str| self.actions.values().any(|a| a.name == candidate);
        if !taken(name) {
            return name.to_string();
        }
        (1..)
            .map(|n| format!("{name}.{n:03}"))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| name.to_string())
    }

    /// Serialize to RON format
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Deserialize from RON format and evaluate at the stored frame
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        let mut scene: Self = ron::from_str(s)?;
        scene.evaluate();
        Ok(scene)
    }

    /// Serialize to JSON format
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON format and evaluate at the stored frame
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        let mut scene: Self = serde_json::from_str(s)?;
        scene.evaluate();
        Ok(scene)
    }
}

impl ProgressSink for Scene {
    fn progress_begin(&mut self, min: i32, max: i32) {
        self.progress_log.push(ProgressEvent::Begin { min, max });
    }

    fn progress_update(&mut self, value: i32) {
        tracing::debug!("Progress: {value}");
        self.progress_log.push(ProgressEvent::Update(value));
    }

    fn progress_end(&mut self) {
        self.progress_log.push(ProgressEvent::End);
    }
}

impl AnimationHost for Scene {
    fn selected_strips(&self) -> Vec<(ObjectId, StripId)> {
        self.objects
            .values()
            .flat_map(|o| o.anim_data.selected_strips().map(move |s| (o.id, s.id)))
            .collect()
    }

    fn anim_data(&self, object: ObjectId) -> Result<&AnimData, HostError> {
        self.objects
            .get(&object)
            .map(|o| &o.anim_data)
            .ok_or(HostError::ObjectNotFound(object))
    }

    fn anim_data_mut(&mut self, object: ObjectId) -> Result<&mut AnimData, HostError> {
        self.objects
            .get_mut(&object)
            .map(|o| &mut o.anim_data)
            .ok_or(HostError::ObjectNotFound(object))
    }

    fn action(&self, id: ActionId) -> Result<&Action, HostError> {
        self.actions.get(&id).ok_or(HostError::ActionNotFound(id))
    }

    fn action_mut(&mut self, id: ActionId) -> Result<&mut Action, HostError> {
        self.actions.get_mut(&id).ok_or(HostError::ActionNotFound(id))
    }

    fn new_action(&mut self, name: &str) -> ActionId {
        let name = self.unique_action_name(name);
        self.add_action(Action::new(name))
    }

    fn frame_current(&self) -> i32 {
        self.frame_current
    }

    fn frame_set(&mut self, frame: i32) {
        self.frame_current = frame;
        self.evaluate();
    }

    fn path_resolve(&self, object: ObjectId, path: &str) -> Result<PropertyValue, HostError> {
        let obj = self
            .objects
            .get(&object)
            .ok_or(HostError::ObjectNotFound(object))?;
        obj.value(path)
            .cloned()
            .ok_or_else(|| HostError::UnresolvedPath {
                object: obj.name.clone(),
                path: path.to_string(),
            })
    }
}

impl UndoHost for Scene {
    fn undo_push(&mut self, description: &str) -> Result<(), HistoryError> {
        let snapshot = self.snapshot()?;
        self.history.push(description, snapshot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::Keyframe;
    use crate::track::{NlaStrip, NlaTrack};

    fn scene() -> (Scene, ObjectId) {
        let mut scene = Scene::new();
        let mut action = Action::new("Bounce");
        let curve = action.new_fcurve("location", 2);
        curve.add_keyframe(Keyframe::new(0.0, 0.0));
        curve.add_keyframe(Keyframe::new(10.0, 10.0));

        let mut track = NlaTrack::new("Track");
        track.add_strip(NlaStrip::new("Bounce", 0.0, &action));
        let mut obj = AnimatedObject::new("Ball").with_property("location", [0.0, 0.0, 0.0]);
        obj.anim_data.push_track(track);

        scene.add_action(action);
        let id = scene.add_object(obj);
        (scene, id)
    }

    #[test]
    fn test_frame_set_evaluates() {
        let (mut scene, id) = scene();
        scene.frame_set(10);
        let z = scene.path_resolve(id, "location").unwrap().component(2);
        assert_eq!(z, Some(10.0));
        assert_eq!(scene.frame_current(), 10);
    }

    #[test]
    fn test_unknown_path() {
        let (scene, id) = scene();
        assert!(matches!(
            scene.path_resolve(id, "scale"),
            Err(HostError::UnresolvedPath { .. })
        ));
    }

    #[test]
    fn test_unique_action_names() {
        let (mut scene, _) = scene();
        let first = scene.new_action("Bounce");
        let second = scene.new_action("Bounce");
        assert_eq!(scene.action(first).unwrap().name, "Bounce.001");
        assert_eq!(scene.action(second).unwrap().name, "Bounce.002");
    }

    #[test]
    fn test_select_strips_by_name() {
        let (mut scene, id) = scene();
        scene.select_strips(id, [("Track", "Bounce")]).unwrap();
        assert_eq!(scene.selected_strips().len(), 1);

        let missing = scene.select_strips(id, [("Track", "Nope")]);
        assert!(matches!(missing, Err(HostError::StripNameNotFound { .. })));
    }

    #[test]
    fn test_undo_restores_snapshot() {
        let (mut scene, id) = scene();
        scene.undo_push("Mute").unwrap();
        scene.anim_data_mut(id).unwrap().tracks[0].mute = true;
        scene.frame_set(4);

        scene.undo().unwrap();
        assert!(!scene.anim_data(id).unwrap().tracks[0].mute);
        assert_eq!(scene.frame_current(), 0);

        scene.redo().unwrap();
        assert!(scene.anim_data(id).unwrap().tracks[0].mute);
        assert_eq!(scene.frame_current(), 4);
    }

    #[test]
    fn test_ron_round_trip_keeps_structure() {
        let (scene, _) = scene();
        let text = scene.to_ron().unwrap();
        let loaded = Scene::from_ron(&text).unwrap();
        let ball = loaded.object_by_name("Ball").unwrap();
        assert_eq!(ball.anim_data.track_count(), 1);
        assert!(loaded.action_by_name("Bounce").is_some());
    }
}
