// SPDX-License-Identifier: MIT OR Apache-2.0
//! NLA tracks and strips.

use crate::action::{Action, ActionId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(pub Uuid);

impl TrackId {
    /// Create a new random track ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StripId(pub Uuid);

impl StripId {
    /// Create a new random strip ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StripId {
    fn default() -> Self {
        Self::new()
    }
}

/// How a strip combines with the result of the tracks below it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlendMode {
    /// Override the lower result
    #[default]
    Replace,
    /// Layer on top according to the property kind
    Combine,
    /// Add to the lower result
    Add,
    /// Subtract from the lower result
    Subtract,
    /// Multiply the lower result
    Multiply,
}

impl BlendMode {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Replace => "Replace",
            Self::Combine => "Combine",
            Self::Add => "Add",
            Self::Subtract => "Subtract",
            Self::Multiply => "Multiply",
        }
    }
}

fn default_influence() -> f32 {
    1.0
}

/// A time-bounded reference to an action placed on a track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NlaStrip {
    /// Unique strip ID
    #[serde(default)]
    pub id: StripId,
    /// Strip name
    pub name: String,
    /// First frame on the scene timeline
    pub frame_start: f32,
    /// Last frame on the scene timeline
    pub frame_end: f32,
    /// Action frame played at `frame_start`
    #[serde(default)]
    pub action_frame_start: f32,
    /// Blend mode
    #[serde(default)]
    pub blend_type: BlendMode,
    /// Blend weight against the lower result
    #[serde(default = "default_influence")]
    pub influence: f32,
    /// Whether the strip is selected
    #[serde(default)]
    pub select: bool,
    /// Whether the strip is disabled
    #[serde(default)]
    pub mute: bool,
    /// Referenced action
    pub action: ActionId,
}

impl NlaStrip {
    /// Create a strip playing `action` from `start`, sized to the action's keyed range
    pub fn new(name: impl Into<String>, start: f32, action: &Action) -> Self {
        let (first, last) = action.frame_range();
        Self {
            id: StripId::new(),
            name: name.into(),
            frame_start: start,
            frame_end: start + (last - first).max(1.0),
            action_frame_start: first,
            blend_type: BlendMode::default(),
            influence: 1.0,
            select: false,
            mute: false,
            action: action.id,
        }
    }

    /// Set blend mode
    pub fn with_blend(mut self, blend_type: BlendMode) -> Self {
        self.blend_type = blend_type;
        self
    }

    /// Place the strip on an explicit frame range
    pub fn with_range(mut self, frame_start: f32, frame_end: f32) -> Self {
        self.frame_start = frame_start;
        self.frame_end = frame_end;
        self
    }

    /// Set selection state
    pub fn selected(mut self, select: bool) -> Self {
        self.select = select;
        self
    }

    /// Whether the strip is evaluated at `frame`
    pub fn contains(&self, frame: f32) -> bool {
        self.frame_start <= frame && frame <= self.frame_end
    }

    /// Map a scene frame to the action's local frame
    pub fn action_frame(&self, frame: f32) -> f32 {
        frame - self.frame_start + self.action_frame_start
    }
}

/// An ordered lane of strips
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NlaTrack {
    /// Unique track ID
    #[serde(default)]
    pub id: TrackId,
    /// Track name
    pub name: String,
    /// Whether the track is muted
    #[serde(default)]
    pub mute: bool,
    /// Strips in this track, ordered by start frame
    #[serde(default)]
    pub strips: Vec<NlaStrip>,
}

impl NlaTrack {
    /// Create a new track
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TrackId::new(),
            name: name.into(),
            mute: false,
            strips: Vec::new(),
        }
    }

    /// Add a strip, keeping strips ordered by start frame
    pub fn add_strip(&mut self, strip: NlaStrip) -> StripId {
        let id = strip.id;
        self.insert_sorted(strip);
        id
    }

    /// Create a strip playing `action` from `start`
    pub fn new_strip(&mut self, name: impl Into<String>, start: f32, action: &Action) -> &mut NlaStrip {
        let idx = self.insert_sorted(NlaStrip::new(name, start, action));
        &mut self.strips[idx]
    }

    fn insert_sorted(&mut self, strip: NlaStrip) -> usize {
        let idx = self
            .strips
            .partition_point(|s| s.frame_start <= strip.frame_start);
        self.strips.insert(idx, strip);
        idx
    }

    /// Whether any strip on this track is selected
    pub fn has_selected(&self) -> bool {
        self.strips.iter().any(|s| s.select)
    }
}

/// The NLA track stack of an object, bottom track first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnimData {
    /// Tracks in stack order
    #[serde(default)]
    pub tracks: Vec<NlaTrack>,
}

impl AnimData {
    /// Create a track after the track at `prev`, or on top of the stack.
    ///
    /// Returns the index of the new track.
    pub fn new_track(&mut self, prev: Option<usize>) -> usize {
        let idx = match prev {
            Some(prev) => (prev + 1).min(self.tracks.len()),
            None => self.tracks.len(),
        };
        self.tracks.insert(idx, NlaTrack::new("NlaTrack"));
        idx
    }

    /// Add a track on top of the stack
    pub fn push_track(&mut self, track: NlaTrack) -> TrackId {
        let id = track.id;
        self.tracks.push(track);
        id
    }

    /// Get track count
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Find a strip by ID
    pub fn strip(&self, id: StripId) -> Option<&NlaStrip> {
        self.tracks
            .iter()
            .flat_map(|t| t.strips.iter())
            .find(|s| s.id == id)
    }

    /// Find a strip by ID for modification
    pub fn strip_mut(&mut self, id: StripId) -> Option<&mut NlaStrip> {
        self.tracks
            .iter_mut()
            .flat_map(|t| t.strips.iter_mut())
            .find(|s| s.id == id)
    }

    /// Find a strip by track and strip name
    pub fn find_strip(&self, track: &str, strip: &str) -> Option<&NlaStrip> {
        self.tracks
            .iter()
            .filter(|t| t.name == track)
            .flat_map(|t| t.strips.iter())
            .find(|s| s.name == strip)
    }

    /// Selected strips in track order, then in-track order
    pub fn selected_strips(&self) -> impl Iterator<Item = &NlaStrip> {
        self.tracks
            .iter()
            .flat_map(|t| t.strips.iter())
            .filter(|s| s.select)
    }

    /// Deselect every strip
    pub fn deselect_all(&mut self) {
        for strip in self.tracks.iter_mut().flat_map(|t| t.strips.iter_mut()) {
            strip.select = false;
        }
    }
}
