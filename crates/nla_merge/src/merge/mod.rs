// SPDX-License-Identifier: MIT OR Apache-2.0
//! Merging selected NLA strips into one baked strip.
//!
//! The merge runs in fixed phases:
//! 1. scan the selection for the frame range, blend mode and tracks to mute
//! 2. mute the tracks that would interfere with sampling
//! 3. sample every animated path on every frame of the range
//! 4. write the samples as linear keyframes on a new action
//! 5. unmute, mute the original strips and add the merged strip on a new track
//!
//! The host's current frame is restored afterwards, also when a phase fails.

pub mod paths;
pub mod rewrite;
pub mod sample;
pub mod scan;
pub mod synth;

use crate::action::ActionId;
use crate::error::{HostError, MergeError, Result};
use crate::host::AnimationHost;
use crate::object::ObjectId;
use crate::operator::{Operator, OperatorOptions, OperatorResult};
use crate::progress::{frame_increment, ProgressReporter};
use crate::track::{BlendMode, StripId};

pub use paths::collect_paths;
pub use scan::{scan, Selection};

/// Stage of a running merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePhase {
    /// Not running
    #[default]
    Idle,
    /// Reading the selection
    Scanning,
    /// Muting interfering tracks
    Muting,
    /// Sampling evaluated values
    Sampling,
    /// Writing the merged action
    Synthesizing,
    /// Updating the track stack
    Rewriting,
}

/// Result of a successful merge
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// Object whose strips were merged
    pub object: ObjectId,
    /// The baked action
    pub action: ActionId,
    /// The strip playing it
    pub strip: StripId,
    /// Index of the track holding the strip
    pub track_index: usize,
    /// Sampled range, end exclusive
    pub frame_range: (i32, i32),
    /// Blend mode of the merged strip
    pub blend_type: BlendMode,
    /// Property paths that were baked
    pub paths: Vec<String>,
}

/// The merge operator
#[derive(Debug, Default)]
pub struct MergeStrips {
    phase: MergePhase,
}

impl MergeStrips {
    /// Operator identifier
    pub const IDNAME: &'static str = "nla_tools.nla_merge_strips";
    /// Menu label
    pub const LABEL: &'static str = "Merge NLA strips";
    /// Tooltip
    pub const DESCRIPTION: &'static str = "Merge multiple NLA strips into one.";

    /// Create an idle operator
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase
    pub fn phase(&self) -> MergePhase {
        self.phase
    }

    /// Whether enough strips are selected to merge
    pub fn can_run<H: AnimationHost>(host: &H) -> bool {
        host.selected_strips().len() > 1
    }

    /// Merge the selected strips of the object owning the first selected strip
    pub fn run<H: AnimationHost>(&mut self, host: &mut H) -> Result<MergeOutcome> {
        let result = self.run_phases(host);
        self.enter(MergePhase::Idle);
        result
    }

    fn enter(&mut self, phase: MergePhase) {
        tracing::debug!("Merge phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    fn run_phases<H: AnimationHost>(&mut self, host: &mut H) -> Result<MergeOutcome> {
        let selected = host.selected_strips();
        if selected.len() < 2 {
            return Err(MergeError::NotEnoughStrips(selected.len()));
        }
        let (object, _) = selected[0];
        let begin_frame = host.frame_current();

        self.enter(MergePhase::Scanning);
        let selection = scan(host.anim_data(object)?)?;
        tracing::info!(
            "Merging {} strips over frames {}..{} as {}",
            selection.strips.len(),
            selection.start,
            selection.end,
            selection.mode.name()
        );

        self.enter(MergePhase::Muting);
        scan::mute_tracks(host.anim_data_mut(object)?, &selection.tracks_to_mute);

        let outcome = match self.bake(host, object, &selection) {
            Ok((action, paths)) => self.rewrite(host, object, &selection, action, paths),
            Err(err) => {
                if let Ok(anim) = host.anim_data_mut(object) {
                    rewrite::unmute_tracks(anim, &selection.tracks_to_mute);
                }
                Err(err)
            }
        };
        host.frame_set(begin_frame);
        outcome
    }

    fn rewrite<H: AnimationHost>(
        &mut self,
        host: &mut H,
        object: ObjectId,
        selection: &Selection,
        action: ActionId,
        paths: Vec<String>,
    ) -> Result<MergeOutcome> {
        self.enter(MergePhase::Rewriting);
        rewrite::unmute_tracks(host.anim_data_mut(object)?, &selection.tracks_to_mute);

        let merged = host.action(action)?.clone();
        let placement = rewrite::place_merged_strip(
            host.anim_data_mut(object)?,
            &selection.strips,
            &merged,
            &selection.merged_name(),
            selection.start,
            selection.mode,
        );
        tracing::info!(
            "Merged into '{}' on track {}",
            merged.name,
            placement.track_index
        );

        Ok(MergeOutcome {
            object,
            action,
            strip: placement.strip,
            track_index: placement.track_index,
            frame_range: (selection.start, selection.end),
            blend_type: selection.mode,
            paths,
        })
    }

    fn bake<H: AnimationHost>(
        &mut self,
        host: &mut H,
        object: ObjectId,
        selection: &Selection,
    ) -> Result<(ActionId, Vec<String>)> {
        let increment = frame_increment(selection.frame_count());
        let mut progress = ProgressReporter::begin(host, 0, 100);
        let result = self.sample_and_synthesize(host, object, selection, &mut progress, increment);
        progress.end(host);
        result
    }

    fn sample_and_synthesize<H: AnimationHost>(
        &mut self,
        host: &mut H,
        object: ObjectId,
        selection: &Selection,
        progress: &mut ProgressReporter,
        increment: f64,
    ) -> Result<(ActionId, Vec<String>)> {
        let paths = {
            let anim = host.anim_data(object)?;
            let mut actions = Vec::with_capacity(selection.strips.len());
            for id in &selection.strips {
                let strip = anim.strip(*id).ok_or(HostError::StripNotFound(*id))?;
                actions.push(host.action(strip.action)?);
            }
            collect_paths(actions)
        };
        if paths.is_empty() {
            tracing::warn!("Selected strips animate no properties");
        }

        self.enter(MergePhase::Sampling);
        let samples = sample::sample_frames(
            host,
            object,
            &paths,
            (selection.start, selection.end),
            progress,
            increment,
        )?;

        self.enter(MergePhase::Synthesizing);
        let action = synth::synthesize(
            host,
            &selection.merged_name(),
            &paths,
            &samples,
            progress,
            increment,
        )?;

        Ok((action, paths))
    }
}

impl<H: AnimationHost> Operator<H> for MergeStrips {
    fn idname(&self) -> &'static str {
        Self::IDNAME
    }

    fn label(&self) -> &'static str {
        Self::LABEL
    }

    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    fn options(&self) -> OperatorOptions {
        OperatorOptions {
            register: true,
            undo: true,
        }
    }

    fn poll(&self, host: &H) -> bool {
        Self::can_run(host)
    }

    fn execute(&mut self, host: &mut H) -> Result<OperatorResult> {
        self.run(host)?;
        Ok(OperatorResult::Finished)
    }
}
