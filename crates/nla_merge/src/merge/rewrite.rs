// SPDX-License-Identifier: MIT OR Apache-2.0
//! Track bookkeeping after baking.

use crate::action::Action;
use crate::track::{AnimData, BlendMode, StripId};

/// Where the merged strip ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Index of the new track
    pub track_index: usize,
    /// The merged strip
    pub strip: StripId,
}

/// Unmute the tracks muted for sampling
pub fn unmute_tracks(anim: &mut AnimData, tracks: &[usize]) {
    for &i in tracks {
        if let Some(track) = anim.tracks.get_mut(i) {
            track.mute = false;
        }
    }
}

/// Mute the original strips and place the merged strip on a new track
/// directly above the highest track that held one of them.
pub fn place_merged_strip(
    anim: &mut AnimData,
    originals: &[StripId],
    action: &Action,
    strip_name: &str,
    start: i32,
    mode: BlendMode,
) -> Placement {
    let mut prev_track = None;
    for (i, track) in anim.tracks.iter_mut().enumerate() {
        for strip in track.strips.iter_mut().filter(|s| originals.contains(&s.id)) {
            strip.mute = true;
            prev_track = Some(i);
        }
    }

    let track_index = anim.new_track(prev_track);
    let track = &mut anim.tracks[track_index];
    track.name = action.name.clone();

    let strip = track.new_strip(strip_name, start as f32, action);
    strip.blend_type = mode;

    Placement {
        track_index,
        strip: strip.id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::Keyframe;
    use crate::track::{NlaStrip, NlaTrack};

    fn merged_action() -> Action {
        let mut action = Action::new("A_merged.001");
        let curve = action.new_fcurve("location", 0);
        for f in 0..20 {
            curve.add_keyframe(Keyframe::new(f as f32, 0.0));
        }
        action
    }

    #[test]
    fn test_places_after_last_selected_track() {
        let source = Action::new("Src");
        let mut anim = AnimData::default();
        let mut ids = Vec::new();
        for name in ["A", "other", "B", "top"] {
            let mut track = NlaTrack::new(name);
            let strip = NlaStrip::new(name, 0.0, &source);
            if name == "A" || name == "B" {
                ids.push(strip.id);
            }
            track.add_strip(strip);
            anim.push_track(track);
        }
        anim.tracks[1].mute = true;
        anim.tracks[3].mute = true;
        unmute_tracks(&mut anim, &[1, 3]);

        let action = merged_action();
        let placement = place_merged_strip(&mut anim, &ids, &action, "A_merged", -4, BlendMode::Combine);

        assert_eq!(placement.track_index, 3);
        assert_eq!(anim.track_count(), 5);
        assert!(anim.tracks.iter().all(|t| !t.mute));
        assert!(anim.strip(ids[0]).unwrap().mute);
        assert!(anim.strip(ids[1]).unwrap().mute);
        assert!(!anim.tracks[1].strips[0].mute);

        let track = &anim.tracks[3];
        assert_eq!(track.name, "A_merged.001");
        let strip = anim.strip(placement.strip).unwrap();
        assert_eq!(strip.name, "A_merged");
        assert_eq!(strip.frame_start, -4.0);
        assert_eq!(strip.frame_end, 15.0);
        assert_eq!(strip.blend_type, BlendMode::Combine);
        assert_eq!(strip.action, action.id);
    }
}
