// SPDX-License-Identifier: MIT OR Apache-2.0
//! Selection scanning: which strips, which range, which blend mode.

use crate::error::{MergeError, Result};
use crate::track::{AnimData, BlendMode, StripId};

/// What the selected strips of one object add up to
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Selected strips in track order, then in-track order
    pub strips: Vec<StripId>,
    /// Name of the first selected strip
    pub first_name: String,
    /// Blend mode of the merged strip
    pub mode: BlendMode,
    /// First sampled frame
    pub start: i32,
    /// End of the sampled range (exclusive)
    pub end: i32,
    /// Indices of tracks to mute while sampling
    pub tracks_to_mute: Vec<usize>,
}

impl Selection {
    /// Number of sampled frames
    pub fn frame_count(&self) -> usize {
        (self.end - self.start) as usize
    }

    /// Name for the merged action
    pub fn merged_name(&self) -> String {
        format!("{}_merged", self.first_name)
    }
}

/// Scan the track stack for selected strips.
///
/// A REPLACE strip anywhere in the selection makes the result REPLACE;
/// otherwise the last scanned strip decides. Every track that neither holds a
/// selected strip nor is already muted gets listed for muting, except tracks
/// below the lowest selected track when the result is REPLACE.
pub fn scan(anim: &AnimData) -> Result<Selection> {
    let mut strips = Vec::new();
    let mut first_name = None;
    let mut mode = BlendMode::Combine;
    let mut start = i32::MAX;
    let mut end = i32::MIN;
    let mut selected_tracks = Vec::new();

    for (i, track) in anim.tracks.iter().enumerate() {
        let mut found = false;
        for strip in track.strips.iter().filter(|s| s.select) {
            found = true;
            strips.push(strip.id);
            first_name.get_or_insert_with(|| strip.name.clone());

            start = start.min(strip.frame_start.floor() as i32);
            end = end.max(strip.frame_end.ceil() as i32);

            if strip.blend_type == BlendMode::Replace || mode != BlendMode::Replace {
                mode = strip.blend_type;
            }
        }
        if found {
            selected_tracks.push(i);
        }
    }

    let (Some(first_name), Some(&lowest)) = (first_name, selected_tracks.first()) else {
        return Err(MergeError::NotEnoughStrips(0));
    };
    if end <= start {
        return Err(MergeError::EmptyRange { start, end });
    }

    let tracks_to_mute = anim
        .tracks
        .iter()
        .enumerate()
        .filter(|(i, track)| {
            !track.mute
                && !selected_tracks.contains(i)
                && !(mode == BlendMode::Replace && *i < lowest)
        })
        .map(|(i, _)| i)
        .collect();

    Ok(Selection {
        strips,
        first_name,
        mode,
        start,
        end,
        tracks_to_mute,
    })
}

/// Mute the listed tracks
pub fn mute_tracks(anim: &mut AnimData, tracks: &[usize]) {
    for &i in tracks {
        if let Some(track) = anim.tracks.get_mut(i) {
            track.mute = true;
        }
    }
}
