// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame-by-frame sampling of the evaluated property values.

use crate::error::Result;
use crate::host::AnimationHost;
use crate::object::ObjectId;
use crate::progress::ProgressReporter;
use crate::value::PropertyValue;

/// One row per sampled frame, one value per collected path
pub type FrameSamples = Vec<Vec<PropertyValue>>;

/// Sample every path on every frame in `start..end`.
///
/// The host hands out owned copies, so a row never changes after the frame
/// moves on.
pub fn sample_frames<H: AnimationHost>(
    host: &mut H,
    object: ObjectId,
    paths: &[String],
    (start, end): (i32, i32),
    progress: &mut ProgressReporter,
    increment: f64,
) -> Result<FrameSamples> {
    let mut samples = Vec::with_capacity((end - start).max(0) as usize);

    for frame in start..end {
        host.frame_set(frame);
        progress.update(host, increment);

        let row = paths
            .iter()
            .map(|path| host.path_resolve(object, path))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        samples.push(row);
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::keyframe::{InterpolationMode, Keyframe};
    use crate::object::AnimatedObject;
    use crate::scene::Scene;
    use crate::track::{NlaStrip, NlaTrack};

    fn scene() -> (Scene, ObjectId) {
        let mut action = Action::new("Slide");
        let curve = action.new_fcurve("location", 0);
        curve.add_keyframe(Keyframe::new(0.0, 0.0).with_interpolation(InterpolationMode::Linear));
        curve.add_keyframe(Keyframe::new(4.0, 8.0));

        let mut track = NlaTrack::new("Track");
        track.add_strip(NlaStrip::new("Slide", 0.0, &action));
        let mut obj = AnimatedObject::new("Box")
            .with_property("location", [0.0, 1.0, 0.0])
            .with_property("alpha", 0.5);
        obj.anim_data.push_track(track);

        let mut scene = Scene::new();
        scene.add_action(action);
        let id = scene.add_object(obj);
        (scene, id)
    }

    #[test]
    fn test_samples_each_frame() {
        let (mut scene, id) = scene();
        let paths = vec!["location".to_string(), "alpha".to_string()];
        let mut progress = ProgressReporter::begin(&mut scene, 0, 100);

        let samples = sample_frames(&mut scene, id, &paths, (0, 4), &mut progress, 12.5).unwrap();

        assert_eq!(samples.len(), 4);
        assert_eq!(samples[3][0], PropertyValue::Vector(vec![6.0, 1.0, 0.0]));
        assert!(samples.iter().all(|row| row[1] == PropertyValue::Scalar(0.5)));
        assert_eq!(scene.frame_current(), 3);
        assert_eq!(progress.emitted(), 50);
    }

    #[test]
    fn test_unresolved_path_aborts() {
        let (mut scene, id) = scene();
        let paths = vec!["missing".to_string()];
        let mut progress = ProgressReporter::begin(&mut scene, 0, 100);
        assert!(sample_frames(&mut scene, id, &paths, (0, 2), &mut progress, 25.0).is_err());
    }
}
