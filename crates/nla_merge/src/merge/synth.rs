// SPDX-License-Identifier: MIT OR Apache-2.0
//! Re-encoding sampled values as a new action.

use crate::action::{ActionId, FCurve};
use crate::error::{MergeError, Result};
use crate::host::AnimationHost;
use crate::keyframe::{Extrapolation, InterpolationMode, Keyframe};
use crate::merge::sample::FrameSamples;
use crate::progress::ProgressReporter;

/// Build an action with one linear curve per path component.
///
/// Keyframes sit on the action's own frames `0..samples.len()`. The number of
/// components of a path is taken from its first sample.
pub fn synthesize<H: AnimationHost>(
    host: &mut H,
    name: &str,
    paths: &[String],
    samples: &FrameSamples,
    progress: &mut ProgressReporter,
    frame_increment: f64,
) -> Result<ActionId> {
    let action_id = host.new_action(name);
    let frame_count = samples.len();
    let mut fcurves = Vec::new();

    for (i, path) in paths.iter().enumerate() {
        let shape = samples.first().map_or(1, |row| row[i].component_count());
        let step = frame_increment / paths.len() as f64;

        let mut curves: Vec<FCurve> = (0..shape)
            .map(|k| {
                let mut curve = FCurve::new(path.as_str(), k);
                curve.extrapolation = Extrapolation::Linear;
                curve.resize(frame_count);
                curve
            })
            .collect();

        let mut broadcast = false;
        for (frame, row) in samples.iter().enumerate() {
            progress.update(host, step);

            let value = &row[i];
            broadcast |= shape > 1 && value.is_scalar();
            for (idx, curve) in curves.iter_mut().enumerate() {
                let y = value.component(idx).ok_or_else(|| MergeError::ShapeMismatch {
                    path: path.clone(),
                    frame,
                    index: idx,
                })?;
                curve.keyframes[frame] = Keyframe {
                    frame: frame as f32,
                    value: y,
                    interpolation: InterpolationMode::Linear,
                };
            }
        }
        if broadcast {
            tracing::warn!("Scalar samples of '{path}' spread over {shape} components");
        }

        fcurves.extend(curves);
    }

    host.action_mut(action_id)?.fcurves.extend(fcurves);
    Ok(action_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;
    use crate::value::PropertyValue;

    fn run(paths: &[&str], samples: FrameSamples) -> (Scene, Result<ActionId>) {
        let mut scene = Scene::new();
        let paths: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
        let mut progress = ProgressReporter::begin(&mut scene, 0, 100);
        let result = synthesize(&mut scene, "Walk_merged", &paths, &samples, &mut progress, 10.0);
        (scene, result)
    }

    #[test]
    fn test_fans_out_vector_paths() {
        let samples = vec![
            vec![PropertyValue::from([0.0, 1.0, 2.0]), PropertyValue::Scalar(5.0)],
            vec![PropertyValue::from([3.0, 4.0, 5.0]), PropertyValue::Scalar(6.0)],
        ];
        let (scene, result) = run(&["location", "alpha"], samples);
        let action = scene.action(result.unwrap()).unwrap();

        assert_eq!(action.name, "Walk_merged");
        assert_eq!(action.fcurves.len(), 4);

        let y = action.fcurve("location", 2).unwrap();
        assert_eq!(y.extrapolation, Extrapolation::Linear);
        assert_eq!(y.keyframes[1].value, 5.0);

        let alpha = action.fcurve("alpha", 0).unwrap();
        let frames: Vec<f32> = alpha.keyframes.iter().map(|k| k.frame).collect();
        assert_eq!(frames, [0.0, 1.0]);
        assert!(alpha
            .keyframes
            .iter()
            .all(|k| k.interpolation == InterpolationMode::Linear));
    }

    #[test]
    fn test_scalar_sample_broadcasts() {
        let samples = vec![
            vec![PropertyValue::from([1.0, 2.0])],
            vec![PropertyValue::Scalar(7.0)],
        ];
        let (scene, result) = run(&["scale"], samples);
        let action = scene.action(result.unwrap()).unwrap();
        assert_eq!(action.fcurve("scale", 0).unwrap().keyframes[1].value, 7.0);
        assert_eq!(action.fcurve("scale", 1).unwrap().keyframes[1].value, 7.0);
    }

    #[test]
    fn test_short_vector_is_rejected() {
        let samples = vec![
            vec![PropertyValue::from([1.0, 2.0, 3.0])],
            vec![PropertyValue::from([1.0])],
        ];
        let (_, result) = run(&["location"], samples);
        assert!(matches!(
            result,
            Err(MergeError::ShapeMismatch { frame: 1, index: 1, .. })
        ));
    }

    #[test]
    fn test_progress_covers_half_the_bar() {
        let samples = vec![vec![PropertyValue::Scalar(0.0)]; 5];
        let mut scene = Scene::new();
        let paths = vec!["alpha".to_string()];
        let mut progress = ProgressReporter::begin(&mut scene, 0, 100);
        synthesize(&mut scene, "Clip", &paths, &samples, &mut progress, 10.0).unwrap();
        assert_eq!(progress.emitted(), 50);
    }
}
