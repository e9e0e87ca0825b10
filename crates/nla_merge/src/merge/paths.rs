// SPDX-License-Identifier: MIT OR Apache-2.0
//! Collecting the animated property paths of the selected strips.

use crate::action::Action;
use indexmap::IndexSet;

/// Unique property paths animated by `actions`, in first-seen order.
///
/// A path is taken from its component-0 curve only, so vector properties
/// appear once.
pub fn collect_paths<'a>(actions: impl IntoIterator<Item = &'a Action>) -> Vec<String> {
    let mut paths: IndexSet<String> = IndexSet::new();
    for action in actions {
        for curve in action.fcurves.iter().filter(|c| c.array_index == 0) {
            if !paths.contains(curve.data_path.as_str()) {
                paths.insert(curve.data_path.clone());
            }
        }
    }
    paths.into_iter().collect()
}
