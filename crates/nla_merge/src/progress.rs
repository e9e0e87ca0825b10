// SPDX-License-Identifier: MIT OR Apache-2.0
//! Percentage progress on top of a host progress bar.

use crate::host::ProgressSink;

/// Accumulates fractional progress and forwards whole percentages.
///
/// The host only hears about a step when the rounded-up counter changes.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    min: i32,
    max: i32,
    counter: f64,
    emitted: i32,
}

impl ProgressReporter {
    /// Start a progress bar over `[min, max]`
    pub fn begin(sink: &mut impl ProgressSink, min: i32, max: i32) -> Self {
        sink.progress_begin(min, max);
        Self {
            min,
            max,
            counter: f64::from(min),
            emitted: min,
        }
    }

    /// Advance the counter by `increment`.
    ///
    /// The emitted value never exceeds `max`, even when rounding drift pushes
    /// the counter slightly past it.
    pub fn update(&mut self, sink: &mut impl ProgressSink, increment: f64) {
        self.counter += increment;
        let next = (self.counter.ceil() as i32).clamp(self.min, self.max);
        if next != self.emitted {
            self.emitted = next;
            sink.progress_update(next);
        }
    }

    /// Close the progress bar
    pub fn end(self, sink: &mut impl ProgressSink) {
        sink.progress_end();
    }

    /// Accumulated, unclamped counter
    pub fn counter(&self) -> f64 {
        self.counter
    }

    /// Last value sent to the host
    pub fn emitted(&self) -> i32 {
        self.emitted
    }
}

/// Progress step per sampled frame; sampling and synthesis each fill half the bar
pub fn frame_increment(frame_count: usize) -> f64 {
    100.0 / (frame_count as f64 * 2.0)
}
