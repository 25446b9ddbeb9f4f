//! Progress reporting for batch comparisons.
//!
//! A batch has two stages (loading every shape, then comparing every shape
//! against the reference). Each finished shape triggers one callback so the
//! caller can draw a progress bar or log milestones.
//!
//! ```
//! use voxwork::algo::Progress;
//!
//! let progress = Progress::new(|done, total, shape| {
//!     eprintln!("{}/{} {}", done, total, shape);
//! });
//! progress.report(1, 4, "cube.obj");
//! ```

/// Callback invoked as shapes finish.
///
/// Arguments are `(done, total, label)`, where `label` names the shape that
/// just finished. Calls arrive from worker threads in completion order, so
/// `done` may be observed out of order by a consumer.
pub struct Progress {
    on_step: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Wrap `on_step`.
    pub fn new<F>(on_step: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            on_step: Box::new(on_step),
        }
    }

    /// Forward one update unchanged.
    #[inline]
    pub fn report(&self, done: usize, total: usize, label: &str) {
        (self.on_step)(done, total, label);
    }

    /// Report `done / total` of stage `stage` out of `stages`.
    ///
    /// The whole run is scaled to `stages * 1000` so consumers see a single
    /// increasing counter across stages. Calls with an empty stage are dropped.
    pub fn report_stage(&self, done: usize, total: usize, stage: usize, stages: usize, label: &str) {
        if total == 0 || stages == 0 {
            return;
        }
        let within = done.min(total) * 1000 / total;
        (self.on_step)(stage * 1000 + within, stages * 1000, label);
    }

    /// A reporter that ignores every update.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_report_stage_maps_into_slice() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = Progress::new(move |c, t, _| sink.lock().unwrap().push((c, t)));

        progress.report_stage(1, 2, 1, 2, "half of second stage");
        progress.report_stage(3, 0, 0, 2, "ignored");
        progress.report_stage(5, 4, 0, 2, "clamped");

        assert_eq!(*seen.lock().unwrap(), vec![(1500, 2000), (1000, 2000)]);
    }
}
