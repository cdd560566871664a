//! Observer seam for subscribers that render or log progress.

use crate::stats::ProgressStats;

/// Receives lifecycle and update notifications from a tracked operation.
///
/// All methods default to no-ops so implementors override only what they
/// need. Injected at construction; replaces any need to subclass the
/// estimator itself.
pub trait ProgressObserver {
    fn on_begin(&mut self, _stats: &ProgressStats) {}
    fn on_update(&mut self, _stats: &ProgressStats) {}
    fn on_end(&mut self, _stats: &ProgressStats) {}
}

/// Default observer: ignores everything.
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {}

/// Logs progress through `tracing`: begin/end at info, updates at debug.
pub struct LogObserver {
    label: String,
}

impl LogObserver {
    /// `label` tags every event (e.g. a job name).
    pub fn new(label: impl Into<String>) -> Self {
        LogObserver {
            label: label.into(),
        }
    }
}

impl ProgressObserver for LogObserver {
    fn on_begin(&mut self, stats: &ProgressStats) {
        tracing::info!(
            label = %self.label,
            index = stats.index,
            target = ?stats.target,
            "progress started"
        );
    }

    fn on_update(&mut self, stats: &ProgressStats) {
        match stats.eta_secs() {
            Some(eta) => tracing::debug!(
                label = %self.label,
                index = stats.index,
                percent = stats.percent(),
                rate = stats.units_per_sec,
                eta_secs = eta,
                "progress"
            ),
            None => tracing::debug!(
                label = %self.label,
                index = stats.index,
                rate = stats.units_per_sec,
                "progress"
            ),
        }
    }

    fn on_end(&mut self, stats: &ProgressStats) {
        tracing::info!(
            label = %self.label,
            index = stats.index,
            elapsed_secs = stats.elapsed_secs,
            "progress finished"
        );
    }
}
