//! Windowed rate estimator for open-ended operations.

use std::time::{Duration, Instant};

use crate::config::PacerConfig;
use crate::observer::{NoopObserver, ProgressObserver};
use crate::stats::ProgressStats;
use crate::track::Tracked;
use crate::window::SmaWindow;

/// Mutation seam shared by [`RateEstimator`] and
/// [`Progress`](crate::progress::Progress); what [`Tracked`] drives.
pub trait Meter {
    fn observe(&mut self, n: i64);
    fn begin(&mut self);
    fn end(&mut self);
}

/// Estimates throughput for an open-ended stream of work units.
///
/// Keeps a bounded, time-bucketed history of observed increments (geometry
/// from [`PacerConfig::sma_window`] and [`PacerConfig::sma_delta_secs`]) and
/// derives a smoothed units-per-second average from it. Single-threaded by
/// design: callers needing concurrent tracking keep one estimator per worker
/// or serialize access externally.
pub struct RateEstimator {
    start: Instant,
    last: Instant,
    index: i64,
    window: SmaWindow,
    observer: Box<dyn ProgressObserver>,
}

impl RateEstimator {
    /// New estimator with no observer attached. `cfg` is assumed validated
    /// (see [`PacerConfig::validate`]).
    pub fn new(cfg: &PacerConfig) -> Self {
        Self::with_observer(cfg, Box::new(NoopObserver))
    }

    pub fn with_observer(cfg: &PacerConfig, observer: Box<dyn ProgressObserver>) -> Self {
        let now = Instant::now();
        RateEstimator {
            start: now,
            last: now,
            index: 0,
            window: SmaWindow::new(cfg.sma_window, cfg.sma_delta()),
            observer,
        }
    }

    /// Record `n` units completed now. `n` is not validated; a negative
    /// value (e.g. from a backwards [`goto`](crate::progress::Progress::goto))
    /// decreases the totals accordingly.
    pub fn observe(&mut self, n: i64) {
        self.observe_at(Instant::now(), n);
    }

    /// Record `n` units completed at a caller-supplied timestamp. Useful for
    /// replayed logs and deterministic tests; timestamps are expected to be
    /// monotonically non-decreasing.
    pub fn observe_at(&mut self, now: Instant, n: i64) {
        self.apply(now, n, None);
    }

    pub(crate) fn apply(&mut self, now: Instant, n: i64, target: Option<i64>) {
        self.last = now;
        self.window.record(now, n);
        self.index += n;
        let stats = self.stats_at(now, target);
        self.observer.on_update(&stats);
    }

    /// Notify the observer that tracking started.
    pub fn begin(&mut self) {
        self.begin_with(None);
    }

    /// Notify the observer that tracking finished.
    pub fn end(&mut self) {
        self.end_with(None);
    }

    pub(crate) fn begin_with(&mut self, target: Option<i64>) {
        tracing::debug!(index = self.index, "tracking started");
        let stats = self.stats_at(Instant::now(), target);
        self.observer.on_begin(&stats);
    }

    pub(crate) fn end_with(&mut self, target: Option<i64>) {
        tracing::debug!(index = self.index, "tracking finished");
        let stats = self.stats_at(Instant::now(), target);
        self.observer.on_end(&stats);
    }

    pub(crate) fn notify_update(&mut self, target: Option<i64>) {
        let stats = self.stats_at(Instant::now(), target);
        self.observer.on_update(&stats);
    }

    /// Smoothed throughput in units per second; 0 before any observation.
    pub fn average_rate(&self) -> f64 {
        self.window.rate(self.last, self.start)
    }

    /// Whole seconds since construction, truncated.
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs_at(Instant::now())
    }

    pub fn elapsed_secs_at(&self, now: Instant) -> u64 {
        now.saturating_duration_since(self.start).as_secs()
    }

    /// Elapsed time as a whole-second `Duration` (same truncation as
    /// [`elapsed_secs`](Self::elapsed_secs)).
    pub fn elapsed(&self) -> Duration {
        Duration::from_secs(self.elapsed_secs())
    }

    /// Cumulative units observed since construction.
    pub fn index(&self) -> i64 {
        self.index
    }

    /// Sum of counts across retained buckets.
    pub fn in_window(&self) -> i64 {
        self.window.in_window()
    }

    /// Number of retained buckets (never exceeds `sma_window`).
    pub fn bucket_count(&self) -> usize {
        self.window.len()
    }

    /// Current snapshot, as observers receive it.
    pub fn stats(&self) -> ProgressStats {
        self.stats_at(Instant::now(), None)
    }

    pub(crate) fn stats_at(&self, now: Instant, target: Option<i64>) -> ProgressStats {
        ProgressStats {
            index: self.index,
            target,
            elapsed_secs: now.saturating_duration_since(self.start).as_secs_f64(),
            units_per_sec: self.window.rate(self.last, self.start),
        }
    }

    /// Wrap an iterator so each produced item counts as one unit; `end` fires
    /// exactly once when iteration stops, including early break or unwind.
    pub fn track<I>(&mut self, iter: I) -> Tracked<'_, Self, I::IntoIter>
    where
        I: IntoIterator,
    {
        Tracked::new(self, iter.into_iter())
    }
}

impl Meter for RateEstimator {
    fn observe(&mut self, n: i64) {
        RateEstimator::observe(self, n);
    }

    fn begin(&mut self) {
        RateEstimator::begin(self);
    }

    fn end(&mut self) {
        RateEstimator::end(self);
    }
}
