//! Bounded progress tracking on top of the rate estimator.

use std::time::{Duration, Instant};

use crate::config::PacerConfig;
use crate::meter::{Meter, RateEstimator};
use crate::observer::ProgressObserver;
use crate::stats::ProgressStats;
use crate::track::Tracked;

/// Default target when none is declared (the conventional 0..100 scale).
const DEFAULT_MAX: i64 = 100;

/// Progress toward a declared target: percent, remaining and ETA accessors
/// over a [`RateEstimator`].
pub struct Progress {
    meter: RateEstimator,
    max: i64,
}

impl Progress {
    /// New tracker with the default target of 100 units.
    pub fn new(cfg: &PacerConfig) -> Self {
        Self::with_max(cfg, DEFAULT_MAX)
    }

    pub fn with_max(cfg: &PacerConfig, max: i64) -> Self {
        Progress {
            meter: RateEstimator::new(cfg),
            max,
        }
    }

    pub fn with_observer(cfg: &PacerConfig, max: i64, observer: Box<dyn ProgressObserver>) -> Self {
        Progress {
            meter: RateEstimator::with_observer(cfg, observer),
            max,
        }
    }

    /// Record `n` units completed now.
    pub fn observe(&mut self, n: i64) {
        self.observe_at(Instant::now(), n);
    }

    /// Record `n` units completed at a caller-supplied timestamp.
    pub fn observe_at(&mut self, now: Instant, n: i64) {
        let target = Some(self.max);
        self.meter.apply(now, n, target);
    }

    /// Jump to an absolute index. The implied increment may be negative and
    /// is not clamped.
    pub fn goto(&mut self, index: i64) {
        let incr = index - self.meter.index();
        self.observe(incr);
    }

    /// Notify the observer that tracking started, then push one immediate
    /// update so a subscriber can render 0% before the first observation.
    pub fn begin(&mut self) {
        let target = Some(self.max);
        self.meter.begin_with(target);
        self.meter.notify_update(target);
    }

    pub fn end(&mut self) {
        self.meter.end_with(Some(self.max));
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn set_max(&mut self, max: i64) {
        self.max = max;
    }

    /// Units left before the target is reached (never negative).
    pub fn remaining(&self) -> i64 {
        (self.max - self.meter.index()).max(0)
    }

    /// Fraction complete in [0.0, 1.0]. A non-positive target counts as
    /// immediately complete (zero-sized work has nothing left to do).
    pub fn fraction(&self) -> f64 {
        if self.max <= 0 {
            return 1.0;
        }
        (self.meter.index() as f64 / self.max as f64).min(1.0)
    }

    pub fn percent(&self) -> f64 {
        self.fraction() * 100.0
    }

    /// Estimated whole seconds to completion, rounded up so the display never
    /// under-promises; 0 when done or before any rate is established.
    pub fn eta_seconds(&self) -> u64 {
        let remaining = self.remaining();
        if remaining == 0 {
            return 0;
        }
        let rate = self.meter.average_rate();
        if rate <= 0.0 {
            return 0;
        }
        (remaining as f64 / rate).ceil() as u64
    }

    pub fn eta(&self) -> Duration {
        Duration::from_secs(self.eta_seconds())
    }

    /// Cumulative units observed since construction.
    pub fn index(&self) -> i64 {
        self.meter.index()
    }

    /// Smoothed throughput in units per second.
    pub fn average_rate(&self) -> f64 {
        self.meter.average_rate()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.meter.elapsed_secs()
    }

    pub fn elapsed(&self) -> Duration {
        self.meter.elapsed()
    }

    pub fn in_window(&self) -> i64 {
        self.meter.in_window()
    }

    pub fn bucket_count(&self) -> usize {
        self.meter.bucket_count()
    }

    /// Current snapshot, as observers receive it.
    pub fn stats(&self) -> ProgressStats {
        self.meter.stats_at(Instant::now(), Some(self.max))
    }

    /// Wrap an iterator; when its exact length is known it becomes the new
    /// target. Each produced item counts as one unit and `end` fires exactly
    /// once when iteration stops.
    pub fn track<I>(&mut self, iter: I) -> Tracked<'_, Self, I::IntoIter>
    where
        I: IntoIterator,
    {
        let inner = iter.into_iter();
        if let (lo, Some(hi)) = inner.size_hint() {
            if lo == hi {
                self.max = hi as i64;
            }
        }
        Tracked::new(self, inner)
    }
}

impl Meter for Progress {
    fn observe(&mut self, n: i64) {
        Progress::observe(self, n);
    }

    fn begin(&mut self) {
        Progress::begin(self);
    }

    fn end(&mut self) {
        Progress::end(self);
    }
}
