//! Time-bucketed moving window behind the rate estimate.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Increments accumulated within one `sma_delta`-wide time slice.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Bucket {
    pub(crate) at: Instant,
    pub(crate) count: i64,
}

/// Bounded oldest-first bucket window.
///
/// The average is `in_window / (last - oldest.at)`: the denominator is the
/// wall-clock separation across the whole retained window, not the tiny gap
/// between adjacent calls, so a burst of near-simultaneous observations
/// cannot blow the estimate up.
#[derive(Debug)]
pub(crate) struct SmaWindow {
    buckets: VecDeque<Bucket>,
    capacity: usize,
    delta: Duration,
    in_window: i64,
}

impl SmaWindow {
    pub(crate) fn new(capacity: usize, delta: Duration) -> Self {
        SmaWindow {
            buckets: VecDeque::with_capacity(capacity + 1),
            capacity,
            delta,
            in_window: 0,
        }
    }

    /// Record `n` units observed at `now`.
    ///
    /// Accumulates into the newest bucket while `now` is within `delta` of
    /// it, otherwise opens a new bucket; evicts the oldest bucket once the
    /// window is over capacity. Invariant: `in_window` equals the sum of all
    /// retained bucket counts, and the window never exceeds `capacity`.
    pub(crate) fn record(&mut self, now: Instant, n: i64) {
        match self.buckets.back_mut() {
            Some(newest) if now <= newest.at + self.delta => newest.count += n,
            _ => self.buckets.push_back(Bucket { at: now, count: n }),
        }
        self.in_window += n;

        if self.buckets.len() > self.capacity {
            if let Some(evicted) = self.buckets.pop_front() {
                self.in_window -= evicted.count;
                tracing::trace!(count = evicted.count, "evicted oldest bucket");
            }
        }

        debug_assert!(self.buckets.len() <= self.capacity);
        debug_assert_eq!(
            self.in_window,
            self.buckets.iter().map(|b| b.count).sum::<i64>()
        );
    }

    /// Sum of counts across retained buckets.
    pub(crate) fn in_window(&self) -> i64 {
        self.in_window
    }

    pub(crate) fn len(&self) -> usize {
        self.buckets.len()
    }

    pub(crate) fn oldest_at(&self) -> Option<Instant> {
        self.buckets.front().map(|b| b.at)
    }

    /// Average units per second across the retained window.
    ///
    /// An empty window yields 0 (no observations is not an error). A
    /// zero-length span (the whole window coalesced into one bucket at a
    /// single instant) falls back to the separation since `start`, and to 0
    /// if that is also zero, so the value stays finite.
    pub(crate) fn rate(&self, last: Instant, start: Instant) -> f64 {
        if self.in_window <= 0 {
            return 0.0;
        }
        let Some(oldest) = self.oldest_at() else {
            return 0.0;
        };
        let mut span = last.saturating_duration_since(oldest).as_secs_f64();
        if span <= 0.0 {
            span = last.saturating_duration_since(start).as_secs_f64();
        }
        if span <= 0.0 {
            0.0
        } else {
            self.in_window as f64 / span
        }
    }
}
