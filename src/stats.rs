//! Snapshot of tracking state handed to observers.

/// One update's worth of progress state (observer-friendly).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressStats {
    /// Cumulative units observed since tracking started.
    pub index: i64,
    /// Declared target, if the operation is bounded.
    pub target: Option<i64>,
    /// Seconds since tracking started.
    pub elapsed_secs: f64,
    /// Smoothed throughput over the retained window (units per second).
    pub units_per_sec: f64,
}

impl ProgressStats {
    /// Fraction complete in [0.0, 1.0].
    ///
    /// 0 for unbounded operations; a non-positive target counts as
    /// immediately complete.
    pub fn fraction(&self) -> f64 {
        match self.target {
            None => 0.0,
            Some(t) if t <= 0 => 1.0,
            Some(t) => (self.index as f64 / t as f64).min(1.0),
        }
    }

    pub fn percent(&self) -> f64 {
        self.fraction() * 100.0
    }

    /// Estimated seconds remaining (None if unbounded, or if work remains
    /// but no rate is established yet).
    pub fn eta_secs(&self) -> Option<f64> {
        let target = self.target?;
        let remaining = (target - self.index).max(0);
        if remaining == 0 {
            return Some(0.0);
        }
        if self.units_per_sec <= 0.0 {
            return None;
        }
        Some(remaining as f64 / self.units_per_sec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(index: i64, target: Option<i64>, rate: f64) -> ProgressStats {
        ProgressStats {
            index,
            target,
            elapsed_secs: 1.0,
            units_per_sec: rate,
        }
    }

    #[test]
    fn fraction_caps_at_one() {
        let s = stats(150, Some(100), 1.0);
        assert_eq!(s.fraction(), 1.0);
        assert_eq!(s.percent(), 100.0);
    }

    #[test]
    fn unbounded_has_no_eta() {
        let s = stats(10, None, 5.0);
        assert_eq!(s.fraction(), 0.0);
        assert!(s.eta_secs().is_none());
    }

    #[test]
    fn zero_target_is_complete() {
        let s = stats(0, Some(0), 0.0);
        assert_eq!(s.fraction(), 1.0);
        assert_eq!(s.eta_secs(), Some(0.0));
    }

    #[test]
    fn eta_from_rate_and_remaining() {
        let s = stats(20, Some(100), 4.0);
        assert_eq!(s.eta_secs(), Some(20.0));
    }

    #[test]
    fn stalled_rate_means_unknown_eta() {
        let s = stats(20, Some(100), 0.0);
        assert!(s.eta_secs().is_none());
    }
}
