//! End-to-end scenarios for the estimator and bounded progress API.
//!
//! All timing is synthetic: observations are driven through `observe_at` with
//! instants derived from a single base, never sleeps.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;
use std::time::{Duration, Instant};

use pacer::config::{self, PacerConfig};
use pacer::meter::RateEstimator;
use pacer::observer::ProgressObserver;
use pacer::progress::Progress;
use pacer::stats::ProgressStats;

struct Recorder(Rc<RefCell<Vec<String>>>);

impl ProgressObserver for Recorder {
    fn on_begin(&mut self, stats: &ProgressStats) {
        self.0.borrow_mut().push(format!("begin:{}", stats.index));
    }

    fn on_update(&mut self, stats: &ProgressStats) {
        self.0.borrow_mut().push(format!("update:{}", stats.index));
    }

    fn on_end(&mut self, stats: &ProgressStats) {
        self.0.borrow_mut().push(format!("end:{}", stats.index));
    }
}

fn xorshift(state: &mut u64) -> u64 {
    *state ^= *state << 13;
    *state ^= *state >> 7;
    *state ^= *state << 17;
    *state
}

#[test]
fn random_schedule_keeps_window_bounded_and_index_exact() {
    let cfg = PacerConfig::default();
    let mut m = RateEstimator::new(&cfg);
    let base = Instant::now();

    let mut state = 0x9e3779b97f4a7c15_u64;
    let mut at = Duration::ZERO;
    let mut expected_index = 0i64;
    for _ in 0..1000 {
        // Gaps from 0 to 699ms straddle the 300ms bucket width both ways.
        at += Duration::from_millis(xorshift(&mut state) % 700);
        let n = (xorshift(&mut state) % 5) as i64;
        m.observe_at(base + at, n);
        expected_index += n;

        assert!(m.bucket_count() <= cfg.sma_window);
        assert_eq!(m.index(), expected_index);
        assert!(m.average_rate().is_finite());
        assert!(m.in_window() <= expected_index);
    }
}

#[test]
fn burst_of_simultaneous_observations_stays_finite() {
    let cfg = PacerConfig::default();
    let mut m = RateEstimator::new(&cfg);
    let t = Instant::now() + Duration::from_secs(3);
    for _ in 0..100 {
        m.observe_at(t, 1);
    }
    assert_eq!(m.bucket_count(), 1);
    assert_eq!(m.in_window(), 100);
    assert_eq!(m.index(), 100);
    let rate = m.average_rate();
    assert!(rate.is_finite());
    assert!(rate > 0.0);
}

#[test]
fn tracked_run_fires_hooks_in_order() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut p = Progress::with_observer(
        &PacerConfig::default(),
        100,
        Box::new(Recorder(events.clone())),
    );

    p.begin();
    let doubled: Vec<i32> = p.track(vec![1, 2, 3, 4, 5]).map(|x| x * 2).collect();

    assert_eq!(doubled, vec![2, 4, 6, 8, 10]);
    assert_eq!(p.max(), 5);
    assert_eq!(p.index(), 5);
    assert_eq!(p.percent(), 100.0);

    let events = events.borrow();
    assert_eq!(events.first().map(String::as_str), Some("begin:0"));
    assert_eq!(events.last().map(String::as_str), Some("end:5"));
    assert_eq!(events.iter().filter(|e| e.starts_with("end")).count(), 1);
    // begin's immediate update plus one per item.
    assert_eq!(events.iter().filter(|e| e.starts_with("update")).count(), 6);
}

#[test]
fn early_break_still_fires_end_once() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut p = Progress::with_observer(
        &PacerConfig::default(),
        100,
        Box::new(Recorder(events.clone())),
    );

    for x in p.track(0..5) {
        if x == 2 {
            break;
        }
    }

    assert_eq!(p.max(), 5);
    assert_eq!(p.index(), 3);
    let events = events.borrow();
    assert_eq!(events.iter().filter(|e| e.starts_with("end")).count(), 1);
    assert_eq!(events.last().map(String::as_str), Some("end:3"));
}

#[test]
fn config_on_disk_drives_window_geometry() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    writeln!(f, "sma_window = 4\nsma_delta_secs = 0.5").unwrap();
    let cfg = config::load_from_path(f.path()).unwrap();

    let mut m = RateEstimator::new(&cfg);
    let base = Instant::now();
    for i in 0..20u64 {
        m.observe_at(base + Duration::from_secs(i), 1);
    }
    assert_eq!(m.bucket_count(), 4);
    assert_eq!(m.in_window(), 4);
    assert_eq!(m.index(), 20);
}

#[test]
fn elapsed_accessor_round_trips_through_duration() {
    let m = RateEstimator::new(&PacerConfig::default());
    let now = Instant::now() + Duration::from_millis(5400);
    let secs = m.elapsed_secs_at(now);
    assert_eq!(secs, 5);
    assert_eq!(Duration::from_secs(secs).as_secs(), secs);
    assert_eq!(m.elapsed(), Duration::from_secs(m.elapsed_secs()));
}

#[test]
fn slowdown_shows_up_as_the_window_ages_out() {
    let cfg = PacerConfig::default();
    let mut m = RateEstimator::new(&cfg);
    let base = Instant::now();

    // Fast phase: 10 units/sec for 5 seconds.
    for i in 0..5u64 {
        m.observe_at(base + Duration::from_secs(i), 10);
    }
    let fast = m.average_rate();

    // Slow phase: 1 unit/sec; the fast buckets age out of the 10-slot window.
    for i in 5..25u64 {
        m.observe_at(base + Duration::from_secs(i), 1);
    }
    let slow = m.average_rate();

    assert!(fast > slow);
    assert!((slow - 10.0 / 9.0).abs() < 1e-9);
}
