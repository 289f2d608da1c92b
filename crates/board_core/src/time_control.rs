//! Search limits and cooperative cancellation.
//!
//! The application and a search worker share one [`TimeControl`]. The
//! worker polls it between nodes or simulations; the application may call
//! [`TimeControl::stop`] at any moment and the worker winds down with its
//! best move so far.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Clock reads happen once per this many nodes unless overridden.
pub const DEFAULT_CHECK_INTERVAL: u64 = 1024;

/// What a single search may spend.
///
/// Depth and time both bound the search; whichever runs out first ends it.
#[derive(Debug, Clone)]
pub struct SearchLimits {
    /// Plies for alpha-beta; unused by MCTS
    pub depth: u32,
    /// Wall-clock allowance for this move
    pub move_time: Option<Duration>,
    pub time_control: TimeControl,
}

impl SearchLimits {
    pub fn depth(depth: u32) -> Self {
        Self::new(depth, None)
    }

    pub fn depth_and_time(depth: u32, move_time: Duration) -> Self {
        Self::new(depth, Some(move_time))
    }

    /// Time-bounded only.
    pub fn time(move_time: Duration) -> Self {
        Self::new(u32::MAX, Some(move_time))
    }

    fn new(depth: u32, move_time: Option<Duration>) -> Self {
        Self {
            depth,
            move_time,
            time_control: TimeControl::new(move_time),
        }
    }

    #[inline]
    pub fn should_stop(&self) -> bool {
        self.time_control.is_stopped()
    }

    /// Start the clock; drivers call this on entry.
    pub fn start(&self) {
        self.time_control.start();
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::depth(4)
    }
}

#[derive(Debug, Default)]
struct Shared {
    stopped: AtomicBool,
    started: Mutex<Option<Instant>>,
}

/// Stop flag plus start clock, shared by every clone.
///
/// `with_time_limit` and `with_check_interval` change only the local view;
/// the flag and the clock stay shared.
#[derive(Debug, Clone)]
pub struct TimeControl {
    shared: Arc<Shared>,
    time_limit: Option<Duration>,
    check_interval: u64,
}

impl TimeControl {
    pub fn new(time_limit: Option<Duration>) -> Self {
        Self {
            shared: Arc::default(),
            time_limit,
            check_interval: DEFAULT_CHECK_INTERVAL,
        }
    }

    pub fn with_check_interval(mut self, nodes: u64) -> Self {
        self.check_interval = nodes.max(1);
        self
    }

    pub fn with_time_limit(mut self, time_limit: Option<Duration>) -> Self {
        self.time_limit = time_limit;
        self
    }

    /// (Re)start the clock. An earlier `stop` stays in effect, so an abort
    /// that arrives before the worker starts is not lost.
    pub fn start(&self) {
        let mut started = self
            .shared
            .started
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *started = Some(Instant::now());
    }

    pub fn stop(&self) {
        self.shared.stopped.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.shared.stopped.load(Ordering::Relaxed)
    }

    /// Read the clock and raise the stop flag once the limit has passed.
    /// Returns true when the search should end.
    pub fn check_time(&self) -> bool {
        if self.is_stopped() {
            return true;
        }
        match self.time_limit {
            Some(limit) if self.elapsed() >= limit => {
                self.stop();
                true
            }
            _ => false,
        }
    }

    /// True on every `check_interval`-th node.
    #[inline]
    pub fn should_check_time(&self, nodes: u64) -> bool {
        nodes.is_multiple_of(self.check_interval)
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// Zero before `start`.
    pub fn elapsed(&self) -> Duration {
        let started = self
            .shared
            .started
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        started.map_or(Duration::ZERO, |s| s.elapsed())
    }

    /// Share of the time limit spent, clamped to `0.0..=1.0`; 0 without a
    /// limit.
    pub fn fraction_used(&self) -> f64 {
        match self.time_limit {
            None => 0.0,
            Some(limit) if limit.is_zero() => 1.0,
            Some(limit) => (self.elapsed().as_secs_f64() / limit.as_secs_f64()).min(1.0),
        }
    }
}

impl Default for TimeControl {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
#[path = "time_control_tests.rs"]
mod time_control_tests;
