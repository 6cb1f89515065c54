//! Coarse time source.
//!
//! Time is measured in whole unix seconds ("units"). It orders summary
//! output, scores deadlines and drives deferred deletions; it is never used
//! for precise scheduling.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current coarse time unit.
pub trait Clock {
    fn now_unit(&self) -> i64;
}

/// Wall clock truncated to seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unit(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
            .unwrap_or(0)
    }
}

/// Manually driven clock.
///
/// Clones share the same instant, so a test can keep one handle and move
/// another into the service.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start_unit: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(start_unit)),
        }
    }

    pub fn set(&self, unit: i64) {
        self.now.store(unit, Ordering::SeqCst);
    }

    /// Moves time forward by `units` and returns the new instant.
    pub fn advance(&self, units: i64) -> i64 {
        self.now.fetch_add(units, Ordering::SeqCst) + units
    }
}

impl Clock for ManualClock {
    fn now_unit(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
