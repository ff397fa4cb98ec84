// Copyright (c) 2025 - Cowboy AI, Inc.
//! Clocks - Sources of origin timestamps
//!
//! Every freshly originated event is stamped by the clock of the stream node
//! that publishes it. Production code uses [`SystemClock`]; tests of
//! time-sensitive operators such as `debounce` use [`ManualClock`] to move
//! time explicitly.

use chrono::{Duration, Utc};
use parking_lot::Mutex;
use std::fmt::Debug;

use super::Timestamp;

/// Source of the current time
pub trait Clock: Debug + Send + Sync {
    /// Current time according to this clock
    fn now(&self) -> Timestamp;
}

/// Wall-clock time via `chrono::Utc::now`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    /// Start the clock at `start`
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Jump to `time`
    pub fn set(&self, time: Timestamp) {
        *self.now.lock() = time;
    }

    /// Move forward by `step`
    pub fn advance(&self, step: Duration) {
        let mut now = self.now.lock();
        *now += step;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Timestamp::default())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock()
    }
}
