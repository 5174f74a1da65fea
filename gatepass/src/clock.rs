// src/clock.rs

//! Wall-clock source for entry timestamps, second precision.

use chrono::{Local, NaiveDateTime, TimeDelta, Timelike};
use std::cell::Cell;

pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Local time with the sub-second part dropped, matching what is persisted.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        let now = Local::now().naive_local();
        now.with_nanosecond(0).unwrap_or(now)
    }
}

/// Settable clock for tests and replays.
#[derive(Debug, Clone)]
pub struct FixedClock(Cell<NaiveDateTime>);

impl FixedClock {
    pub fn new(at: NaiveDateTime) -> Self {
        Self(Cell::new(at))
    }

    pub fn set(&self, at: NaiveDateTime) {
        self.0.set(at);
    }

    pub fn advance(&self, by: TimeDelta) {
        self.0.set(self.0.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}
