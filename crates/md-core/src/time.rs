//! Simulation time model.
//!
//! # Design
//!
//! Time is an integer number of seconds since midnight of the simulated day.
//! Demand only ever falls inside `[0, DAY_END]`, but the clock itself may run
//! past midnight while the last orders are still being delivered, so it is
//! stored as `u64` rather than clamped.
//!
//! Durations are plain `u64` seconds.  Every timing quantity that has both a
//! forecast and a realised value is held in a [`Forecast`] so the two
//! timelines can never be mixed up by accident.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Last valid second of a simulated day (23:59:59).
pub const DAY_END: u64 = 86_399;

// ── SimTime ──────────────────────────────────────────────────────────────────

/// An absolute time of day in seconds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimTime(pub u64);

impl SimTime {
    pub const MIDNIGHT: SimTime = SimTime(0);

    /// Seconds elapsed from `earlier` to `self`, or 0 if `earlier` is later.
    #[inline]
    pub fn saturating_since(self, earlier: SimTime) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Signed difference `self - other` in seconds.
    #[inline]
    pub fn signed_since(self, other: SimTime) -> i64 {
        self.0 as i64 - other.0 as i64
    }

    /// Break the time into (day, hour, minute, second) components.
    pub fn dhms(self) -> (u64, u32, u32, u32) {
        let days = self.0 / 86_400;
        let hours = ((self.0 % 86_400) / 3_600) as u32;
        let minutes = ((self.0 % 3_600) / 60) as u32;
        let seconds = (self.0 % 60) as u32;
        (days, hours, minutes, seconds)
    }
}

impl std::ops::Add<u64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: u64) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl std::ops::AddAssign<u64> for SimTime {
    #[inline]
    fn add_assign(&mut self, rhs: u64) {
        self.0 += rhs;
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (d, h, m, s) = self.dhms();
        if d > 0 {
            write!(f, "+{d}d {h:02}:{m:02}:{s:02}")
        } else {
            write!(f, "{h:02}:{m:02}:{s:02}")
        }
    }
}

// ── Forecast ─────────────────────────────────────────────────────────────────

/// Which of the two timelines to read.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Timeline {
    /// What the platform believes; the only value policies ever observe.
    Estimated,
    /// Ground truth the engine advances on.
    Actual,
}

/// A timing quantity carried on both timelines.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Forecast<T> {
    pub estimated: T,
    pub actual:    T,
}

impl<T: Copy> Forecast<T> {
    #[inline]
    pub fn new(estimated: T, actual: T) -> Self {
        Self { estimated, actual }
    }

    /// Same value on both timelines (e.g. deterministic travel times).
    #[inline]
    pub fn exact(value: T) -> Self {
        Self { estimated: value, actual: value }
    }

    #[inline]
    pub fn get(&self, timeline: Timeline) -> T {
        match timeline {
            Timeline::Estimated => self.estimated,
            Timeline::Actual    => self.actual,
        }
    }

    /// Apply `f` to both values.
    #[inline]
    pub fn map<U: Copy>(self, mut f: impl FnMut(T) -> U) -> Forecast<U> {
        Forecast { estimated: f(self.estimated), actual: f(self.actual) }
    }

    /// Combine two forecasts value by value.
    #[inline]
    pub fn zip_with<U: Copy, V: Copy>(
        self,
        other: Forecast<U>,
        mut f: impl FnMut(T, U) -> V,
    ) -> Forecast<V> {
        Forecast {
            estimated: f(self.estimated, other.estimated),
            actual:    f(self.actual, other.actual),
        }
    }
}

impl Forecast<SimTime> {
    /// Shift both timelines later by the matching duration.
    #[inline]
    pub fn shifted(self, by: Forecast<u64>) -> Self {
        self.zip_with(by, |t, d| t + d)
    }
}

impl Forecast<u64> {
    pub const ZERO: Forecast<u64> = Forecast { estimated: 0, actual: 0 };
}

impl std::ops::Add for Forecast<u64> {
    type Output = Forecast<u64>;
    #[inline]
    fn add(self, rhs: Forecast<u64>) -> Forecast<u64> {
        self.zip_with(rhs, |a, b| a + b)
    }
}
