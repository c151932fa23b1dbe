//! Stochastic sampler: preparation, parking and demand draws.
//!
//! All functions take the engine's [`SimRng`] explicitly; the sampler itself
//! holds only the validated distributions.  Durations come back in whole
//! seconds, truncated toward zero, matching how the instances were
//! calibrated.

use rand_distr::{Distribution, LogNormal, Normal};

use crate::config::{LogNormalMinutes, MdpParams, PeakConfig};
use crate::time::{DAY_END, SimTime};
use crate::{CoreError, CoreResult, SimRng};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn log_normal(what: &str, p: LogNormalMinutes) -> CoreResult<LogNormal<f64>> {
    if !(p.mu > 0.0) || !(p.sigma >= 1.0) || !p.sigma.is_finite() {
        return Err(CoreError::Config(format!(
            "{what}: log-normal needs mu > 0 and finite sigma >= 1, got mu={} sigma={}",
            p.mu, p.sigma
        )));
    }
    LogNormal::new(p.mu.ln(), p.sigma.ln())
        .map_err(|e| CoreError::Config(format!("{what}: {e}")))
}

fn normal(what: &str, mean: f64, std_dev: f64) -> CoreResult<Normal<f64>> {
    if !mean.is_finite() {
        return Err(CoreError::Config(format!("{what}: mean must be finite, got {mean}")));
    }
    Normal::new(mean, std_dev).map_err(|e| CoreError::Config(format!("{what}: {e}")))
}

/// Mean of a log-normal in whole seconds: `exp(ln mu + (ln sigma)^2 / 2) * 60`.
fn expected_secs(p: LogNormalMinutes) -> u64 {
    let log_sigma = p.sigma.ln();
    ((p.mu.ln() + log_sigma * log_sigma / 2.0).exp() * 60.0) as u64
}

// ── Peak ──────────────────────────────────────────────────────────────────────

/// Validated distributions for one demand peak.
#[derive(Debug, Clone, Copy)]
struct Peak {
    volume: Normal<f64>,
    time:   Normal<f64>,
}

impl Peak {
    fn new(what: &str, p: PeakConfig) -> CoreResult<Self> {
        Ok(Self {
            volume: normal(what, p.volume_mu, p.volume_sigma)?,
            time:   normal(what, p.time_mu, p.time_sigma)?,
        })
    }
}

// ── Sampler ───────────────────────────────────────────────────────────────────

/// Every stochastic draw of a simulated day.
#[derive(Debug, Clone)]
pub struct Sampler {
    cook:                LogNormal<f64>,
    park:                LogNormal<f64>,
    lunch:               Peak,
    dinner:              Peak,
    expected_cook_secs:  u64,
    expected_park_secs:  u64,
}

impl Sampler {
    /// Validate the distribution parameters in `params`.
    pub fn new(params: &MdpParams) -> CoreResult<Self> {
        Ok(Self {
            cook:               log_normal("cook time", params.cook_time)?,
            park:               log_normal("park time", params.park_time)?,
            lunch:              Peak::new("lunch demand", params.lunch)?,
            dinner:             Peak::new("dinner demand", params.dinner)?,
            expected_cook_secs: expected_secs(params.cook_time),
            expected_park_secs: expected_secs(params.park_time),
        })
    }

    /// Forecast preparation time the platform uses for every order.
    #[inline]
    pub fn expected_cook_secs(&self) -> u64 {
        self.expected_cook_secs
    }

    /// Forecast parking time the platform uses for every stop.
    #[inline]
    pub fn expected_park_secs(&self) -> u64 {
        self.expected_park_secs
    }

    /// Realised preparation time of one order.
    pub fn sample_cook_secs(&self, rng: &mut SimRng) -> u64 {
        minutes_to_secs(self.cook.sample(rng.inner()))
    }

    /// Realised parking time at one stop.
    pub fn sample_park_secs(&self, rng: &mut SimRng) -> u64 {
        minutes_to_secs(self.park.sample(rng.inner()))
    }

    /// Number of lunch and dinner orders of the day.
    pub fn sample_day_volume(&self, rng: &mut SimRng) -> (usize, usize) {
        let lunch = self.lunch.volume.sample(rng.inner()).max(0.0) as usize;
        let dinner = self.dinner.volume.sample(rng.inner()).max(0.0) as usize;
        (lunch, dinner)
    }

    /// Sorted order times of the day for the given volumes.
    ///
    /// Lunch times are drawn first, then dinner times.  Draws falling outside
    /// `[0, DAY_END]` are discarded, so the result may be shorter than
    /// `lunch + dinner`.
    pub fn sample_order_times(&self, rng: &mut SimRng, lunch: usize, dinner: usize) -> Vec<SimTime> {
        let mut secs: Vec<i64> = Vec::with_capacity(lunch + dinner);
        for _ in 0..lunch {
            secs.push((self.lunch.time.sample(rng.inner()) * 60.0) as i64);
        }
        for _ in 0..dinner {
            secs.push((self.dinner.time.sample(rng.inner()) * 60.0) as i64);
        }
        secs.sort_unstable();
        secs.into_iter()
            .filter(|&t| (0..=DAY_END as i64).contains(&t))
            .map(|t| SimTime(t as u64))
            .collect()
    }
}

/// Minutes (possibly negative or NaN) to whole, non-negative seconds.
#[inline]
fn minutes_to_secs(minutes: f64) -> u64 {
    (minutes.max(0.0) * 60.0) as u64
}
