//! Randomized delay between page fetches

use crate::{ConfigError, ConfigResult};
use rand::Rng;
use std::time::Duration;

/// Closed interval a delay is drawn from uniformly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    min: Duration,
    max: Duration,
}

impl DelayRange {
    /// Creates a delay range
    ///
    /// # Returns
    ///
    /// * `Ok(DelayRange)` - `min <= max`
    /// * `Err(ConfigError)` - The bounds are reversed
    pub fn new(min: Duration, max: Duration) -> ConfigResult<Self> {
        if min > max {
            return Err(ConfigError::Validation(format!(
                "delay minimum ({}ms) must not exceed maximum ({}ms)",
                min.as_millis(),
                max.as_millis()
            )));
        }
        Ok(Self { min, max })
    }

    /// Creates a delay range from millisecond bounds
    pub fn from_millis(min_ms: u64, max_ms: u64) -> ConfigResult<Self> {
        Self::new(Duration::from_millis(min_ms), Duration::from_millis(max_ms))
    }

    /// A range that never waits
    pub fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Draws a delay uniformly from `[min, max]` at millisecond resolution
    pub fn sample(&self) -> Duration {
        let min_ms = self.min.as_millis() as u64;
        let max_ms = self.max.as_millis() as u64;
        if min_ms >= max_ms {
            return self.min;
        }
        Duration::from_millis(rand::thread_rng().gen_range(min_ms..=max_ms))
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self {
            min: Duration::from_secs(2),
            max: Duration::from_secs(4),
        }
    }
}
