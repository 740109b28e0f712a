//! Running Statistics
//!
//! Online mean and population variance over every price seen so far.
//! Nothing is buffered: each update folds one price into three accumulators.
//!
//! The deviation term added at step t uses the mean *including* the price
//! at t, and the first sample contributes no deviation. This is not Welford's
//! algorithm and will not match a batch variance for n > 1; the backtest
//! relies on this exact recurrence.

use serde::{Deserialize, Serialize};

/// Snapshot of the statistics after one update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSnapshot {
    pub mean: f64,
    pub std_dev: f64,
    pub z_score: f64,
}

/// Cumulative accumulator for the inclusive-mean Z-score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningStats {
    count: u64,
    sum: f64,
    sum_of_squared_deviations: f64,
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `price` into the accumulators and return the statistics at this
    /// step, including the Z-score of `price` itself.
    pub fn update(&mut self, price: f64) -> StatsSnapshot {
        self.count += 1;
        self.sum += price;
        let mean = self.sum / self.count as f64;

        // First sample: std and z pinned to 0
        if self.count == 1 {
            return StatsSnapshot {
                mean,
                std_dev: 0.0,
                z_score: 0.0,
            };
        }

        let deviation = price - mean;
        self.sum_of_squared_deviations += deviation * deviation;
        let std_dev = self.std_dev();

        let z_score = if std_dev == 0.0 {
            0.0
        } else {
            deviation / std_dev
        };

        StatsSnapshot {
            mean,
            std_dev,
            z_score,
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn sum_of_squared_deviations(&self) -> f64 {
        self.sum_of_squared_deviations
    }

    /// Mean of all prices seen; 0 before the first update
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum / self.count as f64
    }

    /// Accumulated squared deviations divided by the sample count
    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum_of_squared_deviations / self.count as f64
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_stats() {
        let stats = RunningStats::new();
        assert_eq!(stats.count(), 0);
        assert_eq!(stats.mean(), 0.0);
        assert_eq!(stats.variance(), 0.0);
    }

    #[test]
    fn test_first_sample_is_neutral() {
        let mut stats = RunningStats::new();
        let snap = stats.update(42.0);
        assert_eq!(snap.mean, 42.0);
        assert_eq!(snap.std_dev, 0.0);
        assert_eq!(snap.z_score, 0.0);
        assert_eq!(stats.sum_of_squared_deviations(), 0.0);
    }

    #[test]
    fn test_inclusive_mean_recurrence() {
        let mut stats = RunningStats::new();
        stats.update(10.0);
        let snap = stats.update(12.0);

        // mean includes 12: (10 + 12) / 2 = 11, deviation 1, var = 1 / 2
        assert_relative_eq!(snap.mean, 11.0);
        assert_relative_eq!(snap.std_dev, 0.5_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(snap.z_score, 1.0 / 0.5_f64.sqrt(), epsilon = 1e-12);

        let snap = stats.update(8.0);
        // mean 10, deviation -2, accumulated 1 + 4 = 5 over 3 samples
        assert_relative_eq!(snap.mean, 10.0);
        assert_relative_eq!(stats.sum_of_squared_deviations(), 5.0);
        assert_relative_eq!(snap.std_dev, (5.0_f64 / 3.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_constant_prices_zero_z() {
        let mut stats = RunningStats::new();
        for _ in 0..5 {
            let snap = stats.update(50.0);
            assert_eq!(snap.std_dev, 0.0);
            assert_eq!(snap.z_score, 0.0);
        }
        assert_eq!(stats.mean(), 50.0);
    }

    #[test]
    fn test_nan_propagates() {
        let mut stats = RunningStats::new();
        stats.update(1.0);
        let snap = stats.update(f64::NAN);
        assert!(snap.mean.is_nan());
        assert!(snap.z_score.is_nan());
    }

    #[test]
    fn test_reset() {
        let mut stats = RunningStats::new();
        stats.update(1.0);
        stats.update(2.0);
        stats.reset();
        assert_eq!(stats, RunningStats::default());
    }
}
