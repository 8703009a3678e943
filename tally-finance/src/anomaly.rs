//! Deviation-from-mean outlier detection over a numeric series.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::aggregator::PeriodTotal;
use crate::stats;

pub const DEFAULT_THRESHOLD: Decimal = dec!(1.5);

/// A flagged bucket with its distance from the series mean
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodAnomaly {
    pub index: usize,
    pub label: String,
    pub total: Decimal,
    pub deviation: Decimal,
}

/// Flags points further than `k` population standard deviations from the mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnomalyDetector {
    k: Decimal,
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self {
            k: DEFAULT_THRESHOLD,
        }
    }
}

impl AnomalyDetector {
    pub fn new(k: Decimal) -> Self {
        Self { k }
    }

    pub fn threshold(&self) -> Decimal {
        self.k
    }

    /// Ascending 0-based indices `i` with `|series[i] - mean| > k * std_dev`.
    /// A flat series (std_dev == 0) flags nothing, and so does a series whose
    /// deviation or limit falls outside `Decimal` range.
    pub fn detect(&self, series: &[Decimal]) -> Vec<usize> {
        let (Some(mu), Some(sigma)) = (stats::mean(series), stats::std_dev(series)) else {
            return Vec::new();
        };
        if sigma.is_zero() {
            return Vec::new();
        }
        let Some(limit) = self.k.checked_mul(sigma) else {
            return Vec::new();
        };

        // std_dev succeeded, so every x - mu fits
        series
            .iter()
            .enumerate()
            .filter(|(_, x)| (**x - mu).abs() > limit)
            .map(|(i, _)| i)
            .collect()
    }

    /// Detect over calendar bucket totals, keeping the bucket labels
    pub fn detect_periods(&self, totals: &[PeriodTotal]) -> Vec<PeriodAnomaly> {
        let series: Vec<Decimal> = totals.iter().map(|p| p.total).collect();
        let Some(mu) = stats::mean(&series) else {
            return Vec::new();
        };

        self.detect(&series)
            .into_iter()
            .map(|i| PeriodAnomaly {
                index: i,
                label: totals[i].label.clone(),
                total: totals[i].total,
                deviation: totals[i].total - mu,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[i64]) -> Vec<Decimal> {
        values.iter().copied().map(Decimal::from).collect()
    }

    #[test]
    fn test_monthly_spending_sample() {
        // mean 1450, sigma ~167.705; largest deviation 250 < 1.5 * sigma
        let s = series(&[1200, 1350, 1250, 1400, 1600, 1500, 1700, 1600]);
        assert_eq!(AnomalyDetector::default().detect(&s), Vec::<usize>::new());
        assert_eq!(AnomalyDetector::new(dec!(1.0)).detect(&s), vec![0, 2, 6]);
    }

    #[test]
    fn test_flat_series_flags_nothing() {
        let s = series(&[700, 700, 700, 700]);
        for k in [dec!(0.01), dec!(1), dec!(1.5), dec!(10)] {
            assert!(AnomalyDetector::new(k).detect(&s).is_empty());
        }
    }

    #[test]
    fn test_single_spike() {
        let s = series(&[100, 100, 100, 100, 100, 100, 100, 1000]);
        assert_eq!(AnomalyDetector::default().detect(&s), vec![7]);
    }

    #[test]
    fn test_out_of_range_series_flags_nothing() {
        let wide = vec![dec!(0), dec!(0), dec!(1000000000000000)];
        assert!(AnomalyDetector::new(dec!(0.1)).detect(&wide).is_empty());

        // sigma fits but k * sigma does not
        let s = series(&[100, 100, 100, 1000]);
        assert!(AnomalyDetector::new(Decimal::MAX).detect(&s).is_empty());
    }

    #[test]
    fn test_short_series() {
        assert!(AnomalyDetector::default().detect(&[]).is_empty());
        assert!(AnomalyDetector::default().detect(&series(&[42])).is_empty());
    }
}
