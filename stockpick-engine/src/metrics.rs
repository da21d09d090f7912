//! Technical metrics derived from price/volume history.
//!
//! All functions are total: short or empty input yields 0, which callers
//! treat as "undefined" since real closes are always positive.

use crate::data::{PricePoint, StockSnapshot};

/// Default lookback for [`true_range_volatility`].
pub const DEFAULT_ATR_LOOKBACK: usize = 14;

/// Arithmetic mean of the last `period` values, or 0 when fewer exist.
pub fn moving_average(series: &[f64], period: usize) -> f64 {
    if period == 0 || series.len() < period {
        return 0.0;
    }
    let window = &series[series.len() - period..];
    window.iter().sum::<f64>() / period as f64
}

/// Mean of the `window` volumes preceding the most recent one.
///
/// This is the baseline "today" is compared against, so the latest point is
/// excluded. Needs `window + 1` points, else 0.
pub fn average_volume(series: &[f64], window: usize) -> f64 {
    if window == 0 || series.len() < window + 1 {
        return 0.0;
    }
    let end = series.len() - 1;
    let baseline = &series[end - window..end];
    baseline.iter().sum::<f64>() / window as f64
}

/// Latest volume divided by the preceding `window`-day average, or 0.
pub fn volume_ratio(series: &[f64], window: usize) -> f64 {
    let avg = average_volume(series, window);
    match series.last() {
        Some(&today) if avg > 0.0 => today / avg,
        _ => 0.0,
    }
}

/// Mean true range over `lookback` days divided by the latest close.
pub fn true_range_volatility(klines: &[PricePoint], lookback: usize) -> f64 {
    if lookback == 0 || klines.len() < lookback + 1 {
        return 0.0;
    }
    let latest_close = klines[klines.len() - 1].close;
    if latest_close <= 0.0 {
        return 0.0;
    }

    let start = klines.len() - lookback - 1;
    let tr_sum: f64 = klines[start..]
        .windows(2)
        .map(|w| w[1].true_range(w[0].close))
        .sum();

    (tr_sum / lookback as f64) / latest_close
}

/// The moving averages the scorers and alert engine look at.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MovingAverages {
    pub ma5: f64,
    pub ma20: f64,
    pub ma60: f64,
}

impl MovingAverages {
    pub fn of(snapshot: &StockSnapshot) -> Self {
        let closes = snapshot.closes();
        Self {
            ma5: moving_average(&closes, 5),
            ma20: moving_average(&closes, 20),
            ma60: moving_average(&closes, 60),
        }
    }

    /// Whether all three averages are defined.
    pub fn all_defined(&self) -> bool {
        self.ma5 > 0.0 && self.ma20 > 0.0 && self.ma60 > 0.0
    }

    /// Highest of the three averages.
    pub fn max(&self) -> f64 {
        self.ma5.max(self.ma20).max(self.ma60)
    }

    /// MA5 and MA60 both within `tolerance` (fraction) of MA20.
    pub fn converged_within(&self, tolerance: f64) -> bool {
        if !self.all_defined() {
            return false;
        }
        let near = |ma: f64| ((ma - self.ma20) / self.ma20).abs() <= tolerance;
        near(self.ma5) && near(self.ma60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;

    fn bars(closes: &[f64]) -> Vec<PricePoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PricePoint {
                date: start + Duration::days(i as i64),
                open: c,
                high: c + 1.0,
                low: c - 1.0,
                close: c,
            })
            .collect()
    }

    #[test]
    fn test_moving_average_short_series_is_zero() {
        assert_eq!(moving_average(&[1.0, 2.0, 3.0], 5), 0.0);
        assert_eq!(moving_average(&[], 1), 0.0);
        assert_eq!(moving_average(&[1.0], 0), 0.0);
    }

    #[test]
    fn test_moving_average_uses_last_points() {
        let series = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert!((moving_average(&series, 3) - 5.0).abs() < 1e-9);
        assert!((moving_average(&series, 6) - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_average_volume_excludes_today() {
        // 20 days of 1000 then a 5000 spike today.
        let mut vols = vec![1000.0; 20];
        vols.push(5000.0);
        assert!((average_volume(&vols, 20) - 1000.0).abs() < 1e-9);
        assert!((volume_ratio(&vols, 20) - 5.0).abs() < 1e-9);

        // 20 points is one short of a full baseline.
        assert_eq!(average_volume(&vols[1..], 20), 0.0);
        assert_eq!(volume_ratio(&vols[1..], 20), 0.0);
    }

    #[test]
    fn test_true_range_volatility() {
        // Flat closes with +/-1 range: TR = 2 every day.
        let klines = bars(&[100.0; 15]);
        let vol = true_range_volatility(&klines, DEFAULT_ATR_LOOKBACK);
        assert!((vol - 0.02).abs() < 1e-9);

        assert_eq!(true_range_volatility(&klines[..14], DEFAULT_ATR_LOOKBACK), 0.0);
    }

    #[test]
    fn test_moving_averages_convergence() {
        let mas = MovingAverages {
            ma5: 102.0,
            ma20: 100.0,
            ma60: 98.0,
        };
        assert!(mas.converged_within(0.03));
        assert!(!mas.converged_within(0.01));
        assert!((mas.max() - 102.0).abs() < 1e-9);

        let undefined = MovingAverages {
            ma60: 0.0,
            ..mas
        };
        assert!(!undefined.converged_within(0.03));
    }

    proptest! {
        #[test]
        fn prop_moving_average_matches_mean(
            series in proptest::collection::vec(1.0f64..1000.0, 1..120),
            period in 1usize..130,
        ) {
            let ma = moving_average(&series, period);
            if period > series.len() {
                prop_assert_eq!(ma, 0.0);
            } else {
                let tail = &series[series.len() - period..];
                let mean = tail.iter().sum::<f64>() / period as f64;
                prop_assert!((ma - mean).abs() < 1e-6);
            }
        }
    }
}
