//! Derived metrics over a price series.

/// Number of periods between the two closes compared by
/// [`week_over_week_change`].
pub const WEEK_OVER_WEEK_LOOKBACK: usize = 5;

/// Percentage change of the latest close against the close five periods
/// earlier.
///
/// `closes` must be in ascending time order. Returns `None` when fewer than
/// five closes are available or when the base close is zero. With exactly
/// five closes the oldest one is the base.
///
/// ```
/// use finagent_market_data::metrics::week_over_week_change;
///
/// assert_eq!(week_over_week_change(&[1.0, 2.0, 3.0]), None);
/// let change = week_over_week_change(&[100.0, 101.0, 102.0, 103.0, 104.0, 110.0]).unwrap();
/// assert!((change - 10.0).abs() < 1e-9);
/// ```
pub fn week_over_week_change(closes: &[f64]) -> Option<f64> {
    let n = closes.len();
    if n < WEEK_OVER_WEEK_LOOKBACK {
        return None;
    }
    let last = closes[n - 1];
    let base = closes[n.saturating_sub(WEEK_OVER_WEEK_LOOKBACK + 1)];
    if base == 0.0 || !base.is_finite() || !last.is_finite() {
        return None;
    }
    Some((last - base) / base * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_points() {
        assert_eq!(week_over_week_change(&[]), None);
        assert_eq!(week_over_week_change(&[10.0, 11.0, 12.0, 13.0]), None);
    }

    #[test]
    fn test_six_closes_compare_last_to_first() {
        let closes = [200.0, 190.0, 195.0, 205.0, 210.0, 220.0];
        let change = week_over_week_change(&closes).unwrap();
        assert!((change - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_five_closes_use_oldest() {
        let closes = [50.0, 51.0, 52.0, 53.0, 40.0];
        let change = week_over_week_change(&closes).unwrap();
        assert!((change - -20.0).abs() < 1e-9);
    }

    #[test]
    fn test_longer_series_looks_back_five_periods() {
        let closes = [1.0, 1.0, 100.0, 0.0, 0.0, 0.0, 0.0, 150.0];
        let change = week_over_week_change(&closes).unwrap();
        assert!((change - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_base_is_unavailable() {
        assert_eq!(week_over_week_change(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]), None);
    }
}
