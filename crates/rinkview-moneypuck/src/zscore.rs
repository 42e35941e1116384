// Z-score normalization within comparison pools.

use std::fmt;

// ---------------------------------------------------------------------------
// Position groups
// ---------------------------------------------------------------------------

/// Forwards and defensemen are normalized separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PositionGroup {
    Forward,
    Defense,
}

impl PositionGroup {
    /// `C`, `L` and `R` are forwards; anything else (including blank) is
    /// grouped with defensemen.
    pub fn from_position(position: &str) -> PositionGroup {
        match position.trim() {
            "C" | "L" | "R" => PositionGroup::Forward,
            _ => PositionGroup::Defense,
        }
    }
}

impl fmt::Display for PositionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionGroup::Forward => write!(f, "F"),
            PositionGroup::Defense => write!(f, "D"),
        }
    }
}

// ---------------------------------------------------------------------------
// Pool statistics
// ---------------------------------------------------------------------------

/// Mean and standard deviation for one metric across a pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolStats {
    pub mean: f64,
    pub stdev: f64,
    /// Number of finite values the stats were computed from.
    pub n: usize,
}

/// Threshold below which standard deviation is treated as zero.
const STDEV_EPSILON: f64 = 1e-9;

/// Compute mean and sample standard deviation (n-1 denominator) over the
/// finite values in `values`.
///
/// Returns `None` when fewer than two finite values remain, since the sample
/// deviation is undefined.
pub fn compute_pool_stats(values: &[f64]) -> Option<PoolStats> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.len() < 2 {
        return None;
    }
    let n = finite.len() as f64;
    let mean = finite.iter().sum::<f64>() / n;
    let variance = finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(PoolStats {
        mean,
        stdev: variance.sqrt(),
        n: finite.len(),
    })
}

/// Compute a z-score given a value and pool stats.
///
/// Returns `None` for a non-finite value or a pool with (near) zero spread.
pub fn compute_zscore(value: f64, stats: &PoolStats) -> Option<f64> {
    if !value.is_finite() || stats.stdev < STDEV_EPSILON {
        return None;
    }
    Some((value - stats.mean) / stats.stdev)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn position_groups() {
        assert_eq!(PositionGroup::from_position("C"), PositionGroup::Forward);
        assert_eq!(PositionGroup::from_position("L"), PositionGroup::Forward);
        assert_eq!(PositionGroup::from_position("R"), PositionGroup::Forward);
        assert_eq!(PositionGroup::from_position("D"), PositionGroup::Defense);
        assert_eq!(PositionGroup::from_position(""), PositionGroup::Defense);
        assert_eq!(PositionGroup::Forward.to_string(), "F");
    }

    #[test]
    fn pool_stats_known_values() {
        // Values: [2, 4, 4, 4, 5, 5, 7, 9]
        // Mean = 5.0, sum of squared deviations = 32
        // Sample variance = 32/7
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = compute_pool_stats(&values).unwrap();
        assert!(approx_eq(stats.mean, 5.0, 1e-10));
        assert!(approx_eq(stats.stdev, (32.0f64 / 7.0).sqrt(), 1e-10));
        assert_eq!(stats.n, 8);
    }

    #[test]
    fn pool_stats_skip_non_finite() {
        let stats = compute_pool_stats(&[1.0, f64::NAN, 3.0, f64::INFINITY]).unwrap();
        assert_eq!(stats.n, 2);
        assert!(approx_eq(stats.mean, 2.0, 1e-10));
        assert!(approx_eq(stats.stdev, 2.0f64.sqrt(), 1e-10));
    }

    #[test]
    fn pool_stats_too_small() {
        assert!(compute_pool_stats(&[]).is_none());
        assert!(compute_pool_stats(&[42.0]).is_none());
        assert!(compute_pool_stats(&[42.0, f64::NAN]).is_none());
    }

    #[test]
    fn zscore_known_inputs() {
        let stats = PoolStats { mean: 5.0, stdev: 2.0, n: 10 };
        assert!(approx_eq(compute_zscore(9.0, &stats).unwrap(), 2.0, 1e-10));
        assert!(approx_eq(compute_zscore(1.0, &stats).unwrap(), -2.0, 1e-10));
        assert!(approx_eq(compute_zscore(5.0, &stats).unwrap(), 0.0, 1e-10));
    }

    #[test]
    fn zscore_zero_spread_is_absent() {
        let stats = compute_pool_stats(&[3.0, 3.0, 3.0]).unwrap();
        assert_eq!(compute_zscore(3.0, &stats), None);
        let tiny = PoolStats { mean: 10.0, stdev: 1e-12, n: 2 };
        assert_eq!(compute_zscore(100.0, &tiny), None);
    }

    #[test]
    fn zscore_of_nan_is_absent() {
        let stats = PoolStats { mean: 0.0, stdev: 1.0, n: 3 };
        assert_eq!(compute_zscore(f64::NAN, &stats), None);
    }
}
