//! Sample statistics

use std::collections::BTreeMap;

/// Arithmetic mean; `None` for no values
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Quantile `q` in `[0, 1]` with linear interpolation between closest ranks.
///
/// `sorted` must be in ascending order.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let position = (sorted.len() - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Copy of `values` without NaNs, ascending
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Longest stretch of seconds a plotted per-second series covers
pub const MAX_SERIES_SECONDS: i64 = 86_400;

/// Sample count per occupied second; timestamps are epoch milliseconds
pub fn per_second_counts(timestamps_ms: &[i64]) -> BTreeMap<i64, u64> {
    let mut counts = BTreeMap::new();
    for ts in timestamps_ms {
        *counts.entry(ts.div_euclid(1000)).or_insert(0) += 1;
    }
    counts
}

/// Sample count per second, seconds without samples present as zero.
///
/// The series covers the busiest stretch of at most [`MAX_SERIES_SECONDS`],
/// so a stray timestamp far from the run does not stretch it.
pub fn per_second(timestamps_ms: &[i64]) -> Vec<u64> {
    let seconds: Vec<(i64, u64)> = per_second_counts(timestamps_ms).into_iter().collect();
    if seconds.is_empty() {
        return Vec::new();
    }

    let (mut best_start, mut best_end, mut best_total) = (0, 0, 0);
    let (mut start, mut total) = (0, 0);
    for end in 0..seconds.len() {
        total += seconds[end].1;
        while seconds[end].0 - seconds[start].0 >= MAX_SERIES_SECONDS {
            total -= seconds[start].1;
            start += 1;
        }
        if total > best_total {
            (best_start, best_end, best_total) = (start, end, total);
        }
    }

    if best_start > 0 || best_end + 1 < seconds.len() {
        tracing::warn!(
            kept = best_total,
            dropped = timestamps_ms.len() as u64 - best_total,
            "samples outside the busiest {}s stretch left out of the per-second series",
            MAX_SERIES_SECONDS
        );
    }

    let first = seconds[best_start].0;
    let mut series = vec![0u64; (seconds[best_end].0 - first + 1) as usize];
    for &(second, count) in &seconds[best_start..=best_end] {
        series[(second - first) as usize] = count;
    }
    series
}

/// Samples per second from the first to the last timestamp, empty seconds
/// included
pub fn throughput(timestamps_ms: &[i64]) -> Option<f64> {
    let first = timestamps_ms.iter().min()?.div_euclid(1000);
    let last = timestamps_ms.iter().max()?.div_euclid(1000);
    let span_seconds = (last - first + 1) as f64;
    Some(timestamps_ms.len() as f64 / span_seconds)
}

/// Failure share over every full window of `window` outcomes.
///
/// A series shorter than the window yields one value over the whole series.
pub fn rolling_error_rate(outcomes: &[bool], window: usize) -> Vec<f64> {
    if outcomes.is_empty() {
        return Vec::new();
    }
    let window = window.clamp(1, outcomes.len());

    let mut failures = outcomes[..window].iter().filter(|ok| !**ok).count();
    let mut rates = Vec::with_capacity(outcomes.len() - window + 1);
    rates.push(failures as f64 / window as f64);

    for i in window..outcomes.len() {
        if !outcomes[i] {
            failures += 1;
        }
        if !outcomes[i - window] {
            failures -= 1;
        }
        rates.push(failures as f64 / window as f64);
    }
    rates
}

/// Share of `false` outcomes
pub fn error_rate(outcomes: &[bool]) -> Option<f64> {
    if outcomes.is_empty() {
        return None;
    }
    Some(outcomes.iter().filter(|ok| !**ok).count() as f64 / outcomes.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_interpolates() {
        let values = sorted(&[40.0, 10.0, 30.0, 20.0]);
        assert_eq!(quantile(&values, 0.5), Some(25.0));
        assert_eq!(quantile(&values, 0.0), Some(10.0));
        assert_eq!(quantile(&values, 1.0), Some(40.0));
        assert!((quantile(&values, 0.95).unwrap() - 38.5).abs() < 1e-9);
        assert!((quantile(&values, 0.99).unwrap() - 39.7).abs() < 1e-9);
        assert_eq!(quantile(&[7.0], 0.99), Some(7.0));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_per_second_counts_empty_seconds() {
        let timestamps = [1_000, 1_500, 1_999, 4_200];
        assert_eq!(per_second(&timestamps), vec![3, 0, 0, 1]);
        assert_eq!(throughput(&timestamps), Some(1.0));
        assert!(per_second(&[]).is_empty());
        assert_eq!(throughput(&[]), None);
    }

    #[test]
    fn test_stray_timestamp_stays_bounded() {
        let timestamps = [0, 1_700_000_000_000, 1_700_000_000_500, 1_700_000_002_100];
        assert_eq!(per_second(&timestamps), vec![2, 0, 1]);
        assert_eq!(per_second_counts(&timestamps).len(), 3);

        let throughput = throughput(&timestamps).unwrap();
        assert!(throughput > 0.0 && throughput < 1e-8);
    }

    #[test]
    fn test_rolling_error_rate() {
        let outcomes = [true, false, true, true, false];
        assert_eq!(rolling_error_rate(&outcomes, 2), vec![0.5, 0.5, 0.0, 0.5]);
        assert_eq!(rolling_error_rate(&outcomes, 50), vec![0.4]);
        assert!(rolling_error_rate(&[], 50).is_empty());
    }

    #[test]
    fn test_mean_and_error_rate() {
        assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(mean(&[]), None);
        assert_eq!(error_rate(&[true, false, true, true]), Some(0.25));
    }
}
