// Area-weighted statistics over blocks.
//
// Both functions take accessor closures so the same code serves the
// assessed and extrapolated views of a block.

/// Number of steps in a percentile table: 0 through 100 inclusive.
pub const PERCENTILE_STEPS: usize = 101;

/// `Σ (weight_i / Σ weight) × value_i`.
///
/// Returns `0.0` for empty input or a non-positive total weight.
pub fn weighted_average<T>(data: &[T], weight: impl Fn(&T) -> f64, value: impl Fn(&T) -> f64) -> f64 {
    let weight_sum: f64 = data.iter().map(&weight).sum();
    if weight_sum <= 0.0 {
        return 0.0;
    }
    data.iter()
        .map(|d| (weight(d) / weight_sum) * value(d))
        .sum()
}

/// Weighted order statistic: the value of the first datum at which the
/// running share of total weight reaches `p`.
///
/// `data` must already be sorted ascending by `value`. `p <= 0` gives the
/// first value and `p >= 1` the last; empty input gives `0.0`.
pub fn weighted_percentile<T>(
    data: &[T],
    weight: impl Fn(&T) -> f64,
    value: impl Fn(&T) -> f64,
    p: f64,
) -> f64 {
    let (Some(first), Some(last)) = (data.first(), data.last()) else {
        return 0.0;
    };
    if p <= 0.0 {
        return value(first);
    }
    if p >= 1.0 {
        return value(last);
    }

    let weight_sum: f64 = data.iter().map(&weight).sum();
    if weight_sum <= 0.0 {
        return value(last);
    }

    let mut running = 0.0;
    for datum in data {
        running += weight(datum);
        if running / weight_sum >= p {
            return value(datum);
        }
    }
    // Rounding can leave the running share a hair under p.
    value(last)
}

/// Percentiles 0, 1, ..., 100 of `data`; index 50 is the median.
pub fn percentile_table<T>(
    data: &[T],
    weight: impl Fn(&T) -> f64,
    value: impl Fn(&T) -> f64,
) -> Vec<f64> {
    (0..PERCENTILE_STEPS)
        .map(|i| weighted_percentile(data, &weight, &value, 0.01 * i as f64))
        .collect()
}

/// Sort ascending by `key`, the precondition of [`weighted_percentile`].
pub fn sort_by_value<T>(data: &mut [T], key: impl Fn(&T) -> f64) {
    data.sort_by(|a, b| key(a).total_cmp(&key(b)));
}
