/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Computes the `p`-quantile of ascending `sorted` values by linear
/// interpolation at index `p * (n - 1)`. Returns 0.0 for empty input.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return sorted[0];
    }

    let idx = p.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }

    sorted[lo] + (sorted[hi] - sorted[lo]) * (idx - lo as f64)
}

/// Rounds to the nearest integer, ties toward positive infinity (`-2.5` gives
/// `-2.0`, `2.5` gives `3.0`). Never returns negative zero.
pub fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    let rounded = if x - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded + 0.0
}

/// Sorts values ascending in place.
pub fn sort_ascending(values: &mut [f64]) {
    values.sort_by(|a, b| a.total_cmp(b));
}
