//! Small descriptive statistics helpers

/// Arithmetic mean, or `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median (mean of the two middle values for even lengths), or `None` for an empty slice
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Population standard deviation divided by the mean.
///
/// `None` when the slice is empty or the mean is not positive.
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    sparse_coefficient_of_variation(values, values.len() as u64)
}

/// Coefficient of variation over `total` observations, of which only `nonzero`
/// are listed; the remaining `total - nonzero.len()` are zero.
///
/// `None` when `total` is smaller than the listed values or the mean is not positive.
pub fn sparse_coefficient_of_variation(nonzero: &[f64], total: u64) -> Option<f64> {
    let listed = nonzero.len() as u64;
    if total == 0 || total < listed {
        return None;
    }
    let n = total as f64;
    let mu = nonzero.iter().sum::<f64>() / n;
    if mu <= 0.0 {
        return None;
    }
    let listed_squares: f64 = nonzero.iter().map(|x| (x - mu).powi(2)).sum();
    let zero_squares = (total - listed) as f64 * mu * mu;
    let variance = (listed_squares + zero_squares) / n;
    Some(variance.sqrt() / mu)
}
