use crate::db::UserRatings;

/// Fewer shared items than this yield a neutral similarity
pub const MIN_SHARED_ITEMS: usize = 2;

/// Spread below this fraction of a user's squared ratings counts as rounding
/// noise, i.e. the user rated every shared item the same
const VARIANCE_TOLERANCE: f64 = 1e-12;

/// Pearson correlation between two users over the items both have rated
///
/// Returns 0 when fewer than two items are shared or when either user's
/// shared ratings have zero variance. The result is clamped to [-1, 1] so
/// rounding error never escapes the correlation range.
pub fn pearson(first: &UserRatings, second: &UserRatings) -> f64 {
    let shared: Vec<(f64, f64)> = first
        .iter()
        .filter_map(|(item, &r1)| second.get(item).map(|&r2| (r1, r2)))
        .collect();

    let n = shared.len();
    if n < MIN_SHARED_ITEMS {
        return 0.0;
    }

    let n = n as f64;
    let mean1 = shared.iter().map(|&(r1, _)| r1).sum::<f64>() / n;
    let mean2 = shared.iter().map(|&(_, r2)| r2).sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance1 = 0.0;
    let mut variance2 = 0.0;
    let mut scale1 = 0.0;
    let mut scale2 = 0.0;

    for &(r1, r2) in &shared {
        let d1 = r1 - mean1;
        let d2 = r2 - mean2;
        covariance += d1 * d2;
        variance1 += d1 * d1;
        variance2 += d2 * d2;
        scale1 += r1 * r1;
        scale2 += r2 * r2;
    }

    if is_flat(variance1, scale1) || is_flat(variance2, scale2) {
        return 0.0;
    }

    let denominator = (variance1 * variance2).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }

    (covariance / denominator).clamp(-1.0, 1.0)
}

fn is_flat(variance: f64, scale: f64) -> bool {
    variance <= VARIANCE_TOLERANCE * scale
}
