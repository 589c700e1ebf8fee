use chrono::Month;

/// Parses an English month name ("July", "jul") into a [`Month`].
pub fn parse_month_name(name: &str) -> Option<Month> {
    name.trim().parse::<Month>().ok()
}

/// Month names of a fiscal year, starting at `first_month`.
///
/// # Examples
/// - `fiscal_month_labels(Month::July, 3)` gives `["July", "August", "September"]`
/// - `fiscal_month_labels(Month::November, 4)` wraps to
///   `["November", "December", "January", "February"]`
pub fn fiscal_month_labels(first_month: Month, count: usize) -> Vec<String> {
    let mut labels = Vec::with_capacity(count);
    let mut month = first_month;
    for _ in 0..count {
        labels.push(month.name().to_string());
        month = month.succ();
    }
    labels
}

/// Slope of the degree-1 least-squares fit of `values` against their positions 0..n-1.
///
/// Returns `None` with fewer than two points.
pub fn linear_trend_slope(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let n = values.len() as f64;
    let sum_x: f64 = (0..values.len()).map(|i| i as f64).sum();
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = values.iter().enumerate().map(|(i, y)| i as f64 * y).sum();
    let sum_xx: f64 = (0..values.len()).map(|i| (i as f64) * (i as f64)).sum();

    let slope = n.mul_add(sum_xy, -(sum_x * sum_y)) / n.mul_add(sum_xx, -(sum_x * sum_x));
    Some(slope)
}
