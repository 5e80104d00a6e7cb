//! Display string for how far through a show a record is.

/// Percentage of `total` covered by `watched`, rendered as `"NN%"`.
///
/// The ratio is floored and computed in floating point. Anything above 100
/// collapses to the literal `"100%"`, while a negative or non-finite ratio
/// (a `total` of zero) reads as `"0%"`.
pub fn calculate_progress(watched: i64, total: i64) -> String {
    let p = (watched as f64 / total as f64 * 100.0).floor();

    if !p.is_finite() {
        "0%".to_string()
    } else if p > 100.0 {
        "100%".to_string()
    } else if p >= 0.0 {
        format!("{}%", p as i64)
    } else {
        "0%".to_string()
    }
}
