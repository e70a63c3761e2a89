//! Clip length labels.

/// Format a length in seconds as `M:SS`, or `H:MM:SS` from one hour up.
///
/// The value is rounded to the nearest second first. Returns `None` when
/// nothing is left to show (zero, negative or not a number), so the badge can
/// be hidden.
pub fn format_duration(total_seconds: f64) -> Option<String> {
    if !total_seconds.is_finite() {
        return None;
    }
    let rounded = total_seconds.round();
    if rounded <= 0.0 {
        return None;
    }

    let seconds = rounded as u64;
    let (hours, minutes, secs) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);

    if hours > 0 {
        Some(format!("{}:{:02}:{:02}", hours, minutes, secs))
    } else {
        Some(format!("{}:{:02}", minutes, secs))
    }
}
