//! Human-readable time formatting
//!
//! Lyric alignment deals in fractional seconds, usually well under an hour,
//! so formats keep sub-second precision.

/// Format selection thresholds (seconds)
const SHORT_FORMAT_MAX: f64 = 100.0; // < 100s → X.XXs
const MEDIUM_FORMAT_MAX: f64 = 6000.0; // < 100m → M:SS.XX

/// Format seconds for display
///
/// - Short format (`X.XXs`): below 100 seconds
/// - Medium format (`M:SS.XX`): below 100 minutes
/// - Long format (`H:MM:SS`): anything longer
///
/// Negative values keep their sign; non-finite values render as `--`.
///
/// # Examples
///
/// ```
/// use hrm_common::human_time::format_seconds;
///
/// assert_eq!(format_seconds(4.5), "4.50s");
/// assert_eq!(format_seconds(125.25), "2:05.25");
/// assert_eq!(format_seconds(7322.0), "2:02:02");
/// assert_eq!(format_seconds(-1.0), "-1.00s");
/// ```
pub fn format_seconds(seconds: f64) -> String {
    if !seconds.is_finite() {
        return "--".to_string();
    }

    let is_negative = seconds < 0.0;
    let abs_seconds = seconds.abs();

    let formatted = if abs_seconds < SHORT_FORMAT_MAX {
        format!("{:.2}s", abs_seconds)
    } else if abs_seconds < MEDIUM_FORMAT_MAX {
        let centis = (abs_seconds * 100.0).round() as u64;
        let minutes = centis / 6000;
        let rem = centis % 6000;
        format!("{}:{:02}.{:02}", minutes, rem / 100, rem % 100)
    } else {
        let whole = abs_seconds.round() as u64;
        let hours = whole / 3600;
        let mins = (whole % 3600) / 60;
        let secs = whole % 60;
        format!("{}:{:02}:{:02}", hours, mins, secs)
    };

    if is_negative {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

/// Format a time range as `start → end`
pub fn format_range(start: f64, end: f64) -> String {
    format!("{} → {}", format_seconds(start), format_seconds(end))
}
