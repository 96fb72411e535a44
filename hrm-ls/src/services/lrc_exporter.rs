//! LRC export
//!
//! Renders an alignment as line-synced LRC for players and the rehearsal UI.

use crate::models::LyricTimestamp;

/// Format seconds as an LRC time tag `[mm:ss.xx]`
///
/// Negative and non-finite times render as `[00:00.00]`.
pub fn format_lrc_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let centis = (seconds * 100.0).round() as u64;
    let minutes = centis / 6000;
    let rem = centis % 6000;
    format!("[{:02}:{:02}.{:02}]", minutes, rem / 100, rem % 100)
}

/// Render timestamps as LRC
///
/// An optional title becomes a `[ti:]` header. A bare time tag after the
/// last line marks where the lyrics end.
pub fn to_lrc(timestamps: &[LyricTimestamp], title: Option<&str>) -> String {
    let mut out = String::new();

    if let Some(title) = title {
        out.push_str(&format!("[ti:{}]\n", title.trim()));
    }

    for ts in timestamps {
        out.push_str(&format_lrc_time(ts.start_time));
        out.push_str(&ts.text);
        out.push('\n');
    }

    if let Some(last) = timestamps.last() {
        out.push_str(&format_lrc_time(last.end_time));
        out.push('\n');
    }

    out
}
