pub mod error;
pub mod timeunit;

use std::time::Duration;

/// Formats an elapsed time the way the tracking pages display it,
/// `[Hhr ][MMm ]SSs`. Minutes are zero padded only when hours are shown.
pub fn format_elapsed(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    let seconds = (millis / 1000) % 60;
    let minutes = (millis / (60 * 1000)) % 60;
    let hours = millis / (3600 * 1000);

    let mut timestamp = String::new();
    if hours > 0 {
        timestamp.push_str(&format!("{}hr", hours));
    }
    if hours > 0 && minutes < 10 {
        timestamp.push_str(&format!(" 0{}m", minutes));
    } else if hours > 0 || minutes > 0 {
        timestamp.push_str(&format!(" {}m", minutes));
    }
    timestamp.push_str(&format!(" {:02}s", seconds));
    timestamp
}
