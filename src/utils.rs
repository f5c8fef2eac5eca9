//! Utility functions for log formatting

use std::time::Duration;

/// Render a wait interval for log messages
///
/// Whole-second intervals are shown as days and hours plus the raw seconds,
/// matching how publication pacing is usually discussed ("7d 0h (604800s)").
/// Sub-second intervals are shown in milliseconds.
///
/// # Examples
///
/// ```
/// use batch_deposit::utils::describe_interval;
/// use std::time::Duration;
///
/// assert_eq!(describe_interval(Duration::from_secs(604_800)), "7d 0h (604800s)");
/// assert_eq!(describe_interval(Duration::from_secs(90)), "0d 0h (90s)");
/// ```
pub fn describe_interval(interval: Duration) -> String {
    let secs = interval.as_secs();
    if secs == 0 && !interval.is_zero() {
        return format!("{}ms", interval.as_millis());
    }
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    format!("{days}d {hours}h ({secs}s)")
}
