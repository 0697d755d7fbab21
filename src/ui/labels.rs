//! Generates human-readable captions from raw data

use std::time::Duration;

/// Amount of captions along the time axis
pub const TIME_CAPTIONS_COUNT: u64 = 7;

/// Generates the captions of the time axis, from the oldest sample (left) to the newest (right)
///
/// The first caption carries the unit, e.g. `["60 seconds", "50", ..., "0"]`.
///
/// # Arguments
/// * `interval`: The duration between two samples
/// * `capacity`: The amount of samples in the graph history
pub fn time_captions(interval: Duration, capacity: usize) -> Vec<String> {
    let total_secs = interval.as_millis() as u64 * capacity.saturating_sub(2) as u64 / 1000;
    let intervals = TIME_CAPTIONS_COUNT - 1;

    (0..TIME_CAPTIONS_COUNT)
        .map(|i| {
            let secs = total_secs - i * total_secs / intervals;

            match i {
                0 => format_seconds(secs),
                _ => secs.to_string(),
            }
        })
        .collect()
}

fn format_seconds(secs: u64) -> String {
    if secs == 1 {
        "1 second".to_string()
    } else {
        format!("{} seconds", secs)
    }
}
