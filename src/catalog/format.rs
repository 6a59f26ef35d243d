/// Render a millisecond duration as `MM:SS`, or `HH:MM:SS` from one hour up.
///
/// Sub-second precision is discarded. Zero and negative durations render as `00:00`.
/// Every field is two digits wide below 100 hours; past that the hour field
/// grows as needed (`100:00:00`).
pub fn format_duration(millis: i64) -> String {
    if millis <= 0 {
        return "00:00".to_string();
    }

    let total_seconds = millis / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = (total_seconds % 3600) % 60;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}
