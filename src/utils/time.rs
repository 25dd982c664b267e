use chrono::{Duration, Local};

pub const DATE_FMT: &str = "%Y-%m-%d";

/// Date range ending today and reaching back `days` calendar days, formatted
/// the way the timeseries endpoint expects.
pub fn trailing_window(days: i64) -> (String, String) {
    let end = Local::now().date_naive();
    let start = end - Duration::days(days);
    (
        start.format(DATE_FMT).to_string(),
        end.format(DATE_FMT).to_string(),
    )
}
