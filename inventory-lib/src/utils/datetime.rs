use chrono::prelude::{Datelike, Local};
use chrono::{Duration, NaiveDate, NaiveDateTime};

pub fn get_utc_iso_datetime() -> String {
    let timestamp = chrono::Utc::now().to_rfc3339();
    return timestamp;
}

/// Calendar year in the local timezone, used as the upper bound for vehicle years
pub fn current_year() -> i32 {
    return Local::now().year();
}

/// Convert an Excel serial date (days since 1899-12-30) to a chrono datetime
///
/// Returns `None` when the serial falls outside the range chrono can represent.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let excel_base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = serial.trunc() as i64;
    let seconds = ((serial - days as f64) * 86400.0).round() as i64;
    excel_base
        .checked_add_signed(Duration::try_days(days)?)?
        .checked_add_signed(Duration::try_seconds(seconds)?)
}
