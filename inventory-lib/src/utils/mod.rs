mod datetime;
mod filesystem;
mod string;

pub use datetime::{current_year, excel_serial_to_datetime, get_utc_iso_datetime};
pub use filesystem::write_error_to_log;
pub use string::{normalize_cell_text, normalize_header, normalize_string};
