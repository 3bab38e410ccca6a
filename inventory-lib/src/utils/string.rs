/// Normalize text by replacing control characters with spaces and collapsing whitespace
///
/// Header cells typed by hand often carry stray newlines or double spaces
/// ("error\ndescription", "  Mileage "), this folds them into a single canonical form.
pub fn normalize_string(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Canonical form of a header cell: whitespace-normalized and lower-cased
pub fn normalize_header(value: &str) -> String {
    normalize_string(value).to_lowercase()
}

/// Canonical form of a data cell: trimmed and lower-cased, inner spacing untouched
pub fn normalize_cell_text(value: &str) -> String {
    value.trim().to_lowercase()
}
