use inventory_lib::{CarRecord, CellValue, InventoryReader};

// Re-export shared test utilities from src/test_utils.rs
pub use inventory_lib::test_utils::{
    canonical_headers, car_row, num, text, valid_row, workbook_bytes,
};

/// Reference year used by every test reader so boundary tests stay deterministic
#[allow(dead_code)]
pub const TEST_YEAR: i32 = 2024;

#[allow(dead_code)]
pub fn test_reader() -> InventoryReader {
    InventoryReader::builder().current_year(TEST_YEAR).build()
}

/// Parse `rows` under the canonical header and return the outcome
#[allow(dead_code)]
pub fn parse_rows(rows: &[Vec<CellValue>]) -> inventory_lib::ValidationOutcome {
    let bytes = workbook_bytes(&canonical_headers(), rows);
    test_reader().parse(&bytes).unwrap()
}

/// A valid row with a single field replaced (canonical column position)
#[allow(dead_code)]
pub fn valid_row_with(position: usize, value: CellValue) -> Vec<CellValue> {
    let mut row = valid_row();
    row[position] = value;
    row
}

/// Error messages of a record, in schema order
#[allow(dead_code)]
pub fn messages(record: &CarRecord) -> Vec<String> {
    record
        .field_errors
        .iter()
        .flat_map(|errors| errors.values())
        .map(|issue| issue.to_string())
        .collect()
}
