// Test utilities available to both unit and integration tests
// Only compiled when testing

use rust_xlsxwriter::Workbook;

use crate::error_report::{ReportFormats, write_cell};
use crate::record::CellValue;
use crate::schema::expected_headers;

/// Build an in-memory xlsx workbook with one sheet: `headers` on row 1, then `rows`
///
/// Text cells are written verbatim (no normalization) and empty values are left
/// out, the way a user-authored spreadsheet would look.
#[allow(dead_code)]
pub fn workbook_bytes(headers: &[&str], rows: &[Vec<CellValue>]) -> Vec<u8> {
    let formats = ReportFormats::new();
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (column, header) in headers.iter().enumerate() {
        worksheet
            .write_string(0, column as u16, *header)
            .unwrap();
    }
    for (offset, row) in rows.iter().enumerate() {
        for (column, value) in row.iter().enumerate() {
            write_cell(
                worksheet,
                offset as u32 + 1,
                column as u16,
                value,
                false,
                &formats,
            )
            .unwrap();
        }
    }

    workbook.save_to_buffer().unwrap()
}

/// The seven schema headers in canonical order
#[allow(dead_code)]
pub fn canonical_headers() -> Vec<&'static str> {
    expected_headers().collect()
}

#[allow(dead_code)]
pub fn text(value: &str) -> CellValue {
    CellValue::Text(value.to_string())
}

#[allow(dead_code)]
pub fn num(value: f64) -> CellValue {
    CellValue::Number(value)
}

/// A row in canonical column order
#[allow(dead_code)]
pub fn car_row(
    make: &str,
    model: &str,
    year: CellValue,
    price: CellValue,
    mileage: CellValue,
    color: &str,
    vin: &str,
) -> Vec<CellValue> {
    vec![
        text(make),
        text(model),
        year,
        price,
        mileage,
        text(color),
        text(vin),
    ]
}

/// A row that passes every rule for any current year >= 2021
#[allow(dead_code)]
pub fn valid_row() -> Vec<CellValue> {
    car_row(
        "Toyota",
        "Corolla",
        num(2021.0),
        num(18000.0),
        num(30000.0),
        "",
        "1HGCM82633A004352",
    )
}
