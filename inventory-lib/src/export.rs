use std::io::Write;

use crate::error::ImportError;
use crate::record::CarRecord;
use crate::schema::{SCHEMA, expected_headers};

/// Write records as CSV for the persistence hand-off
///
/// The header row is the schema field names; each value is rendered with
/// `CellValue`'s `Display` (whole numbers without decimals, ISO dates, empty
/// cells as empty strings).
pub fn export_valid_csv<W: Write>(records: &[CarRecord], writer: W) -> Result<(), ImportError> {
    // Configure CSV writer to quote fields when necessary (e.g., when they contain commas)
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);

    wtr.write_record(expected_headers())?;

    for record in records {
        let csv_record: Vec<String> = SCHEMA
            .iter()
            .map(|spec| record.value(spec.field).to_string())
            .collect();
        wtr.write_record(&csv_record)?;
    }

    wtr.flush()?;

    Ok(())
}
