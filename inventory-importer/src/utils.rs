use anyhow::Context;
use inventory_lib::{export_valid_csv, CarRecord};
use log::info;
use std::fs::File;
use std::io::BufWriter;

/// Read an uploaded workbook, refusing anything larger than `max_file_size` bytes
///
/// The size comes from file metadata so an oversized upload is rejected before
/// it is loaded into memory.
pub fn read_upload(path: &str, max_file_size: u64) -> Result<Vec<u8>, anyhow::Error> {
    let metadata =
        std::fs::metadata(path).with_context(|| format!("Unable to open file: {path}"))?;

    if metadata.len() > max_file_size {
        return Err(anyhow::anyhow!(
            "File size exceeds {} limit",
            format_size_limit(max_file_size)
        ));
    }

    let bytes = std::fs::read(path).with_context(|| format!("Unable to read file: {path}"))?;
    return Ok(bytes);
}

/// Whole mebibytes print as "10MB", anything else in bytes
fn format_size_limit(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{bytes} bytes")
    }
}

/// Hand valid records to the persistence side: CSV file and/or JSON on stdout
pub fn export_valid_records(
    records: &[CarRecord],
    csv_path: Option<&str>,
    json: bool,
) -> Result<(), anyhow::Error> {
    if let Some(csv_path) = csv_path {
        let file = File::create(csv_path)
            .with_context(|| format!("Failed to create CSV file: {csv_path}"))?;
        export_valid_csv(records, BufWriter::new(file))?;
        println!("✅ {} valid rows written to {csv_path}", records.len());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
    }

    info!("{} valid rows ready for persistence", records.len());
    Ok(())
}

pub fn write_error_report(path: &str, report: &[u8]) -> Result<(), anyhow::Error> {
    std::fs::write(path, report)
        .with_context(|| format!("Failed to save error report: {path}"))?;
    Ok(())
}

/// One line per rejected row, used for the errors log
pub fn format_rejection_summary(invalid: &[CarRecord]) -> String {
    let mut report = String::new();

    report.push_str("=============================\n");
    report.push_str(&format!("Total rows with errors: {}\n\n", invalid.len()));

    for record in invalid {
        report.push_str(&format!(
            "Row {}: {}\n",
            record.row_number,
            record.error_description()
        ));
    }

    report
}
