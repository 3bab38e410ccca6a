// reset; cargo run -- --excel-file ./data/inventory.xlsx
// reset; cargo run -- --excel-file ./data/inventory.xlsx --valid-csv ./valid.csv --error-file ./errors.xlsx

use clap::Parser;
use inventory_importer::utils::{
    export_valid_records, format_rejection_summary, read_upload, write_error_report,
};
use inventory_lib::{
    generate_error_report, utils::write_error_to_log, InventoryReader, ERRORS_LOG_FILE,
};

/// Upload limit enforced before the workbook is handed to the parser
const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

#[derive(Parser)]
#[command(name = "inventory-importer")]
#[command(about = "Validate a vehicle-inventory spreadsheet and report the rows that need fixing")]
#[command(version)]
struct Args {
    /// Path to the .xlsx file to import (first sheet, header on row 1)
    #[arg(short, long)]
    excel_file: String,

    /// Where to write the annotated workbook when some rows fail validation
    #[arg(long, default_value = "car-inventory-errors.xlsx")]
    error_file: String,

    /// Optional CSV file receiving the rows that passed validation
    #[arg(long)]
    valid_csv: Option<String>,

    /// Print the rows that passed validation to stdout as JSON
    #[arg(long)]
    json: bool,

    /// Maximum accepted file size in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_FILE_SIZE)]
    max_file_size: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let arguments = Args::parse();

    let bytes = match read_upload(&arguments.excel_file, arguments.max_file_size) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("❌ {e}");
            write_error_to_log("Inventory Upload Error", &e.to_string());
            std::process::exit(1);
        }
    };

    let reader = InventoryReader::default();
    let outcome = match reader.parse(&bytes) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("❌ Import failed with error: {e}");
            eprintln!("❌ Check {} for details.", ERRORS_LOG_FILE);
            write_error_to_log("Inventory Import Error", &e.to_string());
            std::process::exit(1);
        }
    };

    if !outcome.valid.is_empty() {
        export_valid_records(&outcome.valid, arguments.valid_csv.as_deref(), arguments.json)?;
    }

    if let Some(report) = generate_error_report(&outcome.invalid)? {
        write_error_report(&arguments.error_file, &report)?;
        write_error_to_log(
            "Inventory Validation Error Report",
            &format_rejection_summary(&outcome.invalid),
        );

        eprintln!(
            "❌ Validation failed for {} of {} rows",
            outcome.invalid.len(),
            outcome.total_rows()
        );
        eprintln!(
            "❌ Corrected file template written to {}. Check {} for details.",
            arguments.error_file, ERRORS_LOG_FILE
        );
        std::process::exit(1);
    }

    println!("✅ File processed successfully!");
    Ok(())
}
