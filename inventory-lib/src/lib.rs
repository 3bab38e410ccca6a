#![allow(clippy::needless_return)]

mod error;
mod error_report;
mod export;
mod reader;
mod record;
mod schema;
pub mod utils;

// Test utilities - only compiled when testing or with test feature
// #[cfg(test)] alone doesn't work for integration tests (they're external crates)
// The feature flag makes it available to integration tests via dev-dependencies
#[cfg(any(test, feature = "test"))]
pub mod test_utils;

pub use error::ImportError;
pub use error_report::{ERROR_SHEET_NAME, generate_error_report, report_headers};
pub use export::export_valid_csv;
pub use reader::{InventoryReader, InventoryReaderBuilder, ValidationOutcome, parse_workbook};
pub use record::{CarRecord, CellValue};
pub use schema::{
    ERROR_DESCRIPTION_HEADER, FIELD_COUNT, Field, FieldIssue, FieldRule, FieldSpec, MIN_YEAR,
    SCHEMA, ValidationContext, expected_headers,
};

pub const ERRORS_LOG_FILE: &str = "errors.log";
