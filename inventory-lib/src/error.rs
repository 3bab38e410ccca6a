use thiserror::Error;

/// Structural failures that abort a whole import
///
/// Field-level problems are never reported through this type; they travel as
/// data on the records (see `FieldIssue`).
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Unable to read workbook: {0}")]
    Unreadable(String),

    #[error("The workbook does not contain any worksheet")]
    MissingWorksheet,

    #[error("Invalid headers. Missing: {}", .missing.join(", "))]
    InvalidHeaders { missing: Vec<&'static str> },

    #[error("Failed to generate error report: {0}")]
    Report(#[from] rust_xlsxwriter::XlsxError),

    #[error("Failed to export valid records: {0}")]
    Export(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::Unreadable(err.to_string())
    }
}
