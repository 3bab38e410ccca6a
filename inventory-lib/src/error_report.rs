//! Rebuilds the rejected rows into a fresh workbook the user can correct and resubmit

use log::info;
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet, XlsxError};
use std::iter;

use crate::error::ImportError;
use crate::record::{CarRecord, CellValue};
use crate::schema::{ERROR_DESCRIPTION_HEADER, SCHEMA};

pub const ERROR_SHEET_NAME: &str = "Errors";

/// Marker color for offending cells
const ERROR_BORDER_COLOR: u32 = 0xFF0000;

const DATE_FORMAT: &str = "yyyy-mm-dd";

/// The report header: the schema columns followed by "error description"
pub fn report_headers() -> impl Iterator<Item = &'static str> {
    SCHEMA
        .iter()
        .map(|spec| spec.field.name())
        .chain(iter::once(ERROR_DESCRIPTION_HEADER))
}

/// Cell formats shared by every row of a report
pub(crate) struct ReportFormats {
    header: Format,
    plain: Format,
    marker: Format,
    date: Format,
    marker_date: Format,
}

impl ReportFormats {
    pub(crate) fn new() -> Self {
        let marker = Format::new()
            .set_border(FormatBorder::Thin)
            .set_border_color(Color::RGB(ERROR_BORDER_COLOR));

        ReportFormats {
            header: Format::new().set_bold(),
            plain: Format::new(),
            date: Format::new().set_num_format(DATE_FORMAT),
            marker_date: marker.clone().set_num_format(DATE_FORMAT),
            marker,
        }
    }
}

/// Build the error-report workbook for the given invalid records
///
/// Returns `Ok(None)` when there is nothing to report, so callers never ship an
/// empty workbook.
pub fn generate_error_report(invalid: &[CarRecord]) -> Result<Option<Vec<u8>>, ImportError> {
    if invalid.is_empty() {
        return Ok(None);
    }

    let headers: Vec<&'static str> = report_headers().collect();
    let formats = ReportFormats::new();

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(ERROR_SHEET_NAME)?;

    write_header(worksheet, &headers, &formats)?;
    for (offset, record) in invalid.iter().enumerate() {
        write_record(worksheet, offset as u32 + 1, record, &headers, &formats)?;
    }
    worksheet.autofit();

    let buffer = workbook.save_to_buffer()?;
    info!(
        "Generated error report with {} rows ({} bytes)",
        invalid.len(),
        buffer.len()
    );

    Ok(Some(buffer))
}

fn write_header(
    ws: &mut Worksheet,
    headers: &[&'static str],
    formats: &ReportFormats,
) -> Result<(), XlsxError> {
    for (column, header) in headers.iter().enumerate() {
        ws.write_string_with_format(0, column as u16, *header, &formats.header)?;
    }
    Ok(())
}

fn write_record(
    ws: &mut Worksheet,
    row: u32,
    record: &CarRecord,
    headers: &[&'static str],
    formats: &ReportFormats,
) -> Result<(), XlsxError> {
    for spec in SCHEMA.iter() {
        // Resolve by name so the layout survives a reordering of the header list
        let Some(column) = column_of(headers, spec.field.name()) else {
            continue;
        };
        let flagged = record.issue(spec.field).is_some();
        write_cell(ws, row, column, record.value(spec.field), flagged, formats)?;
    }

    if let Some(column) = column_of(headers, ERROR_DESCRIPTION_HEADER) {
        ws.write_string(row, column, record.error_description())?;
    }
    Ok(())
}

fn column_of(headers: &[&'static str], name: &str) -> Option<u16> {
    headers
        .iter()
        .position(|header| *header == name)
        .map(|position| position as u16)
}

/// Write one value with its native cell type; `flagged` adds the error border
pub(crate) fn write_cell(
    ws: &mut Worksheet,
    row: u32,
    column: u16,
    value: &CellValue,
    flagged: bool,
    formats: &ReportFormats,
) -> Result<(), XlsxError> {
    let format = if flagged { &formats.marker } else { &formats.plain };

    match value {
        CellValue::Empty => {
            if flagged {
                ws.write_blank(row, column, format)?;
            }
        }
        CellValue::Text(s) if s.is_empty() => {
            if flagged {
                ws.write_blank(row, column, format)?;
            }
        }
        CellValue::Text(s) => {
            ws.write_string_with_format(row, column, s, format)?;
        }
        CellValue::Number(n) => {
            ws.write_number_with_format(row, column, *n, format)?;
        }
        CellValue::Bool(b) => {
            ws.write_boolean_with_format(row, column, *b, format)?;
        }
        CellValue::DateTime(dt) => {
            let date_format = if flagged {
                &formats.marker_date
            } else {
                &formats.date
            };
            ws.write_datetime_with_format(row, column, dt, date_format)?;
        }
    }
    Ok(())
}
