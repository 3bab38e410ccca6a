use calamine::{Data, Range, Reader, Xlsx};
use log::{debug, info};
use std::collections::BTreeMap;
use std::io::Cursor;

use crate::error::ImportError;
use crate::record::{CarRecord, CellValue};
use crate::schema::{FIELD_COUNT, Field, SCHEMA, ValidationContext};
use crate::utils::normalize_header;

/// Absolute index of the header row; data starts on the row after it
const HEADER_ROW: u32 = 0;

/// Result of classifying every data row of a workbook
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationOutcome {
    pub valid: Vec<CarRecord>,
    pub invalid: Vec<CarRecord>,
}

impl ValidationOutcome {
    pub fn has_errors(&self) -> bool {
        !self.invalid.is_empty()
    }

    pub fn total_rows(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }
}

/// Column of each schema field in the sheet, indexed by `Field::index`
#[derive(Debug, Clone, Copy)]
struct ColumnMap([Option<u32>; FIELD_COUNT]);

impl ColumnMap {
    fn column(&self, field: Field) -> Option<u32> {
        self.0[field.index()]
    }
}

/// Reads inventory workbooks and classifies their rows
///
/// A reader holds no per-call state: the same instance can parse any number of
/// workbooks, from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct InventoryReader {
    context: ValidationContext,
}

#[derive(Debug, Clone, Default)]
pub struct InventoryReaderBuilder {
    current_year: Option<i32>,
}

impl InventoryReaderBuilder {
    pub fn new() -> Self {
        InventoryReaderBuilder::default()
    }

    /// Pin the latest accepted model year instead of reading the system clock
    pub fn current_year(mut self, year: i32) -> Self {
        self.current_year = Some(year);
        self
    }

    pub fn build(self) -> InventoryReader {
        let context = match self.current_year {
            Some(current_year) => ValidationContext { current_year },
            None => ValidationContext::default(),
        };
        InventoryReader { context }
    }
}

/// Parse a workbook with the default reader
pub fn parse_workbook(bytes: &[u8]) -> Result<ValidationOutcome, ImportError> {
    InventoryReader::default().parse(bytes)
}

impl InventoryReader {
    //////////////////////////////////////////////////////////////
    ///  Public API
    //////////////////////////////////////////////////////////////

    pub fn builder() -> InventoryReaderBuilder {
        InventoryReaderBuilder::new()
    }

    pub fn context(&self) -> &ValidationContext {
        &self.context
    }

    /// Parse an xlsx workbook and split its rows into valid and invalid records
    ///
    /// Only the first worksheet is read and its first row must carry the seven
    /// schema headers (any order, extra columns ignored). Missing headers abort
    /// the parse before any row is looked at.
    pub fn parse(&self, bytes: &[u8]) -> Result<ValidationOutcome, ImportError> {
        let range = Self::first_sheet_range(bytes)?;
        let columns = Self::locate_columns(&range)?;
        let outcome = self.classify_rows(&range, &columns);

        info!(
            "Classified {} inventory rows: {} valid, {} invalid",
            outcome.total_rows(),
            outcome.valid.len(),
            outcome.invalid.len()
        );

        Ok(outcome)
    }

    //////////////////////////////////////////////////////////////
    ///  Private methods
    //////////////////////////////////////////////////////////////
    fn first_sheet_range(bytes: &[u8]) -> Result<Range<Data>, ImportError> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

        match workbook.worksheet_range_at(0) {
            Some(range) => Ok(range?),
            None => Err(ImportError::MissingWorksheet),
        }
    }

    /// Normalized header row; non-string cells read as empty
    fn read_headers(range: &Range<Data>) -> Vec<String> {
        let Some((_, last_column)) = range.end() else {
            return Vec::new();
        };

        (0..=last_column)
            .map(|column| match range.get_value((HEADER_ROW, column)) {
                Some(Data::String(s)) => normalize_header(s),
                _ => String::new(),
            })
            .collect()
    }

    /// Find the column of every schema field, failing with all missing headers at once
    fn locate_columns(range: &Range<Data>) -> Result<ColumnMap, ImportError> {
        let headers = Self::read_headers(range);
        let mut columns = [None; FIELD_COUNT];

        for (column, header) in headers.iter().enumerate() {
            if let Some(field) = Field::from_header(header) {
                // First occurrence wins when a header is repeated
                columns[field.index()].get_or_insert(column as u32);
            }
        }

        let missing: Vec<&'static str> = SCHEMA
            .iter()
            .filter(|spec| columns[spec.field.index()].is_none())
            .map(|spec| spec.field.name())
            .collect();

        if !missing.is_empty() {
            debug!("Header row {:?} is missing {:?}", headers, missing);
            return Err(ImportError::InvalidHeaders { missing });
        }

        Ok(ColumnMap(columns))
    }

    fn classify_rows(&self, range: &Range<Data>, columns: &ColumnMap) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::default();
        let Some((last_row, last_column)) = range.end() else {
            return outcome;
        };

        for row in (HEADER_ROW + 1)..=last_row {
            if Self::is_empty_row(range, row, last_column) {
                continue;
            }

            let record = self.build_record(range, columns, row);
            if record.is_valid() {
                outcome.valid.push(record);
            } else {
                debug!(
                    "Row {} rejected: {}",
                    record.row_number,
                    record.error_description()
                );
                outcome.invalid.push(record);
            }
        }

        outcome
    }

    /// Read, normalize and validate each schema field of one row
    fn build_record(&self, range: &Range<Data>, columns: &ColumnMap, row: u32) -> CarRecord {
        let mut record = CarRecord::new(row as usize + 1);
        let mut field_errors = BTreeMap::new();

        for spec in SCHEMA.iter() {
            let value = columns
                .column(spec.field)
                .and_then(|column| range.get_value((row, column)))
                .map(CellValue::from_cell)
                .unwrap_or(CellValue::Empty);

            if let Some(issue) = spec.validate(&value, &self.context) {
                field_errors.insert(spec.field, issue);
            }
            *record.slot_mut(spec.field) = value;
        }

        if !field_errors.is_empty() {
            record.field_errors = Some(field_errors);
        }
        record
    }

    fn is_empty_row(range: &Range<Data>, row: u32, last_column: u32) -> bool {
        (0..=last_column).all(|column| match range.get_value((row, column)) {
            None | Some(Data::Empty) | Some(Data::Error(_)) => true,
            Some(Data::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        })
    }
}
