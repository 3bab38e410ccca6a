use calamine::Data;
use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::schema::{Field, FieldIssue};
use crate::utils::{excel_serial_to_datetime, normalize_cell_text};

/// A normalized spreadsheet cell
///
/// Strings are trimmed and lower-cased on the way in; everything else keeps the
/// type the workbook stored it with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Normalize a raw calamine cell
    pub fn from_cell(cell: &Data) -> Self {
        match cell {
            Data::Empty | Data::Error(_) => CellValue::Empty,
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
                CellValue::from_text(s)
            }
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) => {
                let serial = dt.as_f64();
                match excel_serial_to_datetime(serial) {
                    Some(datetime) => CellValue::DateTime(datetime),
                    None => CellValue::Number(serial),
                }
            }
        }
    }

    /// Normalized text; blank strings collapse to `Empty`
    pub fn from_text(s: &str) -> Self {
        let normalized = normalize_cell_text(s);
        if normalized.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(normalized)
        }
    }

    /// True for missing cells and empty strings
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Numeric reading of the value: number cells, or text that parses as a finite float
    pub fn as_number(&self) -> Option<f64> {
        let number = match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        number.is_finite().then_some(number)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => {
                // Whole numbers print without a trailing ".0" (2021, not 2021.0)
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::DateTime(dt) => {
                if dt.time() == NaiveTime::MIN {
                    write!(f, "{}", dt.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S"))
                }
            }
        }
    }
}

/// One parsed inventory row
///
/// Every field keeps its normalized value whether or not it passed validation,
/// so the error report can echo the original data back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarRecord {
    /// 1-based spreadsheet row the record was read from
    #[serde(skip)]
    pub row_number: usize,
    pub make: CellValue,
    pub model: CellValue,
    pub year: CellValue,
    pub price: CellValue,
    pub mileage: CellValue,
    pub color: CellValue,
    pub vin: CellValue,
    /// Present only on invalid records, ordered by schema position
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<BTreeMap<Field, FieldIssue>>,
}

impl CarRecord {
    pub fn new(row_number: usize) -> Self {
        CarRecord {
            row_number,
            make: CellValue::Empty,
            model: CellValue::Empty,
            year: CellValue::Empty,
            price: CellValue::Empty,
            mileage: CellValue::Empty,
            color: CellValue::Empty,
            vin: CellValue::Empty,
            field_errors: None,
        }
    }

    pub fn value(&self, field: Field) -> &CellValue {
        match field {
            Field::Make => &self.make,
            Field::Model => &self.model,
            Field::Year => &self.year,
            Field::Price => &self.price,
            Field::Mileage => &self.mileage,
            Field::Color => &self.color,
            Field::Vin => &self.vin,
        }
    }

    pub(crate) fn slot_mut(&mut self, field: Field) -> &mut CellValue {
        match field {
            Field::Make => &mut self.make,
            Field::Model => &mut self.model,
            Field::Year => &mut self.year,
            Field::Price => &mut self.price,
            Field::Mileage => &mut self.mileage,
            Field::Color => &mut self.color,
            Field::Vin => &mut self.vin,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.field_errors.as_ref().is_none_or(BTreeMap::is_empty)
    }

    pub fn issue(&self, field: Field) -> Option<&FieldIssue> {
        self.field_errors.as_ref()?.get(&field)
    }

    /// All field error messages in schema order, joined with "; "
    pub fn error_description(&self) -> String {
        self.field_errors
            .iter()
            .flat_map(|errors| errors.values())
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;
    use chrono::NaiveDate;

    #[test]
    fn test_from_cell_normalizes_strings() {
        let cell = Data::String("  Toyota  ".to_string());
        assert_eq!(CellValue::from_cell(&cell), CellValue::Text("toyota".into()));

        let whitespace = Data::String("   ".to_string());
        assert_eq!(CellValue::from_cell(&whitespace), CellValue::Empty);
        assert_eq!(
            CellValue::from_cell(&Data::String(String::new())),
            CellValue::Empty
        );
    }

    #[test]
    fn test_from_cell_keeps_numbers() {
        assert_eq!(
            CellValue::from_cell(&Data::Int(2021)),
            CellValue::Number(2021.0)
        );
        assert_eq!(
            CellValue::from_cell(&Data::Float(18000.5)),
            CellValue::Number(18000.5)
        );
        assert_eq!(CellValue::from_cell(&Data::Bool(true)), CellValue::Bool(true));
    }

    #[test]
    fn test_from_cell_error_is_empty() {
        let cell = Data::Error(CellErrorType::NA);
        assert_eq!(CellValue::from_cell(&cell), CellValue::Empty);
    }

    #[test]
    fn test_as_number() {
        assert_eq!(CellValue::Number(5.0).as_number(), Some(5.0));
        assert_eq!(CellValue::Text("42".into()).as_number(), Some(42.0));
        assert_eq!(CellValue::Text("-0.5".into()).as_number(), Some(-0.5));
        assert_eq!(CellValue::Text("12abc".into()).as_number(), None);
        assert_eq!(CellValue::Text("inf".into()).as_number(), None);
        assert_eq!(CellValue::Empty.as_number(), None);
        assert_eq!(CellValue::Bool(true).as_number(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Number(2021.0).to_string(), "2021");
        assert_eq!(CellValue::Number(0.01).to_string(), "0.01");
        assert_eq!(CellValue::Empty.to_string(), "");

        let date = NaiveDate::from_ymd_opt(2021, 3, 4)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(CellValue::DateTime(date).to_string(), "2021-03-04");
    }

    #[test]
    fn test_error_description_follows_schema_order() {
        let mut record = CarRecord::new(2);
        let mut errors = BTreeMap::new();
        errors.insert(Field::Price, FieldIssue::InvalidPrice);
        errors.insert(Field::Make, FieldIssue::Required(Field::Make));
        errors.insert(Field::Year, FieldIssue::InvalidYear);
        record.field_errors = Some(errors);

        assert!(!record.is_valid());
        assert_eq!(
            record.error_description(),
            "Field make is required; Invalid year; Invalid price"
        );
    }

    #[test]
    fn test_valid_record_has_no_description() {
        let record = CarRecord::new(2);
        assert!(record.is_valid());
        assert_eq!(record.error_description(), "");
        assert!(record.issue(Field::Make).is_none());
    }

    #[test]
    fn test_serialize_record() {
        let mut record = CarRecord::new(3);
        record.make = CellValue::Text("honda".into());
        record.year = CellValue::Number(1890.0);
        let mut errors = BTreeMap::new();
        errors.insert(Field::Year, FieldIssue::InvalidYear);
        record.field_errors = Some(errors);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["make"], "honda");
        assert_eq!(json["year"], 1890.0);
        assert!(json["color"].is_null());
        assert_eq!(json["field_errors"]["year"], "Invalid year");
        assert!(json.get("row_number").is_none());
    }
}
