//! The fixed vehicle-inventory schema shared by the reader and the error report

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

use crate::record::CellValue;
use crate::utils::normalize_header;

/// Oldest model year accepted by the `year` rule
pub const MIN_YEAR: i32 = 1900;

/// Number of columns in the schema
pub const FIELD_COUNT: usize = 7;

/// Trailing column of the error report, never part of the schema
pub const ERROR_DESCRIPTION_HEADER: &str = "error description";

/// One of the seven recognized inventory columns
///
/// Declaration order is schema order; `Ord` relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Make,
    Model,
    Year,
    Price,
    Mileage,
    Color,
    Vin,
}

impl Field {
    /// Header token as it appears in the spreadsheet
    pub const fn name(self) -> &'static str {
        match self {
            Field::Make => "make",
            Field::Model => "model",
            Field::Year => "year",
            Field::Price => "price",
            Field::Mileage => "mileage",
            Field::Color => "color",
            Field::Vin => "vin",
        }
    }

    /// Zero-based position of the field in the schema
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Match a raw header cell against the schema (case- and whitespace-insensitive)
    pub fn from_header(header: &str) -> Option<Field> {
        let header = normalize_header(header);
        SCHEMA
            .iter()
            .map(|spec| spec.field)
            .find(|field| field.name() == header)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validation failure attached to a single field of a single row
///
/// The `Display` output is the exact message shown to users in the error report.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldIssue {
    #[error("Field {0} is required")]
    Required(Field),

    #[error("Invalid year")]
    InvalidYear,

    #[error("Invalid price")]
    InvalidPrice,

    #[error("Invalid mileage")]
    InvalidMileage,
}

impl Serialize for FieldIssue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Inputs to the rules that are not part of the row itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    /// Latest model year accepted by the `year` rule
    pub current_year: i32,
}

impl Default for ValidationContext {
    fn default() -> Self {
        ValidationContext {
            current_year: crate::utils::current_year(),
        }
    }
}

/// Format check applied to a field once the required check has passed
pub type FieldRule = fn(&CellValue, &ValidationContext) -> Option<FieldIssue>;

/// Descriptor for one schema column
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: Field,
    pub required: bool,
    pub rule: Option<FieldRule>,
}

impl FieldSpec {
    /// Validate a normalized cell value against this descriptor
    ///
    /// A blank required value reports `Required` and skips the format rule, so a
    /// field carries at most one issue.
    pub fn validate(&self, value: &CellValue, context: &ValidationContext) -> Option<FieldIssue> {
        if self.required && value.is_blank() {
            return Some(FieldIssue::Required(self.field));
        }
        self.rule.and_then(|rule| rule(value, context))
    }
}

/// The inventory schema, in canonical column order
pub static SCHEMA: [FieldSpec; FIELD_COUNT] = [
    FieldSpec {
        field: Field::Make,
        required: true,
        rule: None,
    },
    FieldSpec {
        field: Field::Model,
        required: true,
        rule: None,
    },
    FieldSpec {
        field: Field::Year,
        required: true,
        rule: Some(check_year),
    },
    FieldSpec {
        field: Field::Price,
        required: true,
        rule: Some(check_price),
    },
    FieldSpec {
        field: Field::Mileage,
        required: true,
        rule: Some(check_mileage),
    },
    FieldSpec {
        field: Field::Color,
        required: false,
        rule: None,
    },
    FieldSpec {
        field: Field::Vin,
        required: true,
        rule: None,
    },
];

/// Header tokens in schema order
pub fn expected_headers() -> impl Iterator<Item = &'static str> {
    SCHEMA.iter().map(|spec| spec.field.name())
}

fn check_year(value: &CellValue, context: &ValidationContext) -> Option<FieldIssue> {
    let range = f64::from(MIN_YEAR)..=f64::from(context.current_year);
    match value.as_number() {
        Some(year) if range.contains(&year) => None,
        _ => Some(FieldIssue::InvalidYear),
    }
}

fn check_price(value: &CellValue, _context: &ValidationContext) -> Option<FieldIssue> {
    match value.as_number() {
        Some(price) if price > 0.0 => None,
        _ => Some(FieldIssue::InvalidPrice),
    }
}

fn check_mileage(value: &CellValue, _context: &ValidationContext) -> Option<FieldIssue> {
    match value.as_number() {
        Some(mileage) if mileage >= 0.0 => None,
        _ => Some(FieldIssue::InvalidMileage),
    }
}
