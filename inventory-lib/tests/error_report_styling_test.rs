//! Error-report styling: bold header row and four-sided border on flagged cells
//!
//! calamine only exposes values, so the package parts are read straight from the zip.

use inventory_lib::{CarRecord, ERROR_SHEET_NAME, generate_error_report};
use std::io::{Cursor, Read};
use zip::ZipArchive;

mod common;
use common::*;

fn report_part(report: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(report)).unwrap();
    let mut part = archive.by_name(name).unwrap();
    let mut xml = String::new();
    part.read_to_string(&mut xml).unwrap();
    xml
}

/// Value of `attr` in the first `<tag ...>` opening tag that starts with `prefix`
fn attribute(xml: &str, prefix: &str, attr: &str) -> Option<String> {
    let start = xml.find(prefix)?;
    let tag = &xml[start..start + xml[start..].find('>')?];
    let needle = format!(" {attr}=\"");
    let value_start = tag.find(&needle)? + needle.len();
    let value_len = tag[value_start..].find('"')?;
    Some(tag[value_start..value_start + value_len].to_string())
}

/// Style index of a cell, `None` for unstyled cells
fn cell_style(sheet: &str, cell: &str) -> Option<usize> {
    attribute(sheet, &format!("<c r=\"{cell}\""), "s").map(|s| s.parse().unwrap())
}

/// Inner XML of every child `<child>` element of the `<section>` block
fn section_items(styles: &str, section: &str, child: &str) -> Vec<String> {
    let open = styles.find(&format!("<{section}")).unwrap();
    // Children start after the section's own opening tag ("<fonts" also begins with "<font")
    let start = open + styles[open..].find('>').unwrap() + 1;
    let end = styles[start..].find(&format!("</{section}>")).unwrap() + start;
    styles[start..end]
        .split(&format!("<{child}"))
        .skip(1)
        .map(|item| item.to_string())
        .collect()
}

fn xf_attribute(styles: &str, style: usize, attr: &str) -> usize {
    let xf = &section_items(styles, "cellXfs", "xf")[style];
    attribute(&format!("<xf{xf}"), "<xf", attr)
        .unwrap()
        .parse()
        .unwrap()
}

fn spec_invalid_example() -> Vec<CarRecord> {
    let row = car_row(
        "",
        "Civic",
        num(1890.0),
        num(-5.0),
        num(10.0),
        "red",
        "VIN123",
    );
    parse_rows(&[row]).invalid
}

#[test]
fn test_flagged_cells_carry_four_sided_border() {
    let report = generate_error_report(&spec_invalid_example()).unwrap().unwrap();
    let sheet = report_part(&report, "xl/worksheets/sheet1.xml");
    let styles = report_part(&report, "xl/styles.xml");

    // make (blank), year and price failed; model and mileage did not
    let marker = cell_style(&sheet, "A2").expect("blank flagged cell must still be written");
    assert_eq!(cell_style(&sheet, "C2"), Some(marker));
    assert_eq!(cell_style(&sheet, "D2"), Some(marker));
    assert_ne!(cell_style(&sheet, "B2"), Some(marker));
    assert_ne!(cell_style(&sheet, "E2"), Some(marker));

    let border_id = xf_attribute(&styles, marker, "borderId");
    assert_ne!(border_id, 0, "marker style should reference a border");

    let border = &section_items(&styles, "borders", "border")[border_id];
    for side in ["left", "right", "top", "bottom"] {
        assert!(
            border.contains(&format!("<{side} style=\"thin\">")),
            "{side} side should be a thin line: {border}"
        );
    }
    assert!(border.contains("FF0000"), "border should be red: {border}");
}

#[test]
fn test_header_row_is_bold() {
    let report = generate_error_report(&spec_invalid_example()).unwrap().unwrap();
    let sheet = report_part(&report, "xl/worksheets/sheet1.xml");
    let styles = report_part(&report, "xl/styles.xml");

    let fonts = section_items(&styles, "fonts", "font");
    for column in ["A", "B", "C", "D", "E", "F", "G", "H"] {
        let style = cell_style(&sheet, &format!("{column}1")).expect("header cells are styled");
        let font_id = xf_attribute(&styles, style, "fontId");
        assert!(
            fonts[font_id].contains("<b/>"),
            "header {column}1 should use a bold font"
        );
    }

    // Data cells outside the marker keep the regular font
    assert!(cell_style(&sheet, "B2").is_none_or(|style| {
        !fonts[xf_attribute(&styles, style, "fontId")].contains("<b/>")
    }));
}

#[test]
fn test_report_sheet_is_named_errors() {
    let report = generate_error_report(&spec_invalid_example()).unwrap().unwrap();
    let workbook = report_part(&report, "xl/workbook.xml");
    assert_eq!(
        attribute(&workbook, "<sheet ", "name").as_deref(),
        Some(ERROR_SHEET_NAME)
    );
}
