use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};

use super::model::{CellValue, Record, RecordSet};
use crate::error::DecodeError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read a workbook file from disk and decode it.
///
/// The format is sniffed from the content, so `.xlsx`, `.xls`, `.xlsb` and
/// `.ods` files all work regardless of their extension.
pub fn load_file(path: &Path) -> Result<RecordSet> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let records =
        decode(&bytes).with_context(|| format!("decoding workbook {}", path.display()))?;
    Ok(records)
}

/// Decode the first sheet of a workbook blob into records.
///
/// The first row of the sheet is the header; every following row becomes one
/// [`Record`] keyed by header name. Empty cells are left out of the record, so
/// short rows simply lack their trailing keys, and blank rows produce no
/// record at all. An empty sheet is an empty record set, not an error.
pub fn decode(bytes: &[u8]) -> Result<RecordSet, DecodeError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(DecodeError::NoSheets)??;
    Ok(records_from_range(&range))
}

// ---------------------------------------------------------------------------
// Sheet → records
// ---------------------------------------------------------------------------

fn records_from_range(range: &Range<Data>) -> RecordSet {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return RecordSet::new();
    };
    let headers = header_names(header_row);

    rows.map(|row| {
        row.iter()
            .zip(&headers)
            .filter_map(|(cell, key)| cell_value(cell).map(|v| (key.clone(), v)))
            .collect::<Record>()
    })
    // Rows with no values under any header are skipped.
    .filter(|record| !record.is_empty())
    .collect()
}

/// Column keys from the header row. Blank headers become `__EMPTY`,
/// `__EMPTY_1`, ...; repeated names get a numeric suffix.
fn header_names(row: &[Data]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(row.len());
    for cell in row {
        let base = cell_value(cell)
            .map(|v| v.to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "__EMPTY".to_string());

        let mut name = base.clone();
        let mut suffix = 1;
        while names.contains(&name) {
            name = format!("{base}_{suffix}");
            suffix += 1;
        }
        names.push(name);
    }
    names
}

/// Best-effort coercion of a workbook cell. `None` means "no value".
fn cell_value(cell: &Data) -> Option<CellValue> {
    let value = match cell {
        Data::Empty => return None,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        // Serial date number, as spreadsheets store it.
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_xlsxwriter::Workbook;

    fn workbook_bytes(build: impl FnOnce(&mut Workbook)) -> Vec<u8> {
        let mut workbook = Workbook::new();
        build(&mut workbook);
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn decodes_header_and_rows() {
        let bytes = workbook_bytes(|wb| {
            let ws = wb.add_worksheet();
            ws.write_string(0, 0, "route").unwrap();
            ws.write_string(0, 1, "% Complete").unwrap();
            ws.write_string(0, 2, "active").unwrap();
            ws.write_string(1, 0, "101").unwrap();
            ws.write_number(1, 1, 0.25).unwrap();
            ws.write_boolean(1, 2, true).unwrap();
            ws.write_string(2, 0, "102").unwrap();
            ws.write_number(2, 1, 1.0).unwrap();
            ws.write_boolean(2, 2, false).unwrap();
        });

        let records = decode(&bytes).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            Record::new()
                .with("route", "101")
                .with("% Complete", 0.25)
                .with("active", true)
        );
        assert_eq!(records[1].get("% Complete"), Some(&CellValue::Number(1.0)));
    }

    #[test]
    fn short_rows_miss_trailing_keys() {
        let bytes = workbook_bytes(|wb| {
            let ws = wb.add_worksheet();
            ws.write_string(0, 0, "route").unwrap();
            ws.write_string(0, 1, "% Complete").unwrap();
            ws.write_string(0, 2, "owner").unwrap();
            ws.write_string(1, 0, "101").unwrap();
            ws.write_string(2, 0, "102").unwrap();
            ws.write_number(2, 1, 0.5).unwrap();
            ws.write_string(2, 2, "kim").unwrap();
        });

        let records = decode(&bytes).unwrap();
        assert_eq!(records[0].keys().collect::<Vec<_>>(), vec!["route"]);
        assert_eq!(records[1].len(), 3);
    }

    #[test]
    fn empty_sheet_is_empty_record_set() {
        let bytes = workbook_bytes(|wb| {
            wb.add_worksheet();
        });
        assert!(decode(&bytes).unwrap().is_empty());
    }

    #[test]
    fn header_only_sheet_has_no_records() {
        let bytes = workbook_bytes(|wb| {
            let ws = wb.add_worksheet();
            ws.write_string(0, 0, "route").unwrap();
        });
        assert!(decode(&bytes).unwrap().is_empty());
    }

    #[test]
    fn reads_only_the_first_sheet() {
        let bytes = workbook_bytes(|wb| {
            let first = wb.add_worksheet();
            first.set_name("Routes").unwrap();
            first.write_string(0, 0, "route").unwrap();
            first.write_string(1, 0, "first").unwrap();

            let second = wb.add_worksheet();
            second.write_string(0, 0, "route").unwrap();
            second.write_string(1, 0, "second").unwrap();
            second.write_string(2, 0, "second again").unwrap();
        });

        let records = decode(&bytes).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].display("route"), "first");
    }

    #[test]
    fn blank_and_duplicate_headers_get_distinct_keys() {
        let bytes = workbook_bytes(|wb| {
            let ws = wb.add_worksheet();
            ws.write_string(0, 0, "name").unwrap();
            ws.write_string(0, 2, "name").unwrap();
            ws.write_string(1, 0, "a").unwrap();
            ws.write_string(1, 1, "b").unwrap();
            ws.write_string(1, 2, "c").unwrap();
        });

        let records = decode(&bytes).unwrap();
        assert_eq!(
            records[0].keys().collect::<Vec<_>>(),
            vec!["name", "__EMPTY", "name_1"]
        );
    }

    #[test]
    fn blank_rows_are_skipped() {
        let bytes = workbook_bytes(|wb| {
            let ws = wb.add_worksheet();
            ws.write_string(0, 0, "route").unwrap();
            ws.write_string(0, 1, "% Complete").unwrap();
            // Row 1 left blank.
            ws.write_string(2, 0, "101").unwrap();
            ws.write_number(2, 1, 0.4).unwrap();
            ws.write_string(3, 0, "102").unwrap();
            // Row 4 blank between data rows.
            ws.write_string(5, 0, "103").unwrap();
            ws.write_number(5, 1, 0.9).unwrap();
        });

        let records = decode(&bytes).unwrap();
        let routes: Vec<String> = records.iter().map(|r| r.display("route")).collect();
        assert_eq!(routes, vec!["101", "102", "103"]);
        assert_eq!(
            records[0].keys().collect::<Vec<_>>(),
            vec!["route", "% Complete"]
        );
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(decode(b"definitely not a spreadsheet").is_err());
        assert!(decode(&[]).is_err());
    }

    #[test]
    fn load_file_reports_missing_path() {
        let err = load_file(Path::new("/nonexistent/progress.xlsx")).unwrap_err();
        assert!(format!("{err:#}").contains("reading"));
    }
}
