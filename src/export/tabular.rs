use std::borrow::Borrow;

use rust_xlsxwriter::{Format, Workbook};

use crate::data::model::{union_keys, CellValue, Record};
use crate::error::ExportError;

/// Serialize `view` to a single-sheet `.xlsx` workbook.
///
/// The header row lists every key in order of first appearance (the first
/// record's keys come first). Texts, numbers and booleans keep their cell
/// types; empty and absent values leave the cell blank. An empty view yields
/// a valid workbook with one empty sheet.
pub fn to_tabular_blob<R: Borrow<Record>>(
    view: &[R],
    sheet_name: &str,
) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    let header_format = Format::new().set_bold();
    let columns = union_keys(view);

    for (col, key) in columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, key, &header_format)?;
    }

    for (i, record) in view.iter().enumerate() {
        let row = i as u32 + 1;
        let record = record.borrow();
        for (col, key) in columns.iter().enumerate() {
            let col = col as u16;
            match record.get(key) {
                Some(CellValue::Text(s)) => {
                    worksheet.write_string(row, col, s)?;
                }
                Some(CellValue::Number(n)) => {
                    worksheet.write_number(row, col, *n)?;
                }
                Some(CellValue::Bool(b)) => {
                    worksheet.write_boolean(row, col, *b)?;
                }
                Some(CellValue::Empty) | None => {}
            }
        }
    }

    let bytes = workbook.save_to_buffer()?;
    log::debug!(
        "wrote {} rows x {} columns to sheet '{sheet_name}' ({} bytes)",
        view.len(),
        columns.len(),
        bytes.len()
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::decode;
    use calamine::{open_workbook_auto_from_rs, Reader};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn round_trips_text_numbers_and_booleans() {
        let view = vec![
            Record::new()
                .with("route", "101")
                .with("% Complete", 0.875)
                .with("late", false),
            Record::new()
                .with("route", "North Loop")
                .with("% Complete", 1.0)
                .with("late", true),
        ];
        let bytes = to_tabular_blob(&view, "DashboardData").unwrap();
        assert_eq!(decode(&bytes).unwrap(), view);
    }

    #[test]
    fn sheet_is_named_for_the_data_set() {
        let view = vec![Record::new().with("route", "1")];
        let bytes = to_tabular_blob(&view, "DashboardData").unwrap();
        let workbook = open_workbook_auto_from_rs(Cursor::new(bytes.as_slice())).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["DashboardData".to_string()]);
    }

    #[test]
    fn ragged_records_keep_all_columns() {
        let view = vec![
            Record::new().with("route", "1"),
            Record::new().with("route", "2").with("owner", "kim"),
        ];
        let decoded = decode(&to_tabular_blob(&view, "DashboardData").unwrap()).unwrap();
        assert_eq!(decoded, view);
    }

    #[test]
    fn empty_values_come_back_absent() {
        let view = vec![Record::new().with("route", "1").with("note", CellValue::Empty)];
        let decoded = decode(&to_tabular_blob(&view, "DashboardData").unwrap()).unwrap();
        assert_eq!(decoded, vec![Record::new().with("route", "1")]);
    }

    #[test]
    fn empty_view_is_still_a_workbook() {
        let bytes = to_tabular_blob::<Record>(&[], "DashboardData").unwrap();
        assert!(decode(&bytes).unwrap().is_empty());
    }

    #[test]
    fn accepts_borrowed_views() {
        let full = vec![
            Record::new().with("route", "1"),
            Record::new().with("route", "2"),
        ];
        let view: Vec<&Record> = full.iter().skip(1).collect();
        let decoded = decode(&to_tabular_blob(&view, "DashboardData").unwrap()).unwrap();
        assert_eq!(decoded, vec![Record::new().with("route", "2")]);
    }
}
