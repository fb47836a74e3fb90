#![allow(dead_code)]

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::path::Path;

pub enum Amount<'a> {
    Number(f64),
    Text(&'a str),
    Date(u16, u8, u8),
    Blank,
}

/// Writes a journal with the usual six-column layout: Date, Unit, Customer, Ref,
/// Qty, Amount.
pub fn write_journal(dir: &Path, file_name: &str, rows: &[(&str, Amount<'_>)]) {
    write_journal_at(dir, file_name, 0, rows);
}

/// Same layout with the header on zero-based sheet row `header_row`.
pub fn write_journal_at(
    dir: &Path,
    file_name: &str,
    header_row: u32,
    rows: &[(&str, Amount<'_>)],
) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in ["Date", "Unit", "Customer", "Ref", "Qty", "Amount"]
        .iter()
        .enumerate()
    {
        sheet.write_string(header_row, col as u16, *header).unwrap();
    }
    for (i, (unit, amount)) in rows.iter().enumerate() {
        let row = header_row + i as u32 + 1;
        sheet.write_string(row, 0, "2024-03-01").unwrap();
        sheet.write_string(row, 1, *unit).unwrap();
        sheet.write_string(row, 2, "Tenant").unwrap();
        match amount {
            Amount::Number(n) => {
                sheet.write_number(row, 5, *n).unwrap();
            }
            Amount::Text(s) => {
                sheet.write_string(row, 5, *s).unwrap();
            }
            Amount::Date(y, m, d) => {
                let date = ExcelDateTime::from_ymd(*y, *m, *d).unwrap();
                let format = Format::new().set_num_format("yyyy-mm-dd");
                sheet.write_datetime_with_format(row, 5, &date, &format).unwrap();
            }
            Amount::Blank => {}
        }
    }
    workbook.save(dir.join(file_name)).unwrap();
}

/// A journal export that only has two columns.
pub fn write_narrow_journal(dir: &Path, file_name: &str) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Date").unwrap();
    sheet.write_string(0, 1, "Unit").unwrap();
    sheet.write_string(1, 0, "2024-05-01").unwrap();
    sheet.write_string(1, 1, "G-1").unwrap();
    workbook.save(dir.join(file_name)).unwrap();
}
