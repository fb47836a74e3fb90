//! Sales journal discovery and workbook import.

use crate::domain::model::{Cell, JournalSource, Table};
use crate::utils::error::{AggError, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::NaiveDate;
use regex::Regex;
use std::io::Cursor;
use std::sync::LazyLock;

pub const JOURNAL_PREFIX: &str = "Sales Journal for ";

static JOURNAL_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Sales Journal for ([A-Za-z]+ [0-9]{4})").expect("journal key pattern is valid")
});

pub fn is_journal_file(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    file_name.starts_with(JOURNAL_PREFIX) && (lower.ends_with(".xls") || lower.ends_with(".xlsx"))
}

/// "Month Year" from `Sales Journal for Month Year.xlsx`, or the whole name when it
/// does not follow that pattern.
pub fn journal_key(file_name: &str) -> String {
    JOURNAL_KEY
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| file_name.to_string())
}

pub fn month_order(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("1 {}", key), "%d %B %Y").ok()
}

/// Chronological order, unparseable keys last. Files sharing a key collapse to the
/// last one in file-name order.
pub fn order_sources(mut sources: Vec<JournalSource>) -> Vec<JournalSource> {
    sources.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    let mut unique: Vec<JournalSource> = Vec::with_capacity(sources.len());
    for source in sources {
        if let Some(existing) = unique.iter_mut().find(|s| s.key == source.key) {
            tracing::warn!(
                "⚠️ '{}' and '{}' both map to '{}', keeping '{}'",
                existing.file_name,
                source.file_name,
                source.key,
                source.file_name
            );
            *existing = source;
        } else {
            unique.push(source);
        }
    }

    unique.sort_by(|a, b| match (month_order(&a.key), month_order(&b.key)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.key.cmp(&b.key),
    });
    unique
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Bool(b) => Cell::Bool(*b),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::DateTime(dt) => Cell::Date(dt.as_f64()),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

/// Reads the first worksheet of an `.xls`/`.xlsx` workbook. The first used row
/// becomes the header, wherever it sits on the sheet.
pub fn parse_workbook(bytes: Vec<u8>, file_name: &str) -> Result<Table> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AggError::ProcessingError {
            message: format!("'{}' has no worksheets", file_name),
        })??;

    let Some((start_row, start_col)) = range.start() else {
        return Ok(Table::default());
    };
    let offset = start_col as usize;

    let mut rows = range.rows().map(|row| {
        std::iter::repeat(Cell::Empty)
            .take(offset)
            .chain(row.iter().map(cell_from_data))
            .collect::<Vec<_>>()
    });

    let headers = rows
        .next()
        .map(|header| header.iter().map(ToString::to_string).collect())
        .unwrap_or_default();

    Ok(Table {
        header_row: start_row as usize,
        headers,
        rows: rows.collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    fn source(file_name: &str) -> JournalSource {
        JournalSource {
            key: journal_key(file_name),
            file_name: file_name.to_string(),
            path: format!("journals/{}", file_name),
        }
    }

    #[test]
    fn test_is_journal_file() {
        assert!(is_journal_file("Sales Journal for March 2024.xlsx"));
        assert!(is_journal_file("Sales Journal for March 2024.XLS"));
        assert!(is_journal_file("Sales Journal for anything.xls"));
        assert!(!is_journal_file("sales journal for March 2024.xlsx"));
        assert!(!is_journal_file("Sales Journal for March 2024.csv"));
        assert!(!is_journal_file("Purchase Journal for March 2024.xlsx"));
    }

    #[test]
    fn test_journal_key() {
        assert_eq!(
            journal_key("Sales Journal for March 2024.xlsx"),
            "March 2024"
        );
        assert_eq!(
            journal_key("Sales Journal for Sept 2023 (final).xls"),
            "Sept 2023"
        );
        assert_eq!(
            journal_key("Sales Journal for Q1.xlsx"),
            "Sales Journal for Q1.xlsx"
        );
    }

    #[test]
    fn test_month_order_accepts_full_and_short_names() {
        assert_eq!(
            month_order("March 2024"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(month_order("Jan 2023"), NaiveDate::from_ymd_opt(2023, 1, 1));
        assert_eq!(month_order("Sales Journal for Q1.xlsx"), None);
    }

    #[test]
    fn test_order_sources_is_chronological_with_unparsed_last() {
        let ordered = order_sources(vec![
            source("Sales Journal for Q1.xlsx"),
            source("Sales Journal for March 2024.xlsx"),
            source("Sales Journal for December 2023.xlsx"),
            source("Sales Journal for January 2024.xlsx"),
        ]);
        let keys: Vec<&str> = ordered.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "December 2023",
                "January 2024",
                "March 2024",
                "Sales Journal for Q1.xlsx"
            ]
        );
    }

    #[test]
    fn test_order_sources_keeps_last_duplicate() {
        let ordered = order_sources(vec![
            source("Sales Journal for May 2024.xlsx"),
            source("Sales Journal for May 2024.xls"),
        ]);
        assert_eq!(ordered.len(), 1);
        assert_eq!(ordered[0].file_name, "Sales Journal for May 2024.xlsx");
    }

    #[test]
    fn test_parse_workbook_reads_first_sheet() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Date").unwrap();
        sheet.write_string(0, 1, "Unit").unwrap();
        sheet.write_string(0, 5, "Amount").unwrap();
        sheet.write_string(1, 1, "G-101").unwrap();
        sheet.write_number(1, 5, -1200.0).unwrap();
        sheet.write_boolean(2, 0, true).unwrap();
        let second = workbook.add_worksheet();
        second.write_string(0, 0, "ignored").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let table = parse_workbook(bytes, "Sales Journal for March 2024.xlsx").unwrap();

        assert_eq!(table.headers[0], "Date");
        assert_eq!(table.header(1), "Unit");
        assert_eq!(table.header(2), "Unnamed: 2");
        assert_eq!(table.header(5), "Amount");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.cell(0, 1), &Cell::Text("G-101".to_string()));
        assert_eq!(table.cell(0, 5), &Cell::Number(-1200.0));
        assert_eq!(table.cell(1, 0), &Cell::Bool(true));
        assert_eq!(table.width(), 6);
        assert_eq!(table.header_row, 0);
    }

    #[test]
    fn test_parse_workbook_records_header_row_below_blank_rows() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(2, 1, "Unit").unwrap();
        sheet.write_string(2, 5, "Amount").unwrap();
        sheet.write_string(3, 1, "G-1").unwrap();
        sheet.write_string(3, 5, "pending").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let table = parse_workbook(bytes, "Sales Journal for March 2024.xlsx").unwrap();

        assert_eq!(table.header_row, 2);
        assert_eq!(table.header(1), "Unit");
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.sheet_row(0), 4);
    }

    #[test]
    fn test_parse_workbook_keeps_dates_apart_from_numbers() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let date = ExcelDateTime::from_ymd(2024, 3, 1).unwrap();
        sheet.write_string(0, 0, "Amount").unwrap();
        sheet.write_datetime_with_format(1, 0, &date, &date_format).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let table = parse_workbook(bytes, "Sales Journal for March 2024.xlsx").unwrap();

        assert_eq!(table.cell(0, 0), &Cell::Date(45352.0));
    }

    #[test]
    fn test_parse_workbook_keeps_absolute_columns() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 1, "Unit").unwrap();
        sheet.write_string(1, 1, "H-3").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let table = parse_workbook(bytes, "Sales Journal for March 2024.xlsx").unwrap();

        assert_eq!(table.header(1), "Unit");
        assert_eq!(table.cell(0, 1), &Cell::Text("H-3".to_string()));
    }

    #[test]
    fn test_parse_workbook_rejects_garbage() {
        let result = parse_workbook(b"not a workbook".to_vec(), "Sales Journal for May 2024.xlsx");
        assert!(result.is_err());
    }
}
