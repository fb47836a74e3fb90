//! Rendering of the unit aggregation report.

use crate::domain::model::{Cell, MonthSummary, OutputFormat, UnitSheet};
use crate::utils::error::{AggError, Result};
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::collections::HashSet;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Excel refuses longer sheet names.
pub const MAX_SHEET_NAME_CHARS: usize = 31;
pub const SUMMARY_SHEET: &str = "Summary";

pub fn default_report_filename(today: NaiveDate, format: OutputFormat) -> String {
    format!(
        "{} unit aggregation report.{}",
        today.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Hands out Excel-safe, unique sheet names.
#[derive(Debug, Default)]
pub struct SheetNamer {
    used: HashSet<String>,
}

impl SheetNamer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&mut self, wanted: &str) -> String {
        let cleaned: String = wanted
            .chars()
            .map(|c| match c {
                '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
                other => other,
            })
            .collect();
        // Excel also refuses a leading or trailing apostrophe.
        let cleaned = cleaned.trim_start_matches('\'');
        let cleaned = if cleaned.trim().is_empty() {
            "Sheet"
        } else {
            cleaned
        };
        let prefix = |keep: usize| {
            let head: String = cleaned.chars().take(keep).collect();
            head.trim_end_matches('\'').to_string()
        };

        let mut candidate = prefix(MAX_SHEET_NAME_CHARS);
        let mut n = 2;
        // Excel compares sheet names case-insensitively.
        while self.used.contains(&candidate.to_lowercase()) {
            let suffix = format!(" ({})", n);
            candidate = prefix(MAX_SHEET_NAME_CHARS - suffix.chars().count()) + &suffix;
            n += 1;
        }
        self.used.insert(candidate.to_lowercase());
        candidate
    }
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, cell: &Cell) -> Result<()> {
    match cell {
        Cell::Empty => {}
        Cell::Bool(b) => {
            sheet.write_boolean(row, col, *b)?;
        }
        Cell::Number(n) => {
            sheet.write_number(row, col, *n)?;
        }
        Cell::Text(_) | Cell::Date(_) => {
            sheet.write_string(row, col, cell.to_string())?;
        }
    }
    Ok(())
}

fn write_table(
    sheet: &mut Worksheet,
    headers: &[&str],
    rows: &[Vec<Cell>],
    header_format: &Format,
) -> Result<()> {
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, header_format)?;
    }
    for (idx, row) in rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            write_cell(sheet, idx as u32 + 1, col as u16, cell)?;
        }
    }
    sheet.autofit();
    Ok(())
}

fn summary_rows(summaries: &[MonthSummary]) -> Vec<Vec<Cell>> {
    summaries
        .iter()
        .map(|s| {
            vec![
                Cell::Text(s.month.clone()),
                Cell::Number(s.units as f64),
                Cell::Number(s.total_rent),
            ]
        })
        .collect()
}

/// One worksheet per month, in the given order, plus an optional summary sheet.
pub fn render_xlsx(sheets: &[UnitSheet], include_summary: bool) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let mut namer = SheetNamer::new();

    for unit_sheet in sheets {
        let name = namer.name(&unit_sheet.key);
        let rows: Vec<Vec<Cell>> = unit_sheet.to_rows().into_iter().map(Vec::from).collect();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&name)?;
        write_table(
            worksheet,
            &[unit_sheet.unit_header.as_str(), unit_sheet.amount_header.as_str()],
            &rows,
            &header_format,
        )?;
        tracing::debug!("Wrote sheet '{}' ({} rows)", name, rows.len());
    }

    if include_summary {
        let summaries: Vec<MonthSummary> = sheets.iter().map(UnitSheet::summary).collect();
        let total_label = sheets
            .first()
            .map(|s| s.total_label.as_str())
            .unwrap_or("Total Rent");
        let name = namer.name(SUMMARY_SHEET);
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&name)?;
        write_table(
            worksheet,
            &["Month", "Units", total_label],
            &summary_rows(&summaries),
            &header_format,
        )?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn csv_bytes(headers: &[&str], rows: &[[Cell; 2]]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row.iter().map(ToString::to_string))?;
    }
    writer
        .into_inner()
        .map_err(|e| AggError::IoError(e.into_error()))
}

/// Zip archive with one `<sheet>.csv` per month and, optionally, `summary.json`.
pub fn render_csv_archive(sheets: &[UnitSheet], include_summary: bool) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let mut namer = SheetNamer::new();

    for unit_sheet in sheets {
        let name = namer.name(&unit_sheet.key);
        let data = csv_bytes(
            &[unit_sheet.unit_header.as_str(), unit_sheet.amount_header.as_str()],
            &unit_sheet.to_rows(),
        )?;
        zip.start_file(format!("{}.csv", name), SimpleFileOptions::default())?;
        zip.write_all(&data)?;
    }

    if include_summary {
        let summaries: Vec<MonthSummary> = sheets.iter().map(UnitSheet::summary).collect();
        zip.start_file("summary.json", SimpleFileOptions::default())?;
        zip.write_all(serde_json::to_string_pretty(&summaries)?.as_bytes())?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

pub fn render(sheets: &[UnitSheet], format: OutputFormat, include_summary: bool) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Xlsx => render_xlsx(sheets, include_summary),
        OutputFormat::Csv => render_csv_archive(sheets, include_summary),
    }
}
