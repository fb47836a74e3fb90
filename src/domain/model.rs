use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single spreadsheet value as imported from a journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Bool(bool),
    Number(f64),
    /// Excel date serial. Kept apart from numbers so it never counts as an amount.
    Date(f64),
    Text(String),
}

/// Calendar form of an Excel date serial (1900 system).
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(TimeDelta::try_milliseconds(millis)?)
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Text form used for pattern matching. Empty cells have none.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Bool(true) => Some("True".to_string()),
            Cell::Bool(false) => Some("False".to_string()),
            Cell::Number(n) => Some(n.to_string()),
            Cell::Date(serial) => Some(match excel_serial_to_datetime(*serial) {
                Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
                None => serial.to_string(),
            }),
            Cell::Text(s) => Some(s.clone()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_text() {
            Some(text) => f.write_str(&text),
            None => Ok(()),
        }
    }
}

/// First worksheet of a journal: header names plus data rows.
///
/// Column indices are absolute sheet columns, so index 1 is always column B.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Zero-based sheet row holding the headers; data starts on the row below.
    pub header_row: usize,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }

    pub fn header(&self, col: usize) -> String {
        match self.headers.get(col) {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("Unnamed: {}", col),
        }
    }

    /// One-based spreadsheet row number of data row `row`.
    pub fn sheet_row(&self, row: usize) -> usize {
        self.header_row + row + 2
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        const EMPTY: &Cell = &Cell::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(EMPTY)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalSource {
    /// "Month Year" taken from the file name, or the file name itself.
    pub key: String,
    pub file_name: String,
    pub path: String,
}

#[derive(Debug, Clone)]
pub struct Journal {
    pub key: String,
    pub file_name: String,
    pub table: Table,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnitEntry {
    pub unit: Cell,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetOutcome {
    Units,
    /// Nothing matched; carries the placeholder message row.
    NoUnits,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnitSheet {
    pub key: String,
    pub unit_header: String,
    pub amount_header: String,
    pub entries: Vec<UnitEntry>,
    pub total_label: String,
    pub empty_message: String,
    pub outcome: SheetOutcome,
}

impl UnitSheet {
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.amount).sum()
    }

    /// Rows as they appear in the report, header excluded.
    pub fn to_rows(&self) -> Vec<[Cell; 2]> {
        match self.outcome {
            SheetOutcome::NoUnits => vec![[
                Cell::Text(self.empty_message.clone()),
                Cell::Number(0.0),
            ]],
            SheetOutcome::Units => self
                .entries
                .iter()
                .map(|e| [e.unit.clone(), Cell::Number(e.amount)])
                .chain(std::iter::once([
                    Cell::Text(self.total_label.clone()),
                    Cell::Number(self.total()),
                ]))
                .collect(),
        }
    }

    pub fn summary(&self) -> MonthSummary {
        MonthSummary {
            month: self.key.clone(),
            units: self.entries.len(),
            total_rent: self.total(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub month: String,
    pub units: usize,
    pub total_rent: f64,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub sheets: Vec<UnitSheet>,
    pub skipped_amounts: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Xlsx,
    /// Zip archive of one CSV per month.
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "zip",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum InvalidAmountPolicy {
    #[default]
    Error,
    Skip,
}
