//! Unit selection and rent cleanup for a single journal.

use crate::core::ConfigProvider;
use crate::domain::model::{Cell, InvalidAmountPolicy, Journal, SheetOutcome, UnitEntry, UnitSheet};
use crate::utils::error::{AggError, Result};

#[derive(Debug, Clone)]
pub struct UnitFilter {
    letters: Vec<char>,
    unit_col: usize,
    amount_col: usize,
    total_label: String,
    empty_message: String,
    policy: InvalidAmountPolicy,
}

/// Outcome of cleaning one amount cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Amount {
    Missing,
    Value(f64),
    Invalid(String),
}

pub fn clean_amount(cell: &Cell) -> Amount {
    match cell {
        Cell::Empty => Amount::Missing,
        Cell::Number(n) if n.is_finite() => Amount::Value(n.abs()),
        Cell::Number(n) => Amount::Invalid(n.to_string()),
        Cell::Bool(_) | Cell::Date(_) => Amount::Invalid(cell.to_string()),
        Cell::Text(raw) if raw.trim().is_empty() => Amount::Missing,
        Cell::Text(raw) => {
            let stripped: String = raw
                .chars()
                .filter(|c| !matches!(c, '$' | ',' | '(' | ')'))
                .collect();
            match stripped.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => Amount::Value(v.abs()),
                _ => Amount::Invalid(raw.clone()),
            }
        }
    }
}

fn letters_phrase(letters: &str) -> String {
    let chars: Vec<String> = letters.chars().map(|c| c.to_string()).collect();
    match chars.as_slice() {
        [] => String::new(),
        [one] => one.clone(),
        [first, second] => format!("{} or {}", first, second),
        [init @ .., last] => format!("{}, or {}", init.join(", "), last),
    }
}

impl UnitFilter {
    pub fn new(
        unit_letters: &str,
        unit_column: usize,
        amount_column: usize,
        total_label: &str,
        policy: InvalidAmountPolicy,
    ) -> Result<Self> {
        if unit_letters.is_empty() {
            return Err(AggError::InvalidConfigValueError {
                field: "unit_letters".to_string(),
                value: unit_letters.to_string(),
                reason: "At least one unit letter is required".to_string(),
            });
        }
        if unit_column == 0 || amount_column == 0 {
            return Err(AggError::ConfigError {
                message: "Column numbers start at 1".to_string(),
            });
        }

        Ok(Self {
            letters: unit_letters.chars().collect(),
            unit_col: unit_column - 1,
            amount_col: amount_column - 1,
            total_label: total_label.to_string(),
            empty_message: format!("no units containing {}", letters_phrase(unit_letters)),
            policy,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.unit_letters(),
            config.unit_column(),
            config.amount_column(),
            config.total_label(),
            config.on_invalid_amount(),
        )
    }

    /// True when the unit's text contains any of the letters. Case-sensitive.
    pub fn matches_unit(&self, cell: &Cell) -> bool {
        cell.as_text()
            .map(|text| text.chars().any(|c| self.letters.contains(&c)))
            .unwrap_or(false)
    }

    fn no_units(&self, key: &str, unit_header: String, amount_header: String) -> UnitSheet {
        UnitSheet {
            key: key.to_string(),
            unit_header,
            amount_header,
            entries: Vec::new(),
            total_label: self.total_label.clone(),
            empty_message: self.empty_message.clone(),
            outcome: SheetOutcome::NoUnits,
        }
    }

    /// Builds the month sheet for `journal`. Returns the sheet and the number of rows
    /// dropped for an unreadable amount.
    pub fn apply(&self, journal: &Journal) -> Result<(UnitSheet, usize)> {
        let table = &journal.table;

        if table.width() <= self.unit_col.max(self.amount_col) {
            tracing::debug!(
                "'{}' has only {} columns, no units to aggregate",
                journal.key,
                table.width()
            );
            return Ok((
                self.no_units(&journal.key, "0".to_string(), "1".to_string()),
                0,
            ));
        }

        let unit_header = table.header(self.unit_col);
        let amount_header = table.header(self.amount_col);
        let mut entries = Vec::new();
        let mut skipped = 0;

        for idx in 0..table.rows.len() {
            let unit = table.cell(idx, self.unit_col);
            if !self.matches_unit(unit) {
                continue;
            }

            match clean_amount(table.cell(idx, self.amount_col)) {
                Amount::Missing => continue,
                Amount::Value(v) if v == 0.0 => continue,
                Amount::Value(amount) => entries.push(UnitEntry {
                    unit: unit.clone(),
                    amount,
                }),
                Amount::Invalid(value) => {
                    let sheet_row = table.sheet_row(idx);
                    match self.policy {
                        InvalidAmountPolicy::Error => {
                            return Err(AggError::InvalidAmount {
                                sheet: journal.key.clone(),
                                row: sheet_row,
                                value,
                            });
                        }
                        InvalidAmountPolicy::Skip => {
                            tracing::warn!(
                                "⚠️ Skipping unit {} in '{}' row {}: invalid amount '{}'",
                                unit,
                                journal.key,
                                sheet_row,
                                value
                            );
                            skipped += 1;
                        }
                    }
                }
            }
        }

        if entries.is_empty() {
            return Ok((self.no_units(&journal.key, unit_header, amount_header), skipped));
        }

        Ok((
            UnitSheet {
                key: journal.key.clone(),
                unit_header,
                amount_header,
                entries,
                total_label: self.total_label.clone(),
                empty_message: self.empty_message.clone(),
                outcome: SheetOutcome::Units,
            },
            skipped,
        ))
    }
}
