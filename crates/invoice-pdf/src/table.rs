//! Line-item table rows
//!
//! Expenses come first, then time entries, each group in input order.

use legal_types::{Expense, TimeEntry};
use serde::Serialize;

use crate::error::RenderError;
use crate::format;

pub const EXPENSE_LABEL: &str = "Expense";
pub const TIME_ENTRY_LABEL: &str = "Time Entry";

/// Shown in the hours and rate columns of expense rows
pub const PLACEHOLDER: &str = "-";

/// Column headings, left to right
pub const COLUMNS: [&str; 6] = ["Description", "Date", "Type", "Hours", "Rate", "Amount"];

/// Relative column widths; sums to 1
pub(crate) const COLUMN_WEIGHTS: [f32; 6] = [0.34, 0.14, 0.13, 0.10, 0.13, 0.16];

/// Columns whose text is right-aligned
pub(crate) const NUMERIC_COLUMNS: [bool; 6] = [false, false, false, true, true, true];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowKind {
    Expense,
    TimeEntry,
}

/// One rendered table row, with every cell already formatted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub kind: RowKind,
    pub description: String,
    pub date: String,
    pub type_label: String,
    pub hours: String,
    pub rate: String,
    pub amount: String,
}

impl TableRow {
    pub fn cells(&self) -> [&str; 6] {
        [
            self.description.as_str(),
            self.date.as_str(),
            self.type_label.as_str(),
            self.hours.as_str(),
            self.rate.as_str(),
            self.amount.as_str(),
        ]
    }
}

fn ensure_finite(
    kind: &'static str,
    index: usize,
    field: &str,
    value: f64,
) -> Result<(), RenderError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RenderError::InvalidLineItem {
            kind,
            index,
            reason: format!("{} is {}", field, value),
        })
    }
}

/// Format every line item into table rows.
///
/// Fails only on non-finite numbers, which have no printable amount.
pub fn build_rows(
    expenses: &[Expense],
    time_entries: &[TimeEntry],
    currency_symbol: &str,
) -> Result<Vec<TableRow>, RenderError> {
    let mut rows = Vec::with_capacity(expenses.len() + time_entries.len());

    for (index, expense) in expenses.iter().enumerate() {
        ensure_finite("expense", index, "amount", expense.amount)?;
        rows.push(TableRow {
            kind: RowKind::Expense,
            description: expense.description.clone(),
            date: format::display_date(expense.date.as_deref()),
            type_label: EXPENSE_LABEL.to_string(),
            hours: PLACEHOLDER.to_string(),
            rate: PLACEHOLDER.to_string(),
            amount: format::money(expense.amount, currency_symbol),
        });
    }

    for (index, entry) in time_entries.iter().enumerate() {
        ensure_finite("time entry", index, "hours", entry.hours)?;
        ensure_finite("time entry", index, "rate", entry.rate)?;
        rows.push(TableRow {
            kind: RowKind::TimeEntry,
            description: entry.description.clone(),
            date: format::display_date(entry.date.as_deref()),
            type_label: TIME_ENTRY_LABEL.to_string(),
            hours: format::hours(entry.hours),
            rate: format::money(entry.rate, currency_symbol),
            amount: format::money(entry.amount(), currency_symbol),
        });
    }

    Ok(rows)
}
