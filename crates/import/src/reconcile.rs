use chrono::{NaiveDate, NaiveDateTime};
use finlens_core::{parse_amount, NormalizedTransaction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::csv::Table;

/// Accepted header names per logical column, compared trimmed and
/// case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ColumnAliases {
    pub date: Vec<String>,
    pub description: Vec<String>,
    pub amount: Vec<String>,
    pub credit: Vec<String>,
    pub debit: Vec<String>,
}

fn owned(aliases: &[&str]) -> Vec<String> {
    aliases.iter().map(|a| a.to_string()).collect()
}

impl Default for ColumnAliases {
    fn default() -> Self {
        Self {
            date: owned(&["date", "txn date", "transaction date", "posted date"]),
            description: owned(&[
                "description",
                "narration",
                "transaction details",
                "merchant",
                "remarks",
            ]),
            amount: owned(&["amount", "transaction amount", "value"]),
            credit: owned(&["credit", "deposit"]),
            debit: owned(&["debit", "withdrawal"]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountColumn {
    Direct(usize),
    /// Amount = credit - debit.
    CreditDebit { credit: usize, debit: usize },
}

/// Resolved column indices for a particular table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub date: usize,
    pub description: usize,
    pub amount: AmountColumn,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("Missing required {field} column (accepted headers: {accepted})")]
    MissingColumn { field: &'static str, accepted: String },
    #[error(
        "Missing amount column: need one of [{amount}] or both a credit column [{credit}] and a debit column [{debit}]"
    )]
    MissingAmount { amount: String, credit: String, debit: String },
}

fn find_column(headers: &[String], aliases: &[String]) -> Option<usize> {
    headers.iter().position(|header| {
        let header = header.trim().to_lowercase();
        aliases.iter().any(|alias| alias.trim().to_lowercase() == header)
    })
}

impl ColumnMapping {
    pub fn resolve(headers: &[String], aliases: &ColumnAliases) -> Result<Self, ReconcileError> {
        let date = find_column(headers, &aliases.date).ok_or_else(|| ReconcileError::MissingColumn {
            field: "date",
            accepted: aliases.date.join(", "),
        })?;
        let description = find_column(headers, &aliases.description).ok_or_else(|| {
            ReconcileError::MissingColumn {
                field: "description",
                accepted: aliases.description.join(", "),
            }
        })?;

        let amount = match find_column(headers, &aliases.amount) {
            Some(col) => AmountColumn::Direct(col),
            None => match (
                find_column(headers, &aliases.credit),
                find_column(headers, &aliases.debit),
            ) {
                (Some(credit), Some(debit)) => AmountColumn::CreditDebit { credit, debit },
                _ => {
                    return Err(ReconcileError::MissingAmount {
                        amount: aliases.amount.join(", "),
                        credit: aliases.credit.join(", "),
                        debit: aliases.debit.join(", "),
                    })
                }
            },
        };

        Ok(Self { date, description, amount })
    }

    /// Coerce one row; `None` when date, description or amount cannot be read,
    /// or when credit minus debit does not fit a `Decimal`.
    pub fn normalize_row(&self, row: &[String]) -> Option<NormalizedTransaction> {
        let date = parse_date(row.get(self.date)?)?;
        let description = row.get(self.description)?.trim();
        if description.is_empty() {
            return None;
        }

        let amount = match self.amount {
            AmountColumn::Direct(col) => parse_amount(row.get(col)?).ok()?,
            AmountColumn::CreditDebit { credit, debit } => {
                let cell = |col: usize| {
                    row.get(col)
                        .and_then(|s| parse_amount(s).ok())
                        .unwrap_or(Decimal::ZERO)
                };
                cell(credit).checked_sub(cell(debit))?
            }
        };

        Some(NormalizedTransaction {
            date,
            description: description.to_string(),
            amount,
        })
    }
}

/// Resolve the table's columns and coerce every row, dropping rows that fail.
pub fn normalize_table(
    table: &Table,
    aliases: &ColumnAliases,
) -> Result<Vec<NormalizedTransaction>, ReconcileError> {
    let mapping = ColumnMapping::resolve(&table.headers, aliases)?;
    Ok(table
        .rows
        .iter()
        .filter_map(|row| mapping.normalize_row(row))
        .collect())
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d", "%m-%d-%Y", "%d-%m-%Y", "%d %b %Y",
    "%d-%b-%Y", "%b %d, %Y", "%d.%m.%Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}
