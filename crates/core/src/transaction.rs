use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a spending category is essential or discretionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Necessity {
    Necessity,
    #[serde(rename = "Non-necessity")]
    NonNecessity,
}

impl Necessity {
    pub fn label(self) -> &'static str {
        match self {
            Necessity::Necessity => "Necessity",
            Necessity::NonNecessity => "Non-necessity",
        }
    }
}

impl fmt::Display for Necessity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Necessity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "necessity" => Ok(Necessity::Necessity),
            "non-necessity" | "non necessity" => Ok(Necessity::NonNecessity),
            other => Err(format!("Unknown necessity label: '{other}'")),
        }
    }
}

/// A bank-statement row after column reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTransaction {
    pub date: NaiveDate,
    pub description: String,
    /// Negative = outflow.
    pub amount: Decimal,
}

impl NormalizedTransaction {
    /// Absolute amount of an outflow; `None` for inflows and zero rows.
    pub fn spend(&self) -> Option<Decimal> {
        (self.amount < Decimal::ZERO).then(|| self.amount.abs())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub necessity: Necessity,
}

impl CategorizedTransaction {
    pub fn new(tx: NormalizedTransaction, category: impl Into<String>, necessity: Necessity) -> Self {
        CategorizedTransaction {
            date: tx.date,
            description: tx.description,
            amount: tx.amount,
            category: category.into(),
            necessity,
        }
    }

    pub fn spend(&self) -> Option<Decimal> {
        (self.amount < Decimal::ZERO).then(|| self.amount.abs())
    }
}
