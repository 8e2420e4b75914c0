use std::collections::BTreeMap;

use finlens_core::{CategorizedTransaction, Necessity, NormalizedTransaction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::rules::CategoryRuleEngine;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpend {
    pub category: String,
    pub necessity: Necessity,
    pub spend: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NecessitySpend {
    pub necessity: Necessity,
    pub spend: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct StatementAnalysis {
    /// Every row, sorted by date.
    pub transactions: Vec<CategorizedTransaction>,
    /// Outflows only, largest first.
    pub by_category: Vec<CategorySpend>,
    pub by_necessity: Vec<NecessitySpend>,
}

impl StatementAnalysis {
    pub fn total_spend(&self) -> Decimal {
        self.by_necessity
            .iter()
            .fold(Decimal::ZERO, |total, n| total.saturating_add(n.spend))
    }
}

/// Sort by date, categorize every row, and total outflows per category and
/// per necessity label. Equal totals keep group-key order. Totals saturate at
/// `Decimal::MAX`.
pub fn analyze_statement(
    mut transactions: Vec<NormalizedTransaction>,
    engine: &CategoryRuleEngine,
) -> StatementAnalysis {
    transactions.sort_by_key(|tx| tx.date);

    let transactions: Vec<CategorizedTransaction> = transactions
        .into_iter()
        .map(|tx| {
            let (category, necessity) = engine.categorize(&tx.description);
            let category = category.to_string();
            CategorizedTransaction::new(tx, category, necessity)
        })
        .collect();

    let mut per_category: BTreeMap<(String, Necessity), Decimal> = BTreeMap::new();
    let mut per_necessity: BTreeMap<Necessity, Decimal> = BTreeMap::new();
    for tx in &transactions {
        if let Some(spend) = tx.spend() {
            let total = per_category.entry((tx.category.clone(), tx.necessity)).or_default();
            *total = total.saturating_add(spend);
            let total = per_necessity.entry(tx.necessity).or_default();
            *total = total.saturating_add(spend);
        }
    }

    let mut by_category: Vec<CategorySpend> = per_category
        .into_iter()
        .map(|((category, necessity), spend)| CategorySpend { category, necessity, spend })
        .collect();
    by_category.sort_by(|a, b| b.spend.cmp(&a.spend));

    let mut by_necessity: Vec<NecessitySpend> = per_necessity
        .into_iter()
        .map(|(necessity, spend)| NecessitySpend { necessity, spend })
        .collect();
    by_necessity.sort_by(|a, b| b.spend.cmp(&a.spend));

    StatementAnalysis { transactions, by_category, by_necessity }
}
