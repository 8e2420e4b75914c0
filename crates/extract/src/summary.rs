use std::collections::{BTreeMap, BTreeSet};

use finlens_core::{Currency, FinancialFact, FiscalYear, Metric};
use rust_decimal::Decimal;
use serde::Serialize;

/// Undated facts sort after every dated one.
fn year_key(year: Option<FiscalYear>) -> (bool, Option<FiscalYear>) {
    (year.is_none(), year)
}

/// Report order: source, then year (undated last), then metric name.
/// Ties keep extraction order.
pub fn sort_facts(facts: &mut [FinancialFact]) {
    facts.sort_by(|a, b| {
        a.source_id
            .cmp(&b.source_id)
            .then_with(|| year_key(a.year).cmp(&year_key(b.year)))
            .then_with(|| a.metric.name().cmp(b.metric.name()))
    });
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactSummary {
    pub year: Option<FiscalYear>,
    pub metric: Metric,
    pub currency: Currency,
    pub count: usize,
    pub sum: Decimal,
    pub mean: Decimal,
}

/// Count, sum and mean per `(year, metric, currency)`, ordered by year, metric
/// name and currency code. Sums saturate at the `Decimal` bounds.
pub fn yearly_summary(facts: &[FinancialFact]) -> Vec<FactSummary> {
    let mut groups: BTreeMap<
        ((bool, Option<FiscalYear>), &str, &str),
        (Metric, Currency, usize, Decimal),
    > = BTreeMap::new();
    for fact in facts {
        let entry = groups
            .entry((year_key(fact.year), fact.metric.name(), fact.currency.code()))
            .or_insert((fact.metric, fact.currency, 0, Decimal::ZERO));
        entry.2 += 1;
        entry.3 = entry.3.saturating_add(fact.value);
    }

    groups
        .into_iter()
        .map(|(((_, year), _, _), (metric, currency, count, sum))| FactSummary {
            year,
            metric,
            currency,
            count,
            sum,
            mean: sum / Decimal::from(count),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PivotRow {
    pub metric: Metric,
    pub currency: Currency,
    /// One sum per column of [`MetricYearPivot::years`]; zero where absent.
    pub values: Vec<Decimal>,
}

/// Summed values per `(metric, currency)` row and year column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricYearPivot {
    pub years: Vec<FiscalYear>,
    pub rows: Vec<PivotRow>,
}

/// Rows are ordered by metric name, then currency code. Undated facts have
/// no column and are left out.
pub fn metric_year_pivot(facts: &[FinancialFact]) -> MetricYearPivot {
    let dated: Vec<(&FinancialFact, FiscalYear)> =
        facts.iter().filter_map(|f| f.year.map(|y| (f, y))).collect();

    let years: Vec<FiscalYear> = dated
        .iter()
        .map(|(_, y)| *y)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut cells: BTreeMap<(&str, &str), (Metric, Currency, Vec<Decimal>)> = BTreeMap::new();
    for (fact, year) in dated {
        let column = years.binary_search(&year).unwrap_or_default();
        let (_, _, values) = cells
            .entry((fact.metric.name(), fact.currency.code()))
            .or_insert_with(|| (fact.metric, fact.currency, vec![Decimal::ZERO; years.len()]));
        values[column] = values[column].saturating_add(fact.value);
    }

    let rows = cells
        .into_iter()
        .map(|(_, (metric, currency, values))| PivotRow { metric, currency, values })
        .collect();

    MetricYearPivot { years, rows }
}
