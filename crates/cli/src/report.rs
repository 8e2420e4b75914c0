use std::path::{Path, PathBuf};

use finlens_core::{CategorizedTransaction, FinancialFact};
use finlens_extract::{FactSummary, MetricYearPivot};
use finlens_import::{CategorySpend, NecessitySpend};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

const CHART_WIDTH: usize = 40;

/// Write one CSV sheet. The header row is always written, so an empty
/// report is a valid file rather than a missing one.
fn write_sheet<I>(path: &Path, headers: &[&str], rows: I) -> Result<PathBuf, csv::Error>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(path.to_path_buf())
}

fn money(value: Decimal) -> String {
    format!("{:.2}", value)
}

fn year_cell(year: Option<finlens_core::FiscalYear>) -> String {
    year.map(|y| y.year().to_string()).unwrap_or_default()
}

// ── Metric reports ────────────────────────────────────────────────────────────

pub fn write_facts(path: &Path, facts: &[FinancialFact]) -> Result<PathBuf, csv::Error> {
    write_sheet(
        path,
        &["source_file", "page", "year", "metric", "currency", "value", "context"],
        facts.iter().map(|f| {
            vec![
                f.source_id.clone(),
                f.page.to_string(),
                year_cell(f.year),
                f.metric.to_string(),
                f.currency.to_string(),
                f.value.to_string(),
                f.context.clone(),
            ]
        }),
    )
}

pub fn write_yearly_summary(path: &Path, summary: &[FactSummary]) -> Result<PathBuf, csv::Error> {
    write_sheet(
        path,
        &["year", "metric", "currency", "count", "sum", "mean"],
        summary.iter().map(|s| {
            vec![
                year_cell(s.year),
                s.metric.to_string(),
                s.currency.to_string(),
                s.count.to_string(),
                money(s.sum),
                money(s.mean),
            ]
        }),
    )
}

pub fn write_pivot(path: &Path, pivot: &MetricYearPivot) -> Result<PathBuf, csv::Error> {
    let years: Vec<String> = pivot.years.iter().map(|y| y.year().to_string()).collect();
    let mut headers = vec!["metric", "currency"];
    headers.extend(years.iter().map(String::as_str));

    write_sheet(
        path,
        &headers,
        pivot.rows.iter().map(|row| {
            let mut cells = vec![row.metric.to_string(), row.currency.to_string()];
            cells.extend(row.values.iter().copied().map(money));
            cells
        }),
    )
}

// ── Statement reports ─────────────────────────────────────────────────────────

pub fn write_transactions(
    path: &Path,
    transactions: &[CategorizedTransaction],
) -> Result<PathBuf, csv::Error> {
    write_sheet(
        path,
        &["Date", "Description", "Amount", "Category", "Necessity"],
        transactions.iter().map(|t| {
            vec![
                t.date.to_string(),
                t.description.clone(),
                money(t.amount),
                t.category.clone(),
                t.necessity.to_string(),
            ]
        }),
    )
}

pub fn write_category_spend(path: &Path, spend: &[CategorySpend]) -> Result<PathBuf, csv::Error> {
    write_sheet(
        path,
        &["Category", "Necessity", "Spend"],
        spend
            .iter()
            .map(|s| vec![s.category.clone(), s.necessity.to_string(), money(s.spend)]),
    )
}

pub fn write_necessity_split(path: &Path, spend: &[NecessitySpend]) -> Result<PathBuf, csv::Error> {
    write_sheet(
        path,
        &["Necessity", "Spend"],
        spend.iter().map(|s| vec![s.necessity.to_string(), money(s.spend)]),
    )
}

/// Horizontal text bars, one per category, scaled to the largest spend.
pub fn render_spend_chart(spend: &[CategorySpend]) -> String {
    if spend.is_empty() {
        return "No expense data available\n".to_string();
    }

    let max = spend
        .iter()
        .filter_map(|s| s.spend.to_f64())
        .fold(0.0f64, f64::max);
    let label_width = spend.iter().map(|s| s.category.chars().count()).max().unwrap_or(0);

    let mut out = String::from("Spending by Category\n");
    for s in spend {
        let value = s.spend.to_f64().unwrap_or(0.0);
        let bar = if max > 0.0 {
            ((value / max) * CHART_WIDTH as f64).round() as usize
        } else {
            0
        };
        out.push_str(&format!(
            "{:<label_width$}  {:<width$}  {}\n",
            s.category,
            "#".repeat(bar.max(1)),
            money(s.spend),
            width = CHART_WIDTH,
        ));
    }
    out
}
