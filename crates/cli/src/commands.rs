use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use finlens_core::FinancialFact;
use finlens_extract::{
    metric_year_pivot, sort_facts, source_for_path, yearly_summary, DocumentExtraction,
    MetricExtractor, MetricPipeline, PipelineError,
};
use finlens_import::{analyze_statement, import::import_statement, StatementAnalysis};
use tokio::task::JoinSet;

use crate::config::Config;
use crate::report;

/// Paths of the files written by a command.
#[derive(Debug, Default)]
pub struct ReportFiles {
    pub paths: Vec<PathBuf>,
}

// ── statement ─────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct StatementRun {
    pub analysis: StatementAnalysis,
    pub chart: String,
    pub files: ReportFiles,
}

pub async fn run_statement(
    config: &Config,
    input: &Path,
    output_dir: &Path,
    delimiter: u8,
) -> Result<StatementRun> {
    let data = tokio::fs::read(input)
        .await
        .with_context(|| format!("Input file not found: {}", input.display()))?;

    let transactions = import_statement(data.as_slice(), delimiter, &config.columns)
        .with_context(|| format!("Failed to read statement {}", input.display()))?;
    tracing::info!(rows = transactions.len(), "Normalized {}", input.display());

    let engine = config.category_engine()?;
    let analysis = analyze_statement(transactions, &engine);
    let chart = report::render_spend_chart(&analysis.by_category);

    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let files = ReportFiles {
        paths: vec![
            report::write_transactions(
                &output_dir.join("detailed_transactions.csv"),
                &analysis.transactions,
            )?,
            report::write_category_spend(
                &output_dir.join("spending_by_category.csv"),
                &analysis.by_category,
            )?,
            report::write_necessity_split(
                &output_dir.join("necessity_split.csv"),
                &analysis.by_necessity,
            )?,
            {
                let path = output_dir.join("spending_chart.txt");
                tokio::fs::write(&path, &chart).await?;
                path
            },
        ],
    };

    Ok(StatementRun { analysis, chart, files })
}

// ── metrics ───────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct MetricsRun {
    pub facts: Vec<FinancialFact>,
    pub documents: usize,
    pub failed: Vec<PathBuf>,
    pub files: ReportFiles,
}

async fn extract_file(
    path: PathBuf,
    extractor: MetricExtractor,
) -> Result<DocumentExtraction, PipelineError> {
    let source = source_for_path(&path)?;
    MetricPipeline::new(source, extractor).process_file(&path).await
}

/// Extract every input concurrently. A document that cannot be read is
/// logged and skipped; the rest still make it into the reports.
pub async fn run_metrics(config: &Config, inputs: &[PathBuf], output_dir: &Path) -> Result<MetricsRun> {
    let extractor = MetricExtractor::new(config.metric_table()?);

    let mut set = JoinSet::new();
    for (index, path) in inputs.iter().cloned().enumerate() {
        let extractor = extractor.clone();
        set.spawn(async move {
            let result = extract_file(path.clone(), extractor).await;
            (index, path, result)
        });
    }

    let mut extracted: Vec<Option<DocumentExtraction>> = vec![None; inputs.len()];
    let mut failed = Vec::new();
    while let Some(joined) = set.join_next().await {
        let (index, path, result) = joined?;
        match result {
            Ok(doc) => {
                tracing::info!(
                    pages = doc.page_count,
                    facts = doc.facts.len(),
                    "Extracted {}",
                    path.display()
                );
                extracted[index] = Some(doc);
            }
            Err(e) => {
                tracing::warn!("Skipping {}: {e}", path.display());
                failed.push(path);
            }
        }
    }
    failed.sort();

    let documents = extracted.iter().flatten().count();
    let mut facts: Vec<FinancialFact> =
        extracted.into_iter().flatten().flat_map(|doc| doc.facts).collect();
    sort_facts(&mut facts);

    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let files = ReportFiles {
        paths: vec![
            report::write_facts(&output_dir.join("financial_data.csv"), &facts)?,
            report::write_yearly_summary(
                &output_dir.join("yearly_summary.csv"),
                &yearly_summary(&facts),
            )?,
            report::write_pivot(&output_dir.join("metric_by_year.csv"), &metric_year_pivot(&facts))?,
        ],
    };

    Ok(MetricsRun { facts, documents, failed, files })
}

#[cfg(test)]
mod tests {
    use super::*;
    use finlens_core::{Metric, Necessity};

    #[tokio::test]
    async fn statement_run_writes_reports() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("statement.csv");
        std::fs::write(
            &input,
            "Txn Date,Narration,Debit,Credit\n\
             2024-01-03,NETFLIX,15.99,\n\
             2024-01-01,RENT,1000,\n\
             2024-01-02,SALARY,,2500\n",
        )
        .unwrap();
        let out = dir.path().join("out");

        let run = run_statement(&Config::default(), &input, &out, b',').await.unwrap();

        assert_eq!(run.analysis.transactions[0].description, "RENT");
        assert_eq!(run.analysis.by_necessity[0].necessity, Necessity::Necessity);
        assert_eq!(run.files.paths.len(), 4);
        assert!(run.files.paths.iter().all(|p| p.exists()));
        assert!(run.chart.starts_with("Spending by Category"));
    }

    #[tokio::test]
    async fn statement_with_unknown_columns_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("statement.csv");
        std::fs::write(&input, "When,What\n2024-01-01,X\n").unwrap();

        let err = run_statement(&Config::default(), &input, dir.path(), b',')
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("date"));
    }

    #[tokio::test]
    async fn metrics_run_keeps_going_past_bad_documents() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("b_report.txt");
        std::fs::write(&good, "Revenue 2022 2023 100 120\x0cEPS 2023 1.5\n").unwrap();
        let other = dir.path().join("a_report.txt");
        std::fs::write(&other, "Total Assets 2023 900\n").unwrap();
        let missing = dir.path().join("missing.txt");

        let run = run_metrics(
            &Config::default(),
            &[good, missing.clone(), other],
            &dir.path().join("out"),
        )
        .await
        .unwrap();

        assert_eq!(run.documents, 2);
        assert_eq!(run.failed, vec![missing]);
        assert_eq!(run.facts.len(), 4);
        // Sorted by source file first.
        assert_eq!(run.facts[0].source_id, "a_report.txt");
        assert_eq!(run.facts[0].metric, Metric::TotalAssets);
        assert!(run.files.paths.iter().all(|p| p.exists()));
    }

    #[tokio::test]
    async fn metrics_with_no_inputs_writes_empty_reports() {
        let dir = tempfile::tempdir().unwrap();
        let run = run_metrics(&Config::default(), &[], dir.path()).await.unwrap();
        assert!(run.facts.is_empty());
        assert_eq!(run.files.paths.len(), 3);
    }
}
