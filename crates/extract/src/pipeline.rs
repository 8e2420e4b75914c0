use std::path::Path;

use finlens_core::FinancialFact;
use thiserror::Error;

use crate::extract::MetricExtractor;
use crate::source::{PageSource, SourceError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Page text extraction failed: {0}")]
    Source(#[from] SourceError),
}

/// The result of extracting one document.
#[derive(Debug, Clone)]
pub struct DocumentExtraction {
    pub source_id: String,
    pub page_count: usize,
    pub facts: Vec<FinancialFact>,
}

/// Orchestrates: read → split into pages → extract facts per page.
pub struct MetricPipeline<S: PageSource> {
    source: S,
    extractor: MetricExtractor,
}

impl<S: PageSource> MetricPipeline<S> {
    pub fn new(source: S, extractor: MetricExtractor) -> Self {
        Self { source, extractor }
    }

    /// Process a file on disk. The file name is the document id.
    pub async fn process_file(&self, path: &Path) -> Result<DocumentExtraction, PipelineError> {
        let bytes = tokio::fs::read(path).await?;
        let source_id = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.process_bytes(&bytes, &source_id)
    }

    /// Process raw document bytes.
    pub fn process_bytes(
        &self,
        data: &[u8],
        source_id: &str,
    ) -> Result<DocumentExtraction, PipelineError> {
        let pages = self.source.pages(data)?;
        let facts = self.extractor.extract_document(source_id, &pages);
        Ok(DocumentExtraction {
            source_id: source_id.to_string(),
            page_count: pages.len(),
            facts,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
