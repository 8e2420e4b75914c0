pub mod align;
pub mod extract;
pub mod metrics;
pub mod pipeline;
pub mod source;
pub mod summary;

pub use align::assign_years_to_amounts;
pub use extract::{amount_tokens, extract_years, MetricExtractor};
pub use metrics::{default_aliases, MetricTable};
pub use pipeline::{DocumentExtraction, MetricPipeline, PipelineError};
pub use source::{source_for_path, MockSource, PageSource, PlainTextSource, SourceError};
pub use summary::{
    metric_year_pivot, sort_facts, yearly_summary, FactSummary, MetricYearPivot, PivotRow,
};

#[cfg(feature = "pdf")]
pub use source::pdf_backend::PdfTextSource;
