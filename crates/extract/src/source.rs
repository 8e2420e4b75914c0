use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("PDF parse error: {0}")]
    Pdf(String),
    #[error("PDF support not available, build with the `pdf` feature")]
    PdfNotAvailable,
}

/// Abstraction over anything that yields plain text per page.
/// An empty string is a valid page.
pub trait PageSource: Send + Sync {
    fn pages(&self, data: &[u8]) -> Result<Vec<String>, SourceError>;
}

impl<S: PageSource + ?Sized> PageSource for Box<S> {
    fn pages(&self, data: &[u8]) -> Result<Vec<String>, SourceError> {
        (**self).pages(data)
    }
}

// ── Plain text (always available) ─────────────────────────────────────────────

/// UTF-8 text with pages separated by form feeds (`\x0c`), as written by
/// `pdftotext` and similar tools. Invalid UTF-8 is replaced, not rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextSource;

impl PageSource for PlainTextSource {
    fn pages(&self, data: &[u8]) -> Result<Vec<String>, SourceError> {
        let text = String::from_utf8_lossy(data);
        if text.is_empty() {
            return Ok(Vec::new());
        }
        Ok(text.split('\x0c').map(str::to_string).collect())
    }
}

// ── Mock source (tests) ───────────────────────────────────────────────────────

/// Returns preset pages regardless of input.
pub struct MockSource {
    pub pages: Vec<String>,
}

impl MockSource {
    pub fn new<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { pages: pages.into_iter().map(Into::into).collect() }
    }
}

impl PageSource for MockSource {
    fn pages(&self, _data: &[u8]) -> Result<Vec<String>, SourceError> {
        Ok(self.pages.clone())
    }
}

// ── PDF backend (optional, gated behind `pdf` feature) ────────────────────────

#[cfg(feature = "pdf")]
pub mod pdf_backend {
    use super::{PageSource, SourceError};
    use lopdf::Document;

    /// Text layer of each PDF page via `lopdf`. A page whose text cannot be
    /// decoded comes back empty; scanned pages yield empty strings too.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct PdfTextSource;

    impl PageSource for PdfTextSource {
        fn pages(&self, data: &[u8]) -> Result<Vec<String>, SourceError> {
            let doc = Document::load_mem(data).map_err(|e| SourceError::Pdf(e.to_string()))?;
            Ok(doc
                .get_pages()
                .keys()
                .map(|&number| doc.extract_text(&[number]).unwrap_or_default())
                .collect())
        }
    }
}

/// Pick a source from the file extension: `.pdf` needs the `pdf` feature,
/// anything else is read as plain text.
pub fn source_for_path(path: &Path) -> Result<Box<dyn PageSource>, SourceError> {
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    if !is_pdf {
        return Ok(Box::new(PlainTextSource));
    }

    #[cfg(feature = "pdf")]
    {
        Ok(Box::new(pdf_backend::PdfTextSource))
    }
    #[cfg(not(feature = "pdf"))]
    {
        Err(SourceError::PdfNotAvailable)
    }
}
