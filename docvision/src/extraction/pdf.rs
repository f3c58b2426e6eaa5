//! PDF content analysis.
//!
//! Backends are tried in order and the first one that reads the document wins:
//! - PDFium (primary): page text plus embedded image counts
//! - Poppler (fallback): page text only, tolerating unreadable pages
//!
//! When every backend fails the result records the failure instead of
//! returning an error, so the surrounding file metadata is never lost.

pub mod pdfium_backend;
pub mod poppler_backend;
pub mod summary;

use std::path::Path;

use serde::Serialize;
use strum::Display;
use tracing::{debug, warn};

use crate::config::default_excerpt_chars;
use crate::error::PdfError;

pub use summary::{PageText, PdfSummary, summarize};

/// Which backend produced a [`PdfAnalysis`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    Primary,
    Fallback,
    Failed,
}

/// A PDF reading strategy.
///
/// Implementations return raw per-page text and, when they can enumerate
/// embedded images, per-page image counts. Aggregation is done by
/// [`summarize`] so every backend reports the same statistics.
pub trait PdfBackend: Send + Sync {
    /// Short name used in logs and error messages
    fn name(&self) -> &'static str;

    /// Whether [`PageText::image_count`] is filled in for every page
    fn counts_images(&self) -> bool {
        false
    }

    /// Read every page of the document in order.
    fn read_pages(&self, path: &Path) -> Result<Vec<PageText>, PdfError>;
}

/// Result of analysing one PDF
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PdfAnalysis {
    #[serde(flatten)]
    pub summary: Option<PdfSummary>,

    pub extraction_method: ExtractionMethod,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PdfAnalysis {
    fn extracted(summary: PdfSummary, method: ExtractionMethod) -> Self {
        Self {
            summary: Some(summary),
            extraction_method: method,
            error: None,
        }
    }

    fn failed(message: String) -> Self {
        Self {
            summary: None,
            extraction_method: ExtractionMethod::Failed,
            error: Some(message),
        }
    }
}

/// Ordered chain of PDF backends
pub struct PdfContentExtractor {
    backends: Vec<Box<dyn PdfBackend>>,
    excerpt_chars: usize,
}

impl Default for PdfContentExtractor {
    fn default() -> Self {
        Self::new(default_excerpt_chars())
    }
}

impl PdfContentExtractor {
    /// PDFium first, Poppler as fallback.
    pub fn new(excerpt_chars: usize) -> Self {
        Self::with_backends(
            vec![
                Box::new(pdfium_backend::PdfiumBackend),
                Box::new(poppler_backend::PopplerBackend),
            ],
            excerpt_chars,
        )
    }

    /// Build a chain from explicit backends. The first backend is the primary.
    pub fn with_backends(backends: Vec<Box<dyn PdfBackend>>, excerpt_chars: usize) -> Self {
        Self {
            backends,
            excerpt_chars,
        }
    }

    /// Analyse a PDF. Never fails; see [`ExtractionMethod::Failed`].
    pub fn extract(&self, path: &Path) -> PdfAnalysis {
        let mut failures = Vec::new();

        for (index, backend) in self.backends.iter().enumerate() {
            match backend.read_pages(path) {
                Ok(pages) => {
                    let method = if index == 0 {
                        ExtractionMethod::Primary
                    } else {
                        ExtractionMethod::Fallback
                    };
                    let summary = summarize(&pages, self.excerpt_chars, backend.counts_images());
                    debug!(
                        path = %path.display(),
                        backend = backend.name(),
                        method = %method,
                        pages = summary.total_pages,
                        characters = summary.character_count,
                        "PDF content extracted"
                    );
                    return PdfAnalysis::extracted(summary, method);
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        backend = backend.name(),
                        error = %e,
                        "PDF backend failed"
                    );
                    failures.push(format!("{} error: {}", backend.name(), e));
                }
            }
        }

        if failures.is_empty() {
            failures.push("no PDF backends configured".to_string());
        }

        PdfAnalysis::failed(format!("PDF extraction failed: {}", failures.join(" | ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Backend returning fixed pages, or a fixed error
    struct FixedBackend {
        name: &'static str,
        pages: Option<Vec<PageText>>,
    }

    impl FixedBackend {
        fn ok(name: &'static str, pages: Vec<PageText>) -> Box<dyn PdfBackend> {
            Box::new(Self {
                name,
                pages: Some(pages),
            })
        }

        fn broken(name: &'static str) -> Box<dyn PdfBackend> {
            Box::new(Self { name, pages: None })
        }
    }

    impl PdfBackend for FixedBackend {
        fn name(&self) -> &'static str {
            self.name
        }

        fn counts_images(&self) -> bool {
            self.pages
                .as_ref()
                .is_some_and(|pages| pages.iter().all(|page| page.image_count.is_some()))
        }

        fn read_pages(&self, _path: &Path) -> Result<Vec<PageText>, PdfError> {
            self.pages.clone().ok_or(PdfError::Load {
                backend: self.name,
                message: "corrupt xref table".to_string(),
            })
        }
    }

    fn page(text: &str, images: usize) -> PageText {
        PageText {
            text: Some(text.to_string()),
            image_count: Some(images),
        }
    }

    fn text_only(text: Option<&str>) -> PageText {
        PageText {
            text: text.map(str::to_string),
            image_count: None,
        }
    }

    #[test]
    fn test_primary_success() {
        let extractor = PdfContentExtractor::with_backends(
            vec![
                FixedBackend::ok("primary", vec![page("Hello world", 2), page("Bye", 0)]),
                FixedBackend::broken("fallback"),
            ],
            2000,
        );

        let analysis = extractor.extract(Path::new("doc.pdf"));
        assert_eq!(analysis.extraction_method, ExtractionMethod::Primary);
        assert!(analysis.error.is_none());

        let summary = analysis.summary.unwrap();
        assert_eq!(summary.total_pages, 2);
        assert_eq!(summary.page_details.len(), summary.total_pages);
        assert_eq!(summary.character_count, "Hello world\nBye".chars().count());
        assert_eq!(summary.total_images, Some(2));
        assert_eq!(summary.has_images, Some(true));
    }

    #[test]
    fn test_fallback_used_when_primary_fails() {
        let extractor = PdfContentExtractor::with_backends(
            vec![
                FixedBackend::broken("primary"),
                FixedBackend::ok(
                    "fallback",
                    vec![text_only(Some("Recovered text")), text_only(None)],
                ),
            ],
            2000,
        );

        let analysis = extractor.extract(Path::new("doc.pdf"));
        assert_eq!(analysis.extraction_method, ExtractionMethod::Fallback);
        assert!(analysis.error.is_none());

        let summary = analysis.summary.unwrap();
        assert!(summary.has_text);
        assert_eq!(summary.text_excerpt, "Recovered text");
        assert_eq!(summary.word_count, 2);
        assert_eq!(summary.total_images, None);
        assert_eq!(summary.has_images, None);
    }

    #[test]
    fn test_all_backends_failing_is_recorded() {
        let extractor = PdfContentExtractor::with_backends(
            vec![
                FixedBackend::broken("primary"),
                FixedBackend::broken("fallback"),
            ],
            2000,
        );

        let analysis = extractor.extract(Path::new("doc.pdf"));
        assert_eq!(analysis.extraction_method, ExtractionMethod::Failed);
        assert!(analysis.summary.is_none());

        let error = analysis.error.unwrap();
        assert!(error.contains("primary error"));
        assert!(error.contains("fallback error"));
    }

    #[test]
    fn test_zero_page_primary_reports_no_images() {
        let extractor =
            PdfContentExtractor::with_backends(vec![FixedBackend::ok("primary", vec![])], 2000);

        let summary = extractor.extract(Path::new("empty.pdf")).summary.unwrap();
        assert_eq!(summary.total_pages, 0);
        assert_eq!(summary.total_images, Some(0));
        assert_eq!(summary.has_images, Some(false));
    }

    #[test]
    fn test_failed_analysis_serializes_only_method_and_error() {
        let extractor = PdfContentExtractor::with_backends(vec![], 2000);
        let value = serde_json::to_value(extractor.extract(Path::new("doc.pdf"))).unwrap();

        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(value["extraction_method"], "failed");
        assert!(!value["error"].as_str().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_with_real_backends_fails_cleanly() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        std::io::Write::write_all(&mut file, b"this is not a pdf").unwrap();

        let analysis = PdfContentExtractor::default().extract(file.path());
        assert_eq!(analysis.extraction_method, ExtractionMethod::Failed);
        assert!(!analysis.error.unwrap_or_default().is_empty());
    }
}
