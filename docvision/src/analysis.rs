//! Boundary to the document analysis service.
//!
//! The service is opaque: it receives excerpts of every document-like file in
//! one request and returns free text. Its failures never abort a run.

use std::future::Future;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::classify::FileCategory;
use crate::error::{AnalysisError, format_error_chain};
use crate::extraction::text::excerpt;
use crate::metadata::FileEntry;

/// Instructions sent with every analysis request
pub const DEFAULT_INSTRUCTIONS: &str =
    "Process document files and create normalized metadata package";

/// Recorded in place of the analysis result when the service fails
pub const DOCUMENT_FALLBACK_RESULT: &str =
    "Document processing completed with basic metadata only";

/// One document as presented to the analysis service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentContent {
    pub file_name: String,
    pub file_path: PathBuf,
    pub file_type_label: String,
    pub text_content: String,
}

/// A single batch analysis request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisRequest {
    pub documents: Vec<DocumentContent>,
    pub instructions: String,
}

/// An analysis service. One call per run, no retries.
pub trait DocumentAnalyzer: Send + Sync {
    fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> impl Future<Output = Result<String, AnalysisError>> + Send;
}

/// Run the analyzer, substituting [`DOCUMENT_FALLBACK_RESULT`] on failure.
pub async fn analyze_or_placeholder<A: DocumentAnalyzer>(
    analyzer: &A,
    request: &AnalysisRequest,
) -> String {
    info!(documents = request.documents.len(), "Running document analysis");

    match analyzer.analyze(request).await {
        Ok(result) => result,
        Err(e) => {
            warn!(error = %format_error_chain(&e), "Document analysis failed, using placeholder result");
            DOCUMENT_FALLBACK_RESULT.to_string()
        }
    }
}

/// Build the analysis request for every document and other file.
///
/// PDFs contribute their extracted excerpt. Other files are read as UTF-8 and
/// cut to the same excerpt length. Entries whose metadata could not be read
/// are left out.
pub fn build_request(entries: &[FileEntry], excerpt_chars: usize) -> AnalysisRequest {
    let documents = entries
        .iter()
        .filter_map(FileEntry::record)
        .filter(|record| FileCategory::of(&record.file_path) != FileCategory::Image)
        .map(|record| {
            let pdf_excerpt = record
                .pdf_analysis
                .as_ref()
                .and_then(|analysis| analysis.summary.as_ref())
                .map(|summary| summary.text_excerpt.clone());

            DocumentContent {
                file_name: record.file_name.clone(),
                file_path: record.file_path.clone(),
                file_type_label: record.file_type_label.clone(),
                text_content: pdf_excerpt
                    .unwrap_or_else(|| read_text_content(&record.file_path, excerpt_chars)),
            }
        })
        .collect();

    AnalysisRequest {
        documents,
        instructions: DEFAULT_INSTRUCTIONS.to_string(),
    }
}

fn read_text_content(path: &Path, excerpt_chars: usize) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => excerpt(&content, excerpt_chars),
        Err(e) => format!("[Error reading file content: {}]", e),
    }
}
