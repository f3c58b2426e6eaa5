//! Orchestration of a single batch run.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::{StreamExt, stream};
use tracing::{debug, info, warn};

use crate::analysis::{DocumentAnalyzer, analyze_or_placeholder, build_request};
use crate::classify::{FileCategory, categorize};
use crate::config::AppConfig;
use crate::error::{ExtractionError, PipelineError, PipelineResult};
use crate::extraction::{PdfContentExtractor, read_image_metadata};
use crate::metadata::{FileEntry, MetadataExtractor};
use crate::package::{ResultPackage, assemble};

/// Runs classification, extraction, analysis and assembly for one batch
pub struct Pipeline<A> {
    config: AppConfig,
    extractor: Arc<MetadataExtractor>,
    analyzer: A,
}

impl<A: DocumentAnalyzer> Pipeline<A> {
    pub fn new(config: AppConfig, analyzer: A) -> Self {
        let extractor = MetadataExtractor::new(PdfContentExtractor::new(
            config.extraction.excerpt_chars,
        ));
        Self::with_extractor(config, extractor, analyzer)
    }

    pub fn with_extractor(config: AppConfig, extractor: MetadataExtractor, analyzer: A) -> Self {
        Self {
            config,
            extractor: Arc::new(extractor),
            analyzer,
        }
    }

    /// Process `paths` into a result package.
    ///
    /// Fails only when the input list is empty or a path does not exist;
    /// nothing is extracted in that case. Per-file problems are recorded in
    /// the package.
    pub async fn run(&self, paths: &[PathBuf]) -> PipelineResult<ResultPackage> {
        validate_inputs(paths)?;

        let categories = categorize(paths);
        let counts = categories.counts();
        info!(
            files = paths.len(),
            images = counts.images,
            documents = counts.documents,
            other = counts.other,
            "Categorized input files"
        );

        let entries = self.extract_all(paths).await;

        let document_result = if categories.has_analyzable() {
            let request = build_request(&entries, self.config.extraction.excerpt_chars);
            Some(analyze_or_placeholder(&self.analyzer, &request).await)
        } else {
            info!("No documents to analyze");
            None
        };

        let package = assemble(&self.config.package, categories, entries, document_result);
        info!(package_id = %package.package_id, "Result package assembled");

        Ok(package)
    }

    /// Extract every file on the blocking pool, keeping input order.
    async fn extract_all(&self, paths: &[PathBuf]) -> Vec<FileEntry> {
        let concurrency = self.config.extraction.max_concurrent_files.max(1);

        stream::iter(paths.iter().cloned())
            .map(|path| {
                let extractor = Arc::clone(&self.extractor);
                async move {
                    let task_path = path.clone();
                    match tokio::task::spawn_blocking(move || extract_one(&extractor, &task_path))
                        .await
                    {
                        Ok(entry) => entry,
                        Err(e) => {
                            warn!(path = %path.display(), error = %e, "Extraction task failed");
                            let error = ExtractionError::Task {
                                path: path.clone(),
                                message: e.to_string(),
                            };
                            FileEntry::failed(&path, &error)
                        }
                    }
                }
            })
            .buffered(concurrency)
            .collect()
            .await
    }
}

fn extract_one(extractor: &MetadataExtractor, path: &Path) -> FileEntry {
    let category = FileCategory::of(path);
    debug!(path = %path.display(), category = %category, "Extracting metadata");

    match extractor.extract(path) {
        Ok(mut record) => {
            if category == FileCategory::Image {
                record.image_metadata = Some(read_image_metadata(path));
            }
            FileEntry::Extracted(Box::new(record))
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not read file attributes");
            FileEntry::failed(path, &e)
        }
    }
}

/// Reject an empty input list or any path that does not exist.
pub fn validate_inputs(paths: &[PathBuf]) -> PipelineResult<()> {
    if paths.is_empty() {
        return Err(PipelineError::NoInputs);
    }

    let missing: Vec<PathBuf> = paths.iter().filter(|p| !p.exists()).cloned().collect();
    if !missing.is_empty() {
        return Err(PipelineError::MissingInputs { paths: missing });
    }

    Ok(())
}
