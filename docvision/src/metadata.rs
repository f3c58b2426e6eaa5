//! Per-file metadata records.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::classify::{file_type_label, lowercase_extension};
use crate::error::{ExtractionError, format_error_chain};
use crate::extraction::{ImageMetadata, PdfAnalysis, PdfContentExtractor};

/// Filesystem metadata and extracted content for one input file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileRecord {
    pub file_name: String,
    pub file_path: PathBuf,
    pub file_size: u64,
    /// Extension as written, including the leading dot; empty when absent
    pub extension: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub file_type_label: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_analysis: Option<PdfAnalysis>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_metadata: Option<ImageMetadata>,
}

/// Entry for a file whose filesystem attributes could not be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFile {
    pub file_name: String,
    pub file_path: PathBuf,
    pub error: String,
}

/// One element of the package's `file_records`, aligned with the input order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FileEntry {
    Extracted(Box<FileRecord>),
    Failed(FailedFile),
}

impl FileEntry {
    pub fn failed(path: &Path, error: &(dyn std::error::Error + 'static)) -> Self {
        FileEntry::Failed(FailedFile {
            file_name: file_name_of(path),
            file_path: path.to_path_buf(),
            error: format!("Failed to extract metadata: {}", format_error_chain(error)),
        })
    }

    pub fn path(&self) -> &Path {
        match self {
            FileEntry::Extracted(record) => &record.file_path,
            FileEntry::Failed(failed) => &failed.file_path,
        }
    }

    pub fn record(&self) -> Option<&FileRecord> {
        match self {
            FileEntry::Extracted(record) => Some(record.as_ref()),
            FileEntry::Failed(_) => None,
        }
    }
}

/// Builds [`FileRecord`]s, delegating PDF content to a [`PdfContentExtractor`]
pub struct MetadataExtractor {
    pdf: PdfContentExtractor,
}

impl MetadataExtractor {
    pub fn new(pdf: PdfContentExtractor) -> Self {
        Self { pdf }
    }

    /// Read filesystem attributes of `path` and, for PDFs, analyse content.
    ///
    /// Only unreadable filesystem attributes are errors. PDF parsing problems
    /// end up inside the record's [`PdfAnalysis`].
    pub fn extract(&self, path: &Path) -> Result<FileRecord, ExtractionError> {
        let stat_error = |source| ExtractionError::Stat {
            path: path.to_path_buf(),
            source,
        };

        let attributes = std::fs::metadata(path).map_err(stat_error)?;
        let modified = attributes.modified().map_err(stat_error)?;
        let created = attributes.created().unwrap_or_else(|e| {
            debug!(path = %path.display(), error = %e, "Birth time unavailable, using modification time");
            modified
        });

        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let pdf_analysis = match lowercase_extension(path).as_deref() {
            Some("pdf") => Some(self.pdf.extract(path)),
            _ => None,
        };

        Ok(FileRecord {
            file_name: file_name_of(path),
            file_path: path.to_path_buf(),
            file_size: attributes.len(),
            file_type_label: file_type_label(&extension).to_string(),
            extension,
            created_at: to_utc(created),
            modified_at: to_utc(modified),
            pdf_analysis,
            image_metadata: None,
        })
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn to_utc(time: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(time)
}
