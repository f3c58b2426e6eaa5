//! Assembly of the terminal result package.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use strum::Display;
use uuid::Uuid;

use crate::classify::{CategoryCounts, CategorySet};
use crate::config::PackageConfig;
use crate::metadata::FileEntry;

pub const PROCESSING_METHOD: &str = "dual_agent_system";
pub const DOCUMENT_AGENT_LABEL: &str = "Document Processing Agent";
pub const IMAGE_AGENT_LABEL: &str = "Basic Image Processing";
pub const NO_DOCUMENTS_RESULT: &str = "No documents processed";
pub const NO_IMAGES_RESULT: &str = "No images processed";
pub const IMAGE_BASIC_RESULT: &str = "Image processing completed with basic metadata extraction only";

/// Terminal state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackageStatus {
    Completed,
}

/// Everything one run produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultPackage {
    pub package_id: String,
    pub created_at: DateTime<Utc>,
    pub processing_method: String,
    pub total_files: usize,
    pub category_counts: CategoryCounts,
    pub category_sets: CategorySet,
    pub file_records: Vec<FileEntry>,
    pub document_analysis_result: String,
    pub image_analysis_result: String,
    pub agents_used: Vec<String>,
    pub status: PackageStatus,
}

/// Build the result package for a finished run.
///
/// `document_result` is `None` when document analysis was not attempted.
/// Counts come from `categories` alone, never from `entries`.
pub fn assemble(
    config: &PackageConfig,
    categories: CategorySet,
    entries: Vec<FileEntry>,
    document_result: Option<String>,
) -> ResultPackage {
    assemble_at(config, categories, entries, document_result, Local::now())
}

pub(crate) fn assemble_at(
    config: &PackageConfig,
    categories: CategorySet,
    entries: Vec<FileEntry>,
    document_result: Option<String>,
    now: DateTime<Local>,
) -> ResultPackage {
    let mut agents_used = Vec::new();
    if document_result.is_some() {
        agents_used.push(DOCUMENT_AGENT_LABEL.to_string());
    }

    let image_analysis_result = if categories.images.is_empty() {
        NO_IMAGES_RESULT.to_string()
    } else {
        agents_used.push(IMAGE_AGENT_LABEL.to_string());
        IMAGE_BASIC_RESULT.to_string()
    };

    ResultPackage {
        package_id: package_id(&config.id_prefix, now, config.unique_suffix),
        created_at: now.with_timezone(&Utc),
        processing_method: PROCESSING_METHOD.to_string(),
        total_files: categories.total(),
        category_counts: categories.counts(),
        category_sets: categories,
        file_records: entries,
        document_analysis_result: document_result
            .unwrap_or_else(|| NO_DOCUMENTS_RESULT.to_string()),
        image_analysis_result,
        agents_used,
        status: PackageStatus::Completed,
    }
}

fn package_id(prefix: &str, now: DateTime<Local>, unique_suffix: bool) -> String {
    let id = format!("{}_{}", prefix, now.format("%Y%m%d_%H%M%S"));
    if unique_suffix {
        let suffix = Uuid::new_v4().simple().to_string();
        format!("{}_{}", id, &suffix[..8])
    } else {
        id
    }
}
