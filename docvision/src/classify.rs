//! Extension-based file classification.

use std::path::{Path, PathBuf};

use serde::Serialize;
use strum::Display;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tiff"];
const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt", "xlsx", "xls", "pptx"];

/// Processing category of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    Image,
    Document,
    Other,
}

impl FileCategory {
    /// Classify a path by its extension. Never touches the filesystem.
    pub fn of(path: &Path) -> Self {
        match lowercase_extension(path).as_deref() {
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => FileCategory::Image,
            Some(ext) if DOCUMENT_EXTENSIONS.contains(&ext) => FileCategory::Document,
            _ => FileCategory::Other,
        }
    }
}

/// Partition of the input paths into three disjoint, order-preserving lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategorySet {
    pub images: Vec<PathBuf>,
    pub documents: Vec<PathBuf>,
    pub other: Vec<PathBuf>,
}

/// Number of paths in each category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub images: usize,
    pub documents: usize,
    pub other: usize,
}

impl CategorySet {
    pub fn counts(&self) -> CategoryCounts {
        CategoryCounts {
            images: self.images.len(),
            documents: self.documents.len(),
            other: self.other.len(),
        }
    }

    pub fn total(&self) -> usize {
        self.images.len() + self.documents.len() + self.other.len()
    }

    /// Whether any path goes to document analysis (documents or other files)
    pub fn has_analyzable(&self) -> bool {
        !self.documents.is_empty() || !self.other.is_empty()
    }
}

/// Split paths into image, document and other lists.
///
/// Each path lands in exactly one list, in input order. Duplicate paths are
/// kept as given so that the total always matches the input length.
pub fn categorize(paths: &[PathBuf]) -> CategorySet {
    let mut set = CategorySet::default();
    for path in paths {
        match FileCategory::of(path) {
            FileCategory::Image => set.images.push(path.clone()),
            FileCategory::Document => set.documents.push(path.clone()),
            FileCategory::Other => set.other.push(path.clone()),
        }
    }
    set
}

/// Human-readable type label for a file extension (with or without the dot)
pub fn file_type_label(extension: &str) -> &'static str {
    match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "pdf" => "PDF Document",
        "doc" | "docx" => "Word Document",
        "txt" => "Text File",
        "xlsx" | "xls" => "Excel Spreadsheet",
        "pptx" => "PowerPoint Presentation",
        "jpg" | "jpeg" | "png" | "gif" | "bmp" | "tiff" => "Image",
        _ => "Unknown",
    }
}

pub(crate) fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_categorize_counts() {
        let input = paths(&[
            "scan.JPG",
            "report.pdf",
            "notes.txt",
            "logo.png",
            "deck.pptx",
            "archive.zip",
        ]);
        let set = categorize(&input);

        let counts = set.counts();
        assert_eq!(counts.images, 2);
        assert_eq!(counts.documents, 3);
        assert_eq!(counts.other, 1);
        assert_eq!(set.total(), input.len());
    }

    #[test]
    fn test_categorize_is_a_partition() {
        let input = paths(&[
            "a.tiff", "b", "c.DOCX", "d.md", ".hidden", "e.jpeg", "f.xls", "dir/g.gif",
        ]);
        let set = categorize(&input);

        assert_eq!(set.total(), input.len());
        for path in &input {
            let hits = [&set.images, &set.documents, &set.other]
                .iter()
                .filter(|list| list.contains(path))
                .count();
            assert_eq!(hits, 1, "{} should be in exactly one list", path.display());
        }
    }

    #[test]
    fn test_categorize_preserves_input_order() {
        let input = paths(&["z.png", "a.pdf", "m.gif", "b.txt", "a.png"]);
        let set = categorize(&input);

        assert_eq!(set.images, paths(&["z.png", "m.gif", "a.png"]));
        assert_eq!(set.documents, paths(&["a.pdf", "b.txt"]));
        assert!(set.other.is_empty());
        assert!(set.has_analyzable());
    }

    #[test]
    fn test_images_only_has_nothing_to_analyze() {
        let set = categorize(&paths(&["a.png", "b.gif"]));
        assert!(!set.has_analyzable());
        assert!(categorize(&paths(&["c.png", "d.csv"])).has_analyzable());
    }

    #[test]
    fn test_extensionless_and_unknown_are_other() {
        assert_eq!(FileCategory::of(Path::new("Makefile")), FileCategory::Other);
        assert_eq!(FileCategory::of(Path::new("photo.webp")), FileCategory::Other);
        assert_eq!(FileCategory::of(Path::new("photo.Jpeg")), FileCategory::Image);
    }

    #[test]
    fn test_file_type_label() {
        assert_eq!(file_type_label(".PDF"), "PDF Document");
        assert_eq!(file_type_label("docx"), "Word Document");
        assert_eq!(file_type_label(".xls"), "Excel Spreadsheet");
        assert_eq!(file_type_label(".tiff"), "Image");
        assert_eq!(file_type_label(""), "Unknown");
        assert_eq!(file_type_label(".zip"), "Unknown");
    }

    #[test]
    fn test_category_display() {
        assert_eq!(FileCategory::Document.to_string(), "document");
        assert_eq!(FileCategory::Other.to_string(), "other");
    }
}
