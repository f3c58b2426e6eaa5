//! Fallback PDF backend built on Poppler.

use std::path::Path;

use poppler::Document as PopplerDocument;
use tracing::debug;

use crate::error::PdfError;

use super::{PageText, PdfBackend};

/// Reads page text only. Pages whose text cannot be read are kept as
/// unreadable entries rather than failing the document.
pub struct PopplerBackend;

impl PdfBackend for PopplerBackend {
    fn name(&self) -> &'static str {
        "poppler"
    }

    fn read_pages(&self, path: &Path) -> Result<Vec<PageText>, PdfError> {
        let uri = file_uri(path)?;
        let doc = PopplerDocument::from_file(&uri, None).map_err(|e| PdfError::Load {
            backend: "poppler",
            message: e.to_string(),
        })?;

        let n_pages = doc.n_pages();
        let mut pages = Vec::with_capacity(n_pages.max(0) as usize);

        for page_num in 0..n_pages {
            let text = doc
                .page(page_num)
                .and_then(|page| page.text())
                .map(|text| text.to_string());

            if text.is_none() {
                debug!(page = page_num + 1, "Skipping page with unreadable text");
            }

            pages.push(PageText {
                text,
                image_count: None,
            });
        }

        Ok(pages)
    }
}

/// Percent-encoded `file://` URI of the canonical path
fn file_uri(path: &Path) -> Result<String, PdfError> {
    let load_error = |message: String| PdfError::Load {
        backend: "poppler",
        message,
    };

    let canonical_path = path.canonicalize().map_err(|e| load_error(e.to_string()))?;
    glib::filename_to_uri(&canonical_path, None)
        .map(|uri| uri.to_string())
        .map_err(|e| load_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_uri_escapes_reserved_characters() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report #1 100%.pdf");
        std::fs::write(&path, b"%PDF").unwrap();

        let uri = file_uri(&path).unwrap();
        assert!(uri.starts_with("file:///"));
        assert!(uri.ends_with("report%20%231%20100%25.pdf"));
    }

    #[test]
    fn test_uri_of_missing_file_is_load_error() {
        let result = file_uri(Path::new("/nonexistent/scan.pdf"));
        assert!(matches!(result, Err(PdfError::Load { backend: "poppler", .. })));
    }
}
