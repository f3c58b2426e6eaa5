//! Primary PDF backend built on PDFium.

use std::path::Path;

use pdfium_render::prelude::*;
use tracing::trace;

use crate::error::PdfError;

use super::{PageText, PdfBackend};

/// Reads page text and counts embedded image objects per page.
///
/// Any error while loading the document or reading a page aborts the whole
/// document so the next backend gets a chance.
pub struct PdfiumBackend;

impl PdfBackend for PdfiumBackend {
    fn name(&self) -> &'static str {
        "pdfium"
    }

    fn counts_images(&self) -> bool {
        true
    }

    fn read_pages(&self, path: &Path) -> Result<Vec<PageText>, PdfError> {
        let pdfium = create_pdfium()?;

        let document = pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| PdfError::Load {
                backend: "pdfium",
                message: format!("{:?}", e),
            })?;

        let mut pages = Vec::with_capacity(document.pages().len() as usize);
        for (page_index, page) in document.pages().iter().enumerate() {
            let page_num = page_index as u32 + 1;

            let text = page.text().map_err(|e| PdfError::Page {
                page: page_num,
                message: format!("{:?}", e),
            })?;

            let image_count = page
                .objects()
                .iter()
                .filter(|object| matches!(object, PdfPageObject::Image(_)))
                .count();

            let page_text = text.all();
            trace!(
                page = page_num,
                characters = page_text.len(),
                images = image_count,
                "Read PDF page"
            );

            pages.push(PageText {
                text: Some(page_text),
                image_count: Some(image_count),
            });
        }

        Ok(pages)
    }
}

/// Create a new Pdfium instance (dynamically linked).
///
/// Searches for libpdfium in:
/// 1. Current directory (./libpdfium.so)
/// 2. vendor/pdfium/lib/
/// 3. System library paths
pub fn create_pdfium() -> Result<Pdfium, PdfError> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                "./vendor/pdfium/lib/",
            ))
        })
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| PdfError::Library {
            message: format!("PDFium library not found: {:?}", e),
        })?;

    Ok(Pdfium::new(bindings))
}
