//! Page-level and document-level statistics built from backend output.

use serde::Serialize;

use crate::extraction::text::{char_count, excerpt, word_count};

/// Raw output of a backend for a single page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// `None` when the backend could not read this page's text
    pub text: Option<String>,
    /// `None` when the backend does not enumerate images
    pub image_count: Option<usize>,
}

/// Per-page statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageDetail {
    /// 1-based
    pub page_number: usize,
    pub text_length: usize,
    pub has_text: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_count: Option<usize>,
}

/// Document-level statistics of a successfully read PDF
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdfSummary {
    pub total_pages: usize,
    pub has_text: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_images: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_images: Option<usize>,
    pub character_count: usize,
    pub word_count: usize,
    pub text_excerpt: String,
    pub page_details: Vec<PageDetail>,
}

/// Aggregate backend pages into a [`PdfSummary`].
///
/// The full text is the readable page texts joined with `\n`; unreadable
/// pages contribute nothing to it but still get a [`PageDetail`]. Image
/// statistics are reported only when `counts_images` is set, i.e. the backend
/// enumerates embedded images.
pub fn summarize(pages: &[PageText], excerpt_chars: usize, counts_images: bool) -> PdfSummary {
    let page_details: Vec<PageDetail> = pages
        .iter()
        .enumerate()
        .map(|(index, page)| {
            let text = page.text.as_deref().unwrap_or("");
            PageDetail {
                page_number: index + 1,
                text_length: char_count(text),
                has_text: !text.trim().is_empty(),
                image_count: page.image_count.filter(|_| counts_images),
            }
        })
        .collect();

    let full_text = pages
        .iter()
        .filter_map(|page| page.text.as_deref())
        .collect::<Vec<_>>()
        .join("\n");

    let total_images =
        counts_images.then(|| pages.iter().filter_map(|page| page.image_count).sum::<usize>());

    PdfSummary {
        total_pages: pages.len(),
        has_text: !full_text.trim().is_empty(),
        has_images: total_images.map(|count| count > 0),
        total_images,
        character_count: char_count(&full_text),
        word_count: word_count(&full_text),
        text_excerpt: excerpt(&full_text, excerpt_chars),
        page_details,
    }
}
