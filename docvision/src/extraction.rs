//! Content extraction for PDF documents and images.
//!
//! - PDF text and image statistics with a primary/fallback backend chain
//! - Image header metadata (dimensions, format, color mode, transparency)

pub mod image;
pub mod pdf;
pub mod text;

pub use self::image::{ImageMetadata, read_image_metadata};
pub use self::pdf::{ExtractionMethod, PdfAnalysis, PdfContentExtractor};
