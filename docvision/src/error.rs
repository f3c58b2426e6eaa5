use std::path::PathBuf;

use thiserror::Error;

/// Top-level pipeline error.
///
/// Only these failures stop a run. Everything that goes wrong for a single
/// file is folded into that file's entry in the result package instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("The following files do not exist: {}", format_paths(paths))]
    MissingInputs { paths: Vec<PathBuf> },

    #[error("No input files given")]
    NoInputs,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to write results to {path}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize result package")]
    Serialization(#[source] serde_json::Error),
}

/// Filesystem attribute errors raised while building a file record
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Failed to read attributes of {path}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Extraction task for {path} did not complete: {message}")]
    Task { path: PathBuf, message: String },
}

/// PDF backend errors
#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Failed to load PDF library: {message}")]
    Library { message: String },

    #[error("Failed to load PDF with {backend}: {message}")]
    Load {
        backend: &'static str,
        message: String,
    },

    #[error("Failed to extract text from page {page}: {message}")]
    Page { page: u32, message: String },
}

/// Image decoding errors
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to open image")]
    Open(#[source] std::io::Error),

    #[error("Failed to decode image")]
    Decode(#[source] image::ImageError),

    #[error("Failed to read PNG header")]
    PngHeader(#[source] png::DecodingError),

    #[error("Failed to read GIF header")]
    GifHeader(#[source] gif::DecodingError),

    #[error("Unrecognized image format")]
    UnknownFormat,
}

/// Analysis collaborator errors
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Document analysis is disabled")]
    Disabled,

    #[error("Connection failed to Ollama at {url}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Model not found: {model}")]
    ModelNotFound { model: String },

    #[error("Generation failed (status {status}): {message}")]
    Generation { status: u16, message: String },

    #[error("Invalid response from Ollama")]
    InvalidResponse {
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to encode analysis request")]
    Encode(#[source] serde_json::Error),
}

/// Result type alias for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render an error and its source chain as a single line.
///
/// Used wherever an error is stored as a string inside the result package.
pub fn format_error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_inputs_lists_every_path() {
        let err = PipelineError::MissingInputs {
            paths: vec![PathBuf::from("a.pdf"), PathBuf::from("b/c.png")],
        };
        assert_eq!(
            err.to_string(),
            "The following files do not exist: a.pdf, b/c.png"
        );
    }

    #[test]
    fn test_format_error_chain() {
        let err = ExtractionError::Stat {
            path: PathBuf::from("gone.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(
            format_error_chain(&err),
            "Failed to read attributes of gone.txt: no such file"
        );
    }
}
