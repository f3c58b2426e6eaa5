//! Process-wide configuration.
//!
//! Built once in `main` and handed to each component. Nothing here is global.

mod loader;

pub use loader::load_config;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ollama: OllamaConfig,

    #[serde(default)]
    pub extraction: ExtractionConfig,

    #[serde(default)]
    pub package: PackageConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Ollama LLM configuration for the document analysis step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// When false, analysis is skipped and the placeholder result is recorded
    #[serde(default = "default_ollama_enabled")]
    pub enabled: bool,
}

impl OllamaConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_url(),
            model: default_model(),
            temperature: default_temperature(),
            request_timeout_secs: default_request_timeout_secs(),
            enabled: default_ollama_enabled(),
        }
    }
}

/// Content extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Maximum characters kept in a text excerpt before the continuation marker
    #[serde(default = "default_excerpt_chars")]
    pub excerpt_chars: usize,

    /// Upper bound on files extracted at the same time
    #[serde(default = "default_max_concurrent_files")]
    pub max_concurrent_files: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            excerpt_chars: default_excerpt_chars(),
            max_concurrent_files: default_max_concurrent_files(),
        }
    }
}

/// Result package configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageConfig {
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,

    /// Append a random suffix to the package id so that runs started within
    /// the same second still get distinct ids.
    #[serde(default)]
    pub unique_suffix: bool,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            id_prefix: default_id_prefix(),
            unique_suffix: false,
        }
    }
}

/// Output artifact configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

// ==================== Default Value Functions ====================

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3.2".to_string()
}

fn default_temperature() -> f32 {
    0.0
}

fn default_request_timeout_secs() -> u64 {
    300
}

fn default_ollama_enabled() -> bool {
    true
}

pub(crate) fn default_excerpt_chars() -> usize {
    2000
}

fn default_max_concurrent_files() -> usize {
    4
}

fn default_id_prefix() -> String {
    "DUAL_AGENT_PACKAGE".to_string()
}

fn default_output_path() -> PathBuf {
    PathBuf::from("output").join("analysis_results.json")
}
