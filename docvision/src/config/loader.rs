//! Configuration loading from files and environment variables.

use std::path::Path;

use config::{Config, Environment, File};

use crate::error::{PipelineError, PipelineResult};

use super::AppConfig;

/// Load configuration from `docvision.*` in the working directory, an optional
/// extra file, and `DOCVISION__*` environment variables, in that order of
/// increasing precedence.
pub fn load_config(extra_file: Option<&Path>) -> PipelineResult<AppConfig> {
    let mut builder = Config::builder().add_source(File::with_name("docvision").required(false));

    if let Some(path) = extra_file {
        builder = builder.add_source(File::from(path).required(true));
    }

    builder
        .add_source(
            Environment::with_prefix("DOCVISION")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| PipelineError::Config {
            message: format!("Failed to build config: {}", e),
        })?
        .try_deserialize()
        .map_err(|e| PipelineError::Config {
            message: format!("Failed to deserialize config: {}", e),
        })
}
