//! Persistence of the result package.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{PipelineError, PipelineResult};
use crate::package::ResultPackage;

/// Write `package` as pretty-printed JSON to `path`.
///
/// The JSON goes to a temp file in the destination directory which is then
/// renamed over `path`, so readers never see a partial file.
pub fn write_package(package: &ResultPackage, path: &Path) -> PipelineResult<()> {
    let json = serde_json::to_vec_pretty(package).map_err(PipelineError::Serialization)?;

    let persistence_error = |source| PipelineError::Persistence {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(persistence_error)?;

    let mut file = NamedTempFile::new_in(parent).map_err(persistence_error)?;
    file.write_all(&json).map_err(persistence_error)?;
    file.flush().map_err(persistence_error)?;
    file.as_file().sync_all().map_err(persistence_error)?;
    file.persist(path).map_err(|e| persistence_error(e.error))?;

    info!(path = %path.display(), bytes = json.len(), "Result package written");
    Ok(())
}
