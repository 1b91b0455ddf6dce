//! Project manifest export.

use std::path::Path;

use p2f_core::project::Project;

use crate::LibraryError;

/// File name used when the caller does not pick one.
pub const DEFAULT_MANIFEST_NAME: &str = "prompt2film-project.json";

/// Write `projects` as a pretty-printed JSON array to `path`.
pub fn write_manifest(projects: &[Project], path: &Path) -> Result<(), LibraryError> {
    let json = serde_json::to_string_pretty(projects)?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), count = projects.len(), "Exported project manifest");
    Ok(())
}
