//! Rendering and writing the generated module.

use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use apiref_shared::{ApiRefError, Result, RouteCategory};

/// Render the category tree as a CommonJS module.
///
/// The JSON is 2-space indented; the module text has no trailing newline.
pub fn render_module(categories: &[RouteCategory]) -> Result<String> {
    let data = serde_json::to_string_pretty(categories)
        .map_err(|e| ApiRefError::Serialization(e.to_string()))?;
    Ok(format!("module.exports = {{ endpoints: {data} }};"))
}

/// Hex SHA-256 of `content`.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Write `content` to `path` via a temp file and rename, so readers never
/// see a half-written module.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| ApiRefError::validation(format!("{} has no file name", path.display())))?;
    let temp = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

    std::fs::write(&temp, content).map_err(|e| ApiRefError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| ApiRefError::io(path, e))?;

    debug!(path = %path.display(), size = content.len(), "wrote module");
    Ok(())
}

/// Read the previously generated module, if any.
pub fn read_existing(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ApiRefError::io(path, e)),
    }
}
