//! Reading the JSON inputs under the data directory.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::debug;

use apiref_shared::{ApiRefError, Result};

/// List the `*.json` files directly inside `dir`, sorted by file name.
///
/// Sorting keeps the output identical across platforms whose directory
/// iteration order differs.
pub fn list_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| ApiRefError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ApiRefError::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();

    debug!(dir = %dir.display(), count = files.len(), "listed JSON inputs");
    Ok(files)
}

/// Read and deserialize one JSON file. Any failure names the file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| ApiRefError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| ApiRefError::parse(path, e.to_string()))
}

/// File name for log messages and error locators.
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("apiref-input-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn lists_only_json_sorted() {
        let tmp = temp_dir();
        std::fs::write(tmp.join("regions.json"), "{}").unwrap();
        std::fs::write(tmp.join("account.json"), "{}").unwrap();
        std::fs::write(tmp.join("api.js"), "").unwrap();
        std::fs::create_dir_all(tmp.join("nested.json")).unwrap();

        let files = list_json_files(&tmp).unwrap();
        let names: Vec<String> = files.iter().map(|p| display_name(p)).collect();
        assert_eq!(names, ["account.json", "regions.json"]);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_dir_is_io_error() {
        let tmp = temp_dir().join("does-not-exist");
        let err = list_json_files(&tmp).unwrap_err();
        assert!(matches!(err, ApiRefError::Io { .. }));
    }

    #[test]
    fn unparsable_json_names_file() {
        let tmp = temp_dir();
        let path = tmp.join("broken.json");
        std::fs::write(&path, "{ \"base_path\": ").unwrap();

        let err = read_json::<serde_json::Value>(&path).unwrap_err();
        match err {
            ApiRefError::Parse { path: p, .. } => assert!(p.ends_with("broken.json")),
            other => panic!("expected parse error, got {other:?}"),
        }

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
