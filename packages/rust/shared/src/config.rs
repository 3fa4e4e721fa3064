//! Build configuration for apiref.
//!
//! Project config lives at `./apiref.toml`. Every key is optional; a missing
//! file means all defaults, which reproduce the historical build layout
//! (`src/data/endpoints` in, `src/data/endpoints/api.js` out).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ApiRefError, Result};

/// Default configuration file name, resolved against the working directory.
pub const CONFIG_FILE_NAME: &str = "apiref.toml";

// ---------------------------------------------------------------------------
// Config structs (matching apiref.toml schema)
// ---------------------------------------------------------------------------

/// Top-level build config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Input locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Generated artifact settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[paths]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Root of the documentation data tree.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Endpoint JSON directory, relative to `data_dir`.
    #[serde(default = "default_endpoints_dir")]
    pub endpoints_dir: PathBuf,

    /// Object catalog (directory of JSON files or one JSON file), relative to `data_dir`.
    #[serde(default = "default_objects_dir")]
    pub objects_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            endpoints_dir: default_endpoints_dir(),
            objects_dir: default_objects_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("src/data")
}
fn default_endpoints_dir() -> PathBuf {
    PathBuf::from("endpoints")
}
fn default_objects_dir() -> PathBuf {
    PathBuf::from("objects")
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// File written inside the endpoints directory.
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Prefix for every generated `routePath`.
    #[serde(default = "default_route_base_path")]
    pub route_base_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
            route_base_path: default_route_base_path(),
        }
    }
}

fn default_file_name() -> String {
    "api.js".into()
}
fn default_route_base_path() -> String {
    "/reference".into()
}

impl AppConfig {
    /// Directory holding the endpoint `*.json` files.
    pub fn endpoints_path(&self) -> PathBuf {
        self.paths.data_dir.join(&self.paths.endpoints_dir)
    }

    /// Location of the object catalog.
    pub fn objects_path(&self) -> PathBuf {
        self.paths.data_dir.join(&self.paths.objects_dir)
    }

    /// Full path of the generated module.
    pub fn output_path(&self) -> PathBuf {
        self.endpoints_path().join(&self.output.file_name)
    }

    /// Reject values that would produce a broken build.
    pub fn validate(&self) -> Result<()> {
        let name = &self.output.file_name;
        if name.is_empty() || name.contains('/') || name.contains('\\') {
            return Err(ApiRefError::config(format!(
                "output.file_name must be a bare file name, got {name:?}"
            )));
        }
        if name.ends_with(".json") {
            // The endpoints directory is scanned for *.json; the artifact would feed itself.
            return Err(ApiRefError::config(format!(
                "output.file_name {name:?} would be read back as an endpoint file"
            )));
        }
        if !self.output.route_base_path.starts_with('/') {
            return Err(ApiRefError::config(format!(
                "output.route_base_path must start with '/', got {:?}",
                self.output.route_base_path
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load `./apiref.toml`. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = Path::new(CONFIG_FILE_NAME);

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(path)
}

/// Load the build config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ApiRefError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        ApiRefError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}

/// Write a default config file to `path`. Refuses to overwrite an existing file.
pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(ApiRefError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| ApiRefError::config(e.to_string()))?;
    std::fs::write(path, content).map_err(|e| ApiRefError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(())
}
