//! The object catalog: reusable resource schemas keyed by name.

use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, info, instrument};

use apiref_shared::{ApiRefError, ResourceObject, Result};

use crate::input::{list_json_files, read_json};

/// Read-only map from resource name (`linode`, `domain`, ...) to its definition.
#[derive(Debug, Clone, Default)]
pub struct ObjectCatalog {
    objects: IndexMap<String, ResourceObject>,
}

impl ObjectCatalog {
    pub fn new(objects: IndexMap<String, ResourceObject>) -> Self {
        Self { objects }
    }

    /// Load the catalog from `path`.
    ///
    /// A directory is read as one object per `*.json` file, keyed by file
    /// stem. A single file must hold the whole name → object map.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let objects = if path.is_dir() {
            let mut objects = IndexMap::new();
            for file in list_json_files(path)? {
                let Some(stem) = file.file_stem().map(|s| s.to_string_lossy().into_owned())
                else {
                    continue;
                };
                let object: ResourceObject = read_json(&file)?;
                debug!(name = %stem, "loaded catalog object");
                objects.insert(stem, object);
            }
            objects
        } else if path.is_file() {
            read_json::<IndexMap<String, ResourceObject>>(path)?
        } else {
            return Err(ApiRefError::config(format!(
                "object catalog not found at {}",
                path.display()
            )));
        };

        info!(objects = objects.len(), "object catalog loaded");
        Ok(Self::new(objects))
    }

    /// Exact-name lookup.
    pub fn get(&self, name: &str) -> Option<&ResourceObject> {
        self.objects.get(name)
    }

    /// Whether `name` is exactly a catalog key.
    pub fn contains(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    /// Look up a resource by name, retrying without a trailing `s` so plural
    /// endpoint resources (`tickets`) find singular objects (`ticket`).
    ///
    /// Returns the key that matched along with the object.
    pub fn lookup(&self, resource: &str) -> Option<(&str, &ResourceObject)> {
        if let Some((key, object)) = self.objects.get_key_value(resource) {
            return Some((key.as_str(), object));
        }
        let singular = resource.strip_suffix('s')?;
        self.objects
            .get_key_value(singular)
            .map(|(key, object)| (key.as_str(), object))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl FromIterator<(String, ResourceObject)> for ObjectCatalog {
    fn from_iter<I: IntoIterator<Item = (String, ResourceObject)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
