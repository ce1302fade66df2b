//! Component manifest loading
//!
//! The registry reads the list of development components produced by the NWDI
//! build from a YAML or JSON manifest:
//!
//! ```yaml
//! components:
//!   - vendor: example.org
//!     name: example/app/core
//!     type: java
//!     source_folders: [src/packages]
//! ```

use super::{ComponentFilter, DevelopmentComponent};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to read component manifest {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse component manifest {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Component {0} is declared more than once")]
    Duplicate(String),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Manifest {
    #[serde(default)]
    components: Vec<DevelopmentComponent>,
}

/// Ordered, read-only collection of the components known to a build.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    components: Vec<DevelopmentComponent>,
}

impl ComponentRegistry {
    pub fn new(components: Vec<DevelopmentComponent>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for component in &components {
            let key = component.coordinates();
            if !seen.insert(key.clone()) {
                return Err(RegistryError::Duplicate(key));
            }
        }
        Ok(Self { components })
    }

    /// Loads a manifest, choosing the parser by file extension (`.json`, else YAML).
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let content = fs::read_to_string(path).map_err(|source| RegistryError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let manifest: Manifest = if is_json {
            serde_json::from_str(&content).map_err(|e| RegistryError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        } else {
            serde_yaml::from_str(&content).map_err(|e| RegistryError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };

        debug!(
            path = %path.display(),
            components = manifest.components.len(),
            "Loaded component manifest"
        );

        Self::new(manifest.components)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn all(&self) -> &[DevelopmentComponent] {
        &self.components
    }

    /// Looks a component up by `vendor:name`.
    pub fn find(&self, coordinates: &str) -> Option<&DevelopmentComponent> {
        self.components
            .iter()
            .find(|component| component.coordinates() == coordinates)
    }

    /// Components affected by the current build that pass `filter`, in manifest order.
    pub fn affected_components(&self, filter: &dyn ComponentFilter) -> Vec<&DevelopmentComponent> {
        self.components
            .iter()
            .filter(|component| component.needs_rebuild && filter.accept(component))
            .collect()
    }
}
