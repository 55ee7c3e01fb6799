//! Model discovery
//!
//! Walks `<root>/models` for SQL files and registers one [`Model`] per file.
//! Only existence checks are performed; no file contents are read here.

use dimlint_core::Model;
use std::collections::BTreeMap;
use std::path::Path;
use walkdir::WalkDir;

/// File extension of transform files
pub const SQL_EXTENSION: &str = "sql";

/// Catalog of registered models keyed by identifier
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    models: BTreeMap<String, Model>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model, returning the model it replaced if the name was already taken
    pub fn insert(&mut self, model: Model) -> Option<Model> {
        self.models.insert(model.name.clone(), model)
    }

    pub fn get(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Model> {
        self.models.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Models in name order
    pub fn iter(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    /// Model names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.models.keys().cloned().collect()
    }
}

/// Discovers models on disk
pub struct ModelRegistry;

impl ModelRegistry {
    /// Build a catalog from every SQL file under `<project_root>/models`
    ///
    /// A missing `models` directory yields an empty catalog. Any other
    /// traversal failure aborts discovery.
    pub fn discover(project_root: &Path, descriptor_file: &str) -> Result<Catalog, RegistryError> {
        let models_dir = project_root.join("models");
        let mut catalog = Catalog::new();

        if !models_dir.exists() {
            tracing::debug!(path = %models_dir.display(), "models directory not found");
            return Ok(catalog);
        }

        for entry in WalkDir::new(&models_dir).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| models_dir.display().to_string());
                RegistryError::WalkError(path, e.to_string())
            })?;

            // follows symlinks
            if !entry.path().is_file() {
                continue;
            }

            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != SQL_EXTENSION) {
                continue;
            }

            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                tracing::warn!(path = %path.display(), "skipping model with non UTF-8 name");
                continue;
            };

            let yaml_path = path
                .parent()
                .map(|dir| dir.join(descriptor_file))
                .filter(|candidate| candidate.exists());

            let model = Model::new(name, path, yaml_path);
            tracing::debug!(model = %model.name, role = %model.role, "registered model");

            if let Some(previous) = catalog.insert(model) {
                tracing::warn!(
                    model = %previous.name,
                    replaced = %previous.sql_path.display(),
                    "duplicate model name, keeping the later file"
                );
            }
        }

        Ok(catalog)
    }
}

/// Discovery errors
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Failed to walk models directory at {0}: {1}")]
    WalkError(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use dimlint_core::ModelRole;
    use std::fs;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn discovers_nested_models() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "models/marts/fct_sales.sql", "select 1");
        write(dir.path(), "models/marts/dim_products.sql", "select 1");
        write(dir.path(), "models/marts/schema.yml", "models: []");
        write(dir.path(), "models/staging/stg_sales.sql", "select 1");
        write(dir.path(), "models/staging/README.md", "not a model");
        write(dir.path(), "models/misc.sql", "select 1");

        let catalog = ModelRegistry::discover(dir.path(), "schema.yml").unwrap();

        assert_eq!(catalog.names(), vec!["dim_products", "fct_sales", "misc", "stg_sales"]);

        let fct = catalog.get("fct_sales").unwrap();
        assert_eq!(fct.role, ModelRole::Fact);
        assert_eq!(fct.yaml_path.as_deref(), Some(dir.path().join("models/marts/schema.yml").as_path()));
        assert!(fct.columns.is_none());
        assert!(fct.references.is_none());

        let stg = catalog.get("stg_sales").unwrap();
        assert_eq!(stg.role, ModelRole::Staging);
        assert!(stg.yaml_path.is_none());

        assert_eq!(catalog.get("misc").unwrap().role, ModelRole::Other);
    }

    #[test]
    fn descriptor_must_be_in_same_directory() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "models/schema.yml", "models: []");
        write(dir.path(), "models/marts/dim_dates.sql", "select 1");

        let catalog = ModelRegistry::discover(dir.path(), "schema.yml").unwrap();
        assert!(catalog.get("dim_dates").unwrap().yaml_path.is_none());
    }

    #[test]
    fn custom_descriptor_name() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "models/dim_dates.sql", "select 1");
        write(dir.path(), "models/_models.yml", "models: []");

        let catalog = ModelRegistry::discover(dir.path(), "_models.yml").unwrap();
        assert!(catalog.get("dim_dates").unwrap().yaml_path.is_some());
    }

    #[test]
    fn missing_models_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = ModelRegistry::discover(dir.path(), "schema.yml").unwrap();
        assert!(catalog.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_model_is_registered() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "shared/dim_regions.sql", "select 1");
        write(dir.path(), "models/marts/schema.yml", "models: []");
        std::os::unix::fs::symlink(
            dir.path().join("shared/dim_regions.sql"),
            dir.path().join("models/marts/dim_regions.sql"),
        )
        .unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("shared/missing.sql"),
            dir.path().join("models/marts/dim_dangling.sql"),
        )
        .unwrap();

        let catalog = ModelRegistry::discover(dir.path(), "schema.yml").unwrap();

        assert_eq!(catalog.names(), vec!["dim_regions"]);
        assert!(catalog.get("dim_regions").unwrap().yaml_path.is_some());
    }
}
