//! Catalog loading with builder pattern and fallback chains.
//!
//! A catalog listing is either one file holding every module
//! (`{"modules": [...]}`) or a directory with one module per file. JSON and
//! YAML are both accepted, picked by file extension.
//!
//! # Loading patterns
//!
//! ```no_run
//! use modopts_catalog::CatalogLoader;
//!
//! // Load a single listing file
//! let loader = CatalogLoader::from_file("modules.yaml").unwrap();
//! assert!(loader.catalog().find("verbose").is_some());
//!
//! // Load a directory of per-module files
//! let loader = CatalogLoader::from_dir("modules.d/").unwrap();
//!
//! // Use the builder for a fallback chain
//! let loader = CatalogLoader::builder()
//!     .from_dir("/etc/modopts/modules.d")
//!     .from_file("/usr/share/modopts/modules.json")
//!     .build()
//!     .unwrap();
//! ```

use std::io::BufReader;
use std::path::{Path, PathBuf};

use modopts_core::{Module, ParameterCatalog, validate_catalog};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{CatalogError, Result};

/// Serialization format of a listing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Yaml,
}

impl CatalogFormat {
    /// Picks the format from the file extension (`json`, `yaml`, `yml`).
    ///
    /// # Examples
    ///
    /// ```
    /// use modopts_catalog::CatalogFormat;
    ///
    /// assert_eq!(CatalogFormat::from_path("a/core.yml"), Some(CatalogFormat::Yaml));
    /// assert_eq!(CatalogFormat::from_path("core.JSON"), Some(CatalogFormat::Json));
    /// assert_eq!(CatalogFormat::from_path("README.md"), None);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Describes where a catalog was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// A single listing file.
    File(PathBuf),
    /// A directory of per-module files.
    Directory(PathBuf),
    /// Loaded via a fallback chain of multiple sources.
    Multiple(Vec<CatalogSource>),
}

/// A loaded [`ParameterCatalog`] together with its origin.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    catalog: ParameterCatalog,
    source: CatalogSource,
}

impl CatalogLoader {
    /// Returns a new [`CatalogBuilder`] for configuring a fallback chain.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// Loads a whole catalog from one JSON or YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnsupportedFormat`] for an unknown extension,
    /// [`CatalogError::Io`] if the file cannot be read, and
    /// [`CatalogError::Json`] or [`CatalogError::Yaml`] if parsing fails.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let catalog: ParameterCatalog = read_document(path)?;
        debug!(
            path = %path.display(),
            modules = catalog.modules().len(),
            "Loaded catalog file"
        );
        Ok(Self {
            catalog,
            source: CatalogSource::File(path.to_path_buf()),
        })
    }

    /// Loads a catalog from a directory holding one module per file.
    ///
    /// Files are registered in file name order, so prefixes like `00-core.yaml`
    /// control module order. Files without a JSON or YAML extension are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the directory or a file cannot be
    /// read, [`CatalogError::Json`]/[`CatalogError::Yaml`] if a file fails to
    /// parse, and [`CatalogError::NoSourcesAvailable`] if the directory holds
    /// no module file at all.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut files = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let file_path = entry?.path();
            if file_path.is_file() && CatalogFormat::from_path(&file_path).is_some() {
                files.push(file_path);
            }
        }
        if files.is_empty() {
            return Err(CatalogError::NoSourcesAvailable);
        }
        files.sort();

        let mut catalog = ParameterCatalog::new();
        for file in &files {
            let module: Module = read_document(file)?;
            debug!(file = %file.display(), module = %module.name, "Loaded module file");
            catalog.push(module);
        }

        Ok(Self {
            catalog,
            source: CatalogSource::Directory(path.to_path_buf()),
        })
    }

    /// Rejects the catalog if [`validate_catalog`] reports any problem.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Invalid`] listing every problem, one per line.
    pub fn validated(self) -> Result<Self> {
        let problems = validate_catalog(&self.catalog);
        if problems.is_empty() {
            return Ok(self);
        }
        let message = problems
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        Err(CatalogError::Invalid(message))
    }

    pub fn catalog(&self) -> &ParameterCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut ParameterCatalog {
        &mut self.catalog
    }

    pub fn into_catalog(self) -> ParameterCatalog {
        self.catalog
    }

    /// Returns a reference to the source metadata.
    pub fn source(&self) -> &CatalogSource {
        &self.source
    }
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = CatalogFormat::from_path(path)
        .ok_or_else(|| CatalogError::UnsupportedFormat(path.to_path_buf()))?;
    let reader = BufReader::new(std::fs::File::open(path)?);
    let document = match format {
        CatalogFormat::Json => serde_json::from_reader(reader)?,
        CatalogFormat::Yaml => serde_yaml::from_reader(reader)?,
    };
    Ok(document)
}

/// Builder for loading a catalog from the first source that works.
///
/// Sources are tried in the order they are added. If all fail,
/// [`CatalogError::NoSourcesAvailable`] is returned.
///
/// # Example
///
/// ```no_run
/// use modopts_catalog::CatalogLoader;
///
/// let loader = CatalogLoader::builder()
///     .from_dir("./modules.d")
///     .from_file("/usr/share/modopts/modules.yaml")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    sources: Vec<CatalogSource>,
}

impl CatalogBuilder {
    /// Creates a new builder with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single listing file as a source.
    pub fn from_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(CatalogSource::File(path.into()));
        self
    }

    /// Adds a directory of per-module files as a source.
    pub fn from_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(CatalogSource::Directory(path.into()));
        self
    }

    /// Loads from the configured sources in order; the first success wins.
    pub fn build(self) -> Result<CatalogLoader> {
        for source in &self.sources {
            let result = match source {
                CatalogSource::File(path) => CatalogLoader::from_file(path),
                CatalogSource::Directory(path) => CatalogLoader::from_dir(path),
                CatalogSource::Multiple(_) => continue,
            };

            match result {
                Ok(mut loader) => {
                    loader.source = CatalogSource::Multiple(self.sources.clone());
                    return Ok(loader);
                }
                Err(err) => debug!(source = ?source, error = %err, "Catalog source failed"),
            }
        }

        Err(CatalogError::NoSourcesAvailable)
    }
}

#[cfg(test)]
mod tests {
    use modopts_core::ParameterDescriptor;

    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_from_file_json_and_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let json = write(
            dir.path(),
            "modules.json",
            r#"{"modules": [{"name": "core", "params": [{"name": "verbose", "kind": "integer", "short": "v"}]}]}"#,
        );
        let yaml = write(
            dir.path(),
            "modules.yaml",
            "modules:\n  - name: core\n    params:\n      - name: verbose\n        kind: integer\n        short: v\n",
        );

        let from_json = CatalogLoader::from_file(&json).unwrap();
        let from_yaml = CatalogLoader::from_file(&yaml).unwrap();
        assert_eq!(from_json.catalog(), from_yaml.catalog());
        assert_eq!(from_json.source(), &CatalogSource::File(json));
    }

    #[test]
    fn test_from_file_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "modules.toml", "");
        assert!(matches!(
            CatalogLoader::from_file(&path),
            Err(CatalogError::UnsupportedFormat(p)) if p == path
        ));
    }

    #[test]
    fn test_from_dir_orders_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "20-http.yaml", "name: http\nparams:\n  - name: bind\n");
        write(dir.path(), "10-core.json", r#"{"name": "core"}"#);
        write(dir.path(), "notes.txt", "not a module");

        let loader = CatalogLoader::from_dir(dir.path()).unwrap();
        let names: Vec<_> = loader.catalog().modules().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["core", "http"]);
    }

    #[test]
    fn test_from_dir_without_modules() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            CatalogLoader::from_dir(dir.path()),
            Err(CatalogError::NoSourcesAvailable)
        ));
    }

    #[test]
    fn test_validated_reports_problems() {
        let mut loader = CatalogLoader {
            catalog: ParameterCatalog::new(),
            source: CatalogSource::File(PathBuf::from("inline")),
        };
        loader.catalog_mut().push(
            Module::new("core")
                .with_param(ParameterDescriptor::string("bind"))
                .with_param(ParameterDescriptor::string("bind")),
        );

        let err = loader.validated().unwrap_err();
        assert!(matches!(err, CatalogError::Invalid(ref msg) if msg.contains("bind")));
    }

    #[test]
    fn test_builder_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "modules.json", r#"{"modules": [{"name": "core"}]}"#);

        let loader = CatalogLoader::builder()
            .from_dir(dir.path().join("missing"))
            .from_file(&file)
            .build()
            .unwrap();
        assert_eq!(loader.catalog().modules().len(), 1);
        assert!(matches!(loader.source(), CatalogSource::Multiple(s) if s.len() == 2));
    }

    #[test]
    fn test_builder_all_fail() {
        let result = CatalogLoader::builder()
            .from_file("/nonexistent/modules.json")
            .from_dir("/nonexistent/modules.d")
            .build();
        assert!(matches!(result, Err(CatalogError::NoSourcesAvailable)));
        assert!(matches!(
            CatalogLoader::builder().build(),
            Err(CatalogError::NoSourcesAvailable)
        ));
    }
}
