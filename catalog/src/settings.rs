//! Parser settings file.
//!
//! Controls how the command line is parsed and which modules contribute
//! options.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! parser:
//!   errors: strict
//!   ordering: permute
//!   verbosity_flag: v
//!   suggestion_threshold: 0.8
//!   color: auto
//! exclude_modules:
//!   - legacy-http
//! only_modules: []
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use modopts_cmdline::ParserConfig;
use modopts_core::ParameterCatalog;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Top-level settings file.
///
/// # Examples
///
/// ```no_run
/// use modopts_catalog::{CatalogLoader, Settings};
///
/// let settings = Settings::load("modopts.yaml").unwrap();
/// let mut catalog = CatalogLoader::from_file("modules.json").unwrap().into_catalog();
/// settings.apply(&mut catalog);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Settings format version (e.g., `"1.0"`).
    pub version: String,
    /// Parser behavior.
    #[serde(default)]
    pub parser: ParserConfig,
    /// Modules whose options are never registered.
    #[serde(default)]
    pub exclude_modules: Vec<String>,
    /// Modules to register (empty = all non-excluded modules).
    #[serde(default)]
    pub only_modules: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            parser: ParserConfig::default(),
            exclude_modules: Vec::new(),
            only_modules: Vec::new(),
        }
    }
}

impl Settings {
    /// Loads settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::CatalogError::Io) if the file cannot be read, or
    /// [`Yaml`](crate::CatalogError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let settings = serde_yaml::from_reader(BufReader::new(file))?;
        Ok(settings)
    }

    /// Saves the settings as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::CatalogError::Io) if the file cannot be
    /// written, or [`Yaml`](crate::CatalogError::Yaml) if serialization
    /// fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_yaml::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn is_module_excluded(&self, module: &str) -> bool {
        self.exclude_modules.iter().any(|m| m == module)
    }

    /// Returns `true` if `module` should contribute options.
    ///
    /// Exclusions always win. An empty `only_modules` list enables every
    /// other module.
    ///
    /// # Examples
    ///
    /// ```
    /// # let yaml = r#"
    /// # version: "1.0"
    /// # only_modules: [core, http]
    /// # exclude_modules: [http]
    /// # "#;
    /// # let settings: modopts_catalog::Settings = serde_yaml::from_str(yaml).unwrap();
    /// assert!(settings.is_module_enabled("core"));
    /// assert!(!settings.is_module_enabled("http"));
    /// assert!(!settings.is_module_enabled("alsa"));
    /// ```
    pub fn is_module_enabled(&self, module: &str) -> bool {
        if self.is_module_excluded(module) {
            return false;
        }
        self.only_modules.is_empty() || self.only_modules.iter().any(|m| m == module)
    }

    /// Drops disabled modules from `catalog`. Returns how many were removed.
    pub fn apply(&self, catalog: &mut ParameterCatalog) -> usize {
        let before = catalog.modules().len();
        catalog.retain_modules(|module| {
            let enabled = self.is_module_enabled(&module.name);
            if !enabled {
                debug!(module = %module.name, "Module disabled by settings");
            }
            enabled
        });
        before - catalog.modules().len()
    }
}
