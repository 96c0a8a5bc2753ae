//! Loading module parameter catalogs and parser settings.
//!
//! Modules normally register their parameters at startup. This crate reads
//! the same information from pre-built listings (JSON or YAML, one file or a
//! directory of per-module files) and a YAML settings file that picks the
//! parser behavior and filters modules.
//!
//! # Quick start
//!
//! ```no_run
//! use modopts_catalog::{CatalogLoader, Settings};
//! use modopts_cmdline::load_command_line;
//! use modopts_core::VariableStore;
//!
//! let settings = Settings::load("modopts.yaml").unwrap();
//! let mut catalog = CatalogLoader::builder()
//!     .from_dir("modules.d")
//!     .from_file("modules.json")
//!     .build()
//!     .unwrap()
//!     .into_catalog();
//! settings.apply(&mut catalog);
//!
//! let mut store = VariableStore::new();
//! let cmdline = load_command_line(&catalog, std::env::args(), &mut store, &settings.parser);
//! ```

mod error;
mod loader;
mod settings;

pub use error::{CatalogError, Result};
pub use loader::{CatalogBuilder, CatalogFormat, CatalogLoader, CatalogSource};
pub use settings::Settings;
