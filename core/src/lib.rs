//! Module parameter catalog and typed variable store.
//!
//! This crate defines the data every other `modopts` crate consumes:
//!
//! - [`ParameterDescriptor`]: one configurable parameter (name, short flag,
//!   kind, numeric limits, obsolete marker).
//! - [`Module`]: an ordered list of descriptors exported by one module.
//! - [`ParameterCatalog`]: all modules in registration order. The catalog is
//!   produced by whatever registry loads modules and is read-only afterwards.
//! - [`VariableStore`] / [`VariableSink`]: where parsed values end up.
//!
//! Validation ([`validate_catalog`]) catches structural problems such as
//! names containing `=`, duplicate parameters and colliding short flags.
//!
//! # Example
//!
//! ```
//! use modopts_core::*;
//!
//! let mut catalog = ParameterCatalog::new();
//! catalog.push(
//!     Module::new("core")
//!         .with_param(ParameterDescriptor::integer("verbose").with_short('v'))
//!         .with_param(ParameterDescriptor::boolean("fullscreen").with_short('f')),
//! );
//! catalog.push(
//!     Module::new("http").with_param(ParameterDescriptor::string("bind")),
//! );
//!
//! assert!(validate_catalog(&catalog).is_empty());
//! assert_eq!(catalog.long_option_count(), 5);
//! ```

mod store;
mod types;
mod validate;

pub use store::{Range, Value, VarType, Variable, VariableSink, VariableStore};
pub use types::*;
pub use validate::{ValidationError, validate_catalog, validate_catalog_with};
