//! Catalog validation.
//!
//! Checks the structural invariants of a [`ParameterCatalog`] before it is
//! turned into an option table: names must be usable as `--name`, short
//! flags must be printable, and numeric limits only make sense on numeric
//! kinds.
//!
//! Validation is advisory. The table builder tolerates duplicate short flags
//! (first registration wins), so callers decide whether a non-empty result is
//! fatal.
//!
//! # Examples
//!
//! ```
//! use modopts_core::*;
//!
//! let mut catalog = ParameterCatalog::new();
//! catalog.push(Module::new("core").with_param(ParameterDescriptor::string("bind")));
//! assert!(validate_catalog(&catalog).is_empty());
//!
//! let mut bad = ParameterCatalog::new();
//! bad.push(Module::new("core").with_param(ParameterDescriptor::string("a=b")));
//! assert!(!validate_catalog(&bad).is_empty());
//! ```

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::{ParamKind, ParameterCatalog, ParameterDescriptor, VERBOSITY_FLAG};

/// Catalog validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A module has an empty name.
    #[error("module name cannot be empty")]
    EmptyModuleName,
    /// Two modules share a name.
    #[error("duplicate module: {0}")]
    DuplicateModule(String),
    /// A value-bearing parameter has an empty name.
    #[error("parameter name cannot be empty (module {0})")]
    EmptyParamName(String),
    /// Name contains `=`, whitespace or starts with `-`.
    #[error("invalid parameter name: {0}")]
    InvalidParamName(String),
    /// Two value-bearing parameters share a name.
    #[error("duplicate parameter: {0}")]
    DuplicateParam(String),
    /// Short flag is not a printable ASCII character.
    #[error("invalid short flag {flag:?} on parameter {param}")]
    InvalidShortFlag { param: String, flag: char },
    /// Two parameters claim the same short flag.
    #[error("short flag -{flag} of {second} already registered by {first}")]
    DuplicateShortFlag {
        flag: char,
        first: String,
        second: String,
    },
    /// `min`/`max` set on a string or bool parameter.
    #[error("range given for non-numeric parameter {0}")]
    RangeOnNonNumeric(String),
    /// `min` greater than `max`.
    #[error("inverted range on parameter {0}")]
    InvertedRange(String),
}

/// Validates a catalog, returning every problem found.
///
/// Hint entries are ignored except for their module membership. The
/// verbosity flag [`VERBOSITY_FLAG`] may be declared by any number of
/// parameters; see [`validate_catalog_with`] for a different counter flag.
///
/// # Examples
///
/// ```
/// use modopts_core::*;
///
/// let mut catalog = ParameterCatalog::new();
/// let flagged = |name| ParameterDescriptor::boolean(name).with_short('L');
/// catalog.push(Module::new("a").with_param(flagged("loop")));
/// catalog.push(Module::new("b").with_param(flagged("repeat")));
///
/// let errors = validate_catalog(&catalog);
/// assert!(matches!(errors[0], ValidationError::DuplicateShortFlag { flag: 'L', .. }));
/// ```
pub fn validate_catalog(catalog: &ParameterCatalog) -> Vec<ValidationError> {
    validate_catalog_with(catalog, VERBOSITY_FLAG)
}

/// Validates a catalog whose verbosity counter is bound to `verbosity_flag`.
///
/// Every occurrence of the counter flag feeds the same counter, so sharing it
/// across parameters is not a conflict.
pub fn validate_catalog_with(
    catalog: &ParameterCatalog,
    verbosity_flag: char,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut modules: HashSet<&str> = HashSet::new();
    let mut names: HashSet<&str> = HashSet::new();
    let mut shorts: HashMap<char, &str> = HashMap::new();

    for module in catalog.modules() {
        let module_name = module.name.trim();
        if module_name.is_empty() {
            errors.push(ValidationError::EmptyModuleName);
        } else if !modules.insert(module_name) {
            errors.push(ValidationError::DuplicateModule(module_name.to_string()));
        }

        for param in module.params.iter().filter(|p| p.is_value_bearing()) {
            if param.name.is_empty() {
                errors.push(ValidationError::EmptyParamName(module.name.clone()));
                continue;
            }
            if !is_valid_name(&param.name) {
                errors.push(ValidationError::InvalidParamName(param.name.clone()));
            }
            if !names.insert(param.name.as_str()) {
                errors.push(ValidationError::DuplicateParam(param.name.clone()));
            }

            if let Some(flag) = param.short {
                if !flag.is_ascii_graphic() || flag == '-' {
                    errors.push(ValidationError::InvalidShortFlag {
                        param: param.name.clone(),
                        flag,
                    });
                } else if flag != verbosity_flag {
                    match shorts.get(&flag) {
                        Some(first) => errors.push(ValidationError::DuplicateShortFlag {
                            flag,
                            first: first.to_string(),
                            second: param.name.clone(),
                        }),
                        None => {
                            shorts.insert(flag, param.name.as_str());
                        }
                    }
                }
            }

            errors.extend(validate_range(param));
        }
    }

    errors
}

fn is_valid_name(name: &str) -> bool {
    !name.starts_with('-') && !name.contains('=') && !name.chars().any(char::is_whitespace)
}

fn validate_range(param: &ParameterDescriptor) -> Option<ValidationError> {
    if param.min.is_none() && param.max.is_none() {
        return None;
    }
    if !param.kind.is_numeric() {
        return Some(ValidationError::RangeOnNonNumeric(param.name.clone()));
    }

    let inverted = match (param.kind, param.min, param.max) {
        (ParamKind::Integer, Some(min), Some(max)) => min.as_integer() > max.as_integer(),
        (_, Some(min), Some(max)) => min.as_float() > max.as_float(),
        _ => false,
    };
    inverted.then(|| ValidationError::InvertedRange(param.name.clone()))
}
