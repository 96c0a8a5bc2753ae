//! Parameter catalog type definitions.
//!
//! This module defines the data model every other crate in the workspace
//! consumes: modules export ordered lists of [`ParameterDescriptor`]s and a
//! [`ParameterCatalog`] aggregates them in registration order. The types are
//! serializable with [`serde`] so a pre-built listing can be loaded from JSON
//! or YAML.

use serde::{Deserialize, Serialize};

/// Short flag reserved for the verbosity counter.
///
/// Each occurrence increments a counter instead of consuming a value,
/// whatever kind the owning parameter declares.
pub const VERBOSITY_FLAG: char = 'v';

/// Kind of value a parameter carries.
///
/// # Examples
///
/// ```
/// use modopts_core::ParamKind;
///
/// assert!(ParamKind::Integer.takes_value());
/// assert!(!ParamKind::Bool.takes_value());
/// assert!(!ParamKind::Hint.is_value_bearing());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// Free-form text (the default).
    #[default]
    String,
    /// Signed 64-bit integer.
    Integer,
    /// Floating point number.
    Float,
    /// Switch; presence means `true`.
    Bool,
    /// Documentation-only entry (section headers and the like). Carries no value.
    Hint,
}

impl ParamKind {
    /// Returns `true` for kinds that end up in the option table.
    pub fn is_value_bearing(self) -> bool {
        !matches!(self, ParamKind::Hint)
    }

    /// Returns `true` when the long option requires an argument.
    pub fn takes_value(self) -> bool {
        matches!(
            self,
            ParamKind::String | ParamKind::Integer | ParamKind::Float
        )
    }

    /// Returns `true` for kinds that accept `min`/`max` limits.
    pub fn is_numeric(self) -> bool {
        matches!(self, ParamKind::Integer | ParamKind::Float)
    }
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ParamKind::String => "string",
            ParamKind::Integer => "integer",
            ParamKind::Float => "float",
            ParamKind::Bool => "bool",
            ParamKind::Hint => "hint",
        };
        f.write_str(name)
    }
}

/// Numeric limit attached to an integer or float parameter.
///
/// Serialized untagged, so `0` and `0.5` are both valid in a listing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Limit {
    Integer(i64),
    Float(f64),
}

impl Limit {
    /// Returns the limit as an integer, truncating floats.
    pub fn as_integer(self) -> i64 {
        match self {
            Limit::Integer(i) => i,
            Limit::Float(f) => f as i64,
        }
    }

    /// Returns the limit as a float.
    pub fn as_float(self) -> f64 {
        match self {
            Limit::Integer(i) => i as f64,
            Limit::Float(f) => f,
        }
    }
}

/// Schema entry for one configurable parameter.
///
/// # Examples
///
/// ```
/// use modopts_core::{ParameterDescriptor, ParamKind};
///
/// let rate = ParameterDescriptor::integer("rate")
///     .with_short('r')
///     .with_range(0, 100)
///     .with_description("Sample rate");
/// assert_eq!(rate.kind, ParamKind::Integer);
/// assert!(rate.takes_value());
///
/// let fs = ParameterDescriptor::boolean("fullscreen").with_short('f');
/// assert!(!fs.takes_value());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Option name, without leading dashes.
    pub name: String,
    /// Single-character short flag, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    /// Value kind.
    #[serde(default)]
    pub kind: ParamKind,
    /// Lower bound for numeric kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Limit>,
    /// Upper bound for numeric kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Limit>,
    /// Kept only so old command lines don't fail; never applied.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub obsolete: bool,
    /// Help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParameterDescriptor {
    fn with_kind(name: &str, kind: ParamKind) -> Self {
        Self {
            name: name.to_string(),
            short: None,
            kind,
            min: None,
            max: None,
            obsolete: false,
            description: None,
        }
    }

    /// Creates a string parameter.
    pub fn string(name: &str) -> Self {
        Self::with_kind(name, ParamKind::String)
    }

    /// Creates an integer parameter.
    pub fn integer(name: &str) -> Self {
        Self::with_kind(name, ParamKind::Integer)
    }

    /// Creates a float parameter.
    pub fn float(name: &str) -> Self {
        Self::with_kind(name, ParamKind::Float)
    }

    /// Creates a boolean parameter.
    pub fn boolean(name: &str) -> Self {
        Self::with_kind(name, ParamKind::Bool)
    }

    /// Creates a documentation-only hint entry.
    pub fn hint(name: &str) -> Self {
        Self::with_kind(name, ParamKind::Hint)
    }

    /// Sets the short flag.
    pub fn with_short(mut self, flag: char) -> Self {
        self.short = Some(flag);
        self
    }

    /// Sets the numeric range.
    ///
    /// Integer parameters keep integer limits; float parameters store both
    /// limits as floats.
    pub fn with_range(mut self, min: impl Into<Limit>, max: impl Into<Limit>) -> Self {
        let (min, max) = (min.into(), max.into());
        if self.kind == ParamKind::Float {
            self.min = Some(Limit::Float(min.as_float()));
            self.max = Some(Limit::Float(max.as_float()));
        } else {
            self.min = Some(min);
            self.max = Some(max);
        }
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Marks the parameter as obsolete.
    pub fn deprecated(mut self) -> Self {
        self.obsolete = true;
        self
    }

    /// Returns `true` when the long option requires an argument.
    pub fn takes_value(&self) -> bool {
        self.kind.takes_value()
    }

    /// Returns `true` unless this is a hint entry.
    pub fn is_value_bearing(&self) -> bool {
        self.kind.is_value_bearing()
    }
}

impl From<i64> for Limit {
    fn from(value: i64) -> Self {
        Limit::Integer(value)
    }
}

impl From<i32> for Limit {
    fn from(value: i32) -> Self {
        Limit::Integer(i64::from(value))
    }
}

impl From<f64> for Limit {
    fn from(value: f64) -> Self {
        Limit::Float(value)
    }
}

/// A module's exported parameter list.
///
/// # Examples
///
/// ```
/// use modopts_core::{Module, ParameterDescriptor};
///
/// let module = Module::new("core")
///     .with_param(ParameterDescriptor::hint("Video"))
///     .with_param(ParameterDescriptor::boolean("fullscreen"))
///     .with_param(ParameterDescriptor::integer("width"));
///
/// // one hint (skipped), one boolean (three spellings), one integer
/// assert_eq!(module.long_option_count(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Module name.
    pub name: String,
    /// Parameters in declaration order.
    #[serde(default)]
    pub params: Vec<ParameterDescriptor>,
}

impl Module {
    /// Creates an empty module.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            params: Vec::new(),
        }
    }

    /// Appends a parameter.
    pub fn with_param(mut self, param: ParameterDescriptor) -> Self {
        self.params.push(param);
        self
    }

    /// Number of long-option table rows this module contributes.
    pub fn long_option_count(&self) -> usize {
        self.params
            .iter()
            .map(|p| match p.kind {
                ParamKind::Hint => 0,
                ParamKind::Bool => 3,
                _ => 1,
            })
            .sum()
    }
}

/// Read-only aggregated view over every module's parameters.
///
/// Module order is registration order and is preserved everywhere
/// downstream.
///
/// # Examples
///
/// ```
/// use modopts_core::{Module, ParameterCatalog, ParameterDescriptor};
///
/// let mut catalog = ParameterCatalog::new();
/// let verbose = ParameterDescriptor::integer("verbose").with_short('v');
/// catalog.push(Module::new("core").with_param(verbose));
/// catalog.push(Module::new("http").with_param(ParameterDescriptor::string("bind")));
///
/// assert_eq!(catalog.modules().len(), 2);
/// assert!(catalog.find("bind").is_some());
/// assert_eq!(catalog.long_option_count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterCatalog {
    /// Modules in registration order.
    #[serde(default)]
    pub modules: Vec<Module>,
}

impl ParameterCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module after all existing ones.
    pub fn push(&mut self, module: Module) {
        self.modules.push(module);
    }

    /// Returns the registered modules.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Iterates every descriptor, module order first, then declaration order.
    pub fn params(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.modules.iter().flat_map(|m| m.params.iter())
    }

    /// Finds the first value-bearing descriptor with the given name.
    pub fn find(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.params()
            .find(|p| p.is_value_bearing() && p.name == name)
    }

    /// Total number of long-option rows the catalog expands to.
    pub fn long_option_count(&self) -> usize {
        self.modules.iter().map(Module::long_option_count).sum()
    }

    /// Keeps only the modules for which `keep` returns `true`.
    pub fn retain_modules(&mut self, mut keep: impl FnMut(&Module) -> bool) {
        self.modules.retain(|m| keep(m));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_defaults() {
        let p = ParameterDescriptor::string("bind");
        assert_eq!(p.kind, ParamKind::String);
        assert!(p.short.is_none());
        assert!(!p.obsolete);
        assert!(p.takes_value());
    }

    #[test]
    fn test_float_range_is_stored_as_float() {
        let p = ParameterDescriptor::float("gain").with_range(0, 8);
        assert_eq!(p.min, Some(Limit::Float(0.0)));
        assert_eq!(p.max, Some(Limit::Float(8.0)));
    }

    #[test]
    fn test_catalog_find_skips_hints() {
        let mut catalog = ParameterCatalog::new();
        catalog.push(
            Module::new("core")
                .with_param(ParameterDescriptor::hint("video"))
                .with_param(ParameterDescriptor::boolean("video")),
        );

        let found = catalog.find("video").unwrap();
        assert_eq!(found.kind, ParamKind::Bool);
    }

    #[test]
    fn test_long_option_count() {
        let mut catalog = ParameterCatalog::new();
        catalog.push(
            Module::new("a")
                .with_param(ParameterDescriptor::boolean("audio"))
                .with_param(ParameterDescriptor::string("aout"))
                .with_param(ParameterDescriptor::hint("Audio")),
        );
        catalog.push(Module::new("b").with_param(ParameterDescriptor::float("rate")));

        assert_eq!(catalog.long_option_count(), 5);
    }

    #[test]
    fn test_deserialize_listing() {
        let json = r#"{
            "modules": [
                {"name": "core", "params": [
                    {"name": "rate", "kind": "integer", "min": 0, "max": 100},
                    {"name": "gain", "kind": "float", "min": 0.0, "max": 2.5},
                    {"name": "quiet", "kind": "bool", "short": "q", "obsolete": true}
                ]}
            ]
        }"#;
        let catalog: ParameterCatalog = serde_json::from_str(json).unwrap();
        let params: Vec<_> = catalog.params().collect();
        assert_eq!(params[0].min, Some(Limit::Integer(0)));
        assert_eq!(params[1].max, Some(Limit::Float(2.5)));
        assert_eq!(params[2].short, Some('q'));
        assert!(params[2].obsolete);
    }
}
