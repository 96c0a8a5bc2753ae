//! Typed variable store.
//!
//! The command-line core writes recognized options into a [`VariableSink`].
//! [`VariableStore`] is the in-memory implementation shipped with the
//! workspace: an ordered map from option name to a typed value plus the
//! declared numeric range. Range enforcement happens on read through
//! [`VariableStore::clamped`]; writes keep the raw value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Type of a stored variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarType {
    String,
    Integer,
    Float,
    Bool,
}

/// A typed variable value.
///
/// # Examples
///
/// ```
/// use modopts_core::{Value, VarType};
///
/// assert_eq!(Value::Integer(3).var_type(), VarType::Integer);
/// assert_eq!(Value::default_for(VarType::Bool), Value::Bool(false));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Zero value for a type.
    pub fn default_for(var_type: VarType) -> Self {
        match var_type {
            VarType::String => Value::String(String::new()),
            VarType::Integer => Value::Integer(0),
            VarType::Float => Value::Float(0.0),
            VarType::Bool => Value::Bool(false),
        }
    }

    /// Type of this value.
    pub fn var_type(&self) -> VarType {
        match self {
            Value::String(_) => VarType::String,
            Value::Integer(_) => VarType::Integer,
            Value::Float(_) => VarType::Float,
            Value::Bool(_) => VarType::Bool,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Declared bounds of a numeric variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: Value,
    pub max: Value,
}

/// One stored variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
}

impl Variable {
    /// Returns the value clamped into the declared range.
    ///
    /// Non-numeric values and variables without a range are returned as is.
    pub fn clamped(&self) -> Value {
        let Some(range) = &self.range else {
            return self.value.clone();
        };
        match (&self.value, &range.min, &range.max) {
            (Value::Integer(v), Value::Integer(min), Value::Integer(max)) if min <= max => {
                Value::Integer((*v).clamp(*min, *max))
            }
            (Value::Float(v), Value::Float(min), Value::Float(max)) if min <= max => {
                Value::Float(v.clamp(*min, *max))
            }
            (value, _, _) => value.clone(),
        }
    }
}

/// Destination for values materialized from the command line.
///
/// Mirrors the create / set-range / set sequence a process-wide variable
/// registry exposes. Implementations must accept `set` for a name that was
/// previously created with a matching type.
pub trait VariableSink {
    /// Creates `name` with the zero value of `var_type` if it does not exist.
    ///
    /// An existing variable of another type is replaced.
    fn create(&mut self, name: &str, var_type: VarType);

    /// Attaches declared bounds to `name`.
    fn set_range(&mut self, name: &str, min: Value, max: Value);

    /// Sets the value of `name`.
    fn set(&mut self, name: &str, value: Value);
}

/// In-memory, name-ordered variable store.
///
/// # Examples
///
/// ```
/// use modopts_core::{Value, VarType, VariableSink, VariableStore};
///
/// let mut store = VariableStore::new();
/// store.create("rate", VarType::Integer);
/// store.set_range("rate", Value::Integer(0), Value::Integer(100));
/// store.set("rate", Value::Integer(500));
///
/// assert_eq!(store.value("rate"), Some(&Value::Integer(500)));
/// assert_eq!(store.clamped("rate"), Some(Value::Integer(100)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableStore {
    vars: BTreeMap<String, Variable>,
}

impl VariableStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a variable.
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.vars.get(name)
    }

    /// Looks up a variable's raw value.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.vars.get(name).map(|v| &v.value)
    }

    /// Looks up a variable's value clamped into its declared range.
    pub fn clamped(&self, name: &str) -> Option<Value> {
        self.vars.get(name).map(Variable::clamped)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterates variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl VariableSink for VariableStore {
    fn create(&mut self, name: &str, var_type: VarType) {
        match self.vars.get_mut(name) {
            Some(var) if var.value.var_type() == var_type => {}
            Some(var) => {
                var.value = Value::default_for(var_type);
                var.range = None;
            }
            None => {
                self.vars.insert(
                    name.to_string(),
                    Variable {
                        value: Value::default_for(var_type),
                        range: None,
                    },
                );
            }
        }
    }

    fn set_range(&mut self, name: &str, min: Value, max: Value) {
        if let Some(var) = self.vars.get_mut(name) {
            var.range = Some(Range { min, max });
        }
    }

    fn set(&mut self, name: &str, value: Value) {
        match self.vars.get_mut(name) {
            Some(var) => var.value = value,
            None => {
                self.vars.insert(name.to_string(), Variable { value, range: None });
            }
        }
    }
}
