//! Parser behavior settings.
//!
//! Every field has a default, so an empty settings document (or
//! [`ParserConfig::default()`]) gives the classic behavior: strict errors,
//! permuted argv, `-v` as the verbosity counter and a 0.8 suggestion
//! threshold.

use std::io::IsTerminal;

use modopts_core::VERBOSITY_FLAG;
use serde::{Deserialize, Serialize};

use crate::suggest::SUGGESTION_THRESHOLD;

/// What to do with unknown options and missing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ErrorMode {
    /// Report the first error and fail the parse.
    #[default]
    Strict,
    /// Skip offending tokens and keep scanning.
    Ignore,
}

/// How positional arguments interleave with options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ArgOrdering {
    /// Options may follow positionals; positionals are moved to the end.
    #[default]
    Permute,
    /// The first positional ends option scanning.
    RequireOrder,
}

/// When to color diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ColorChoice {
    /// Color when stderr is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Resolves the choice against the current stderr.
    pub fn enabled(self) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::io::stderr().is_terminal(),
        }
    }
}

/// Parser settings.
///
/// # Examples
///
/// ```
/// use modopts_cmdline::{ErrorMode, ParserConfig};
///
/// let config = ParserConfig::default();
/// assert_eq!(config.errors, ErrorMode::Strict);
/// assert_eq!(config.verbosity_flag, 'v');
/// assert_eq!(config.suggestion_threshold, 0.8);
///
/// let lenient = ParserConfig::default().ignoring_errors();
/// assert_eq!(lenient.errors, ErrorMode::Ignore);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Error handling mode.
    pub errors: ErrorMode,
    /// Positional argument ordering.
    pub ordering: ArgOrdering,
    /// Short flag that counts occurrences instead of taking a value.
    pub verbosity_flag: char,
    /// Minimum similarity for a "did you mean" suggestion.
    pub suggestion_threshold: f64,
    /// Diagnostic coloring.
    pub color: ColorChoice,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            errors: ErrorMode::Strict,
            ordering: ArgOrdering::Permute,
            verbosity_flag: VERBOSITY_FLAG,
            suggestion_threshold: SUGGESTION_THRESHOLD,
            color: ColorChoice::Auto,
        }
    }
}

impl ParserConfig {
    /// Switches to [`ErrorMode::Ignore`].
    pub fn ignoring_errors(mut self) -> Self {
        self.errors = ErrorMode::Ignore;
        self
    }

    /// Switches to [`ArgOrdering::RequireOrder`].
    pub fn require_order(mut self) -> Self {
        self.ordering = ArgOrdering::RequireOrder;
        self
    }

    /// Sets the color choice.
    pub fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Returns `true` when errors are swallowed.
    pub fn ignores_errors(&self) -> bool {
        self.errors == ErrorMode::Ignore
    }
}
