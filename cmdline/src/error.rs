//! Error types for table construction and argument scanning.

use std::collections::TryReserveError;

use thiserror::Error;

/// A user-input error found while scanning argv.
///
/// The `Display` text matches the diagnostic line without the `Error:`
/// prefix and without color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// `--name` that matches no table entry. Holds the raw argv token.
    #[error("Unknown option '{token}'")]
    UnknownLongOption { token: String },
    /// `-c` whose character is not in the short-option index.
    #[error("Unknown option '-{flag}'")]
    UnknownShortOption { flag: char },
    /// Value-taking option at the end of argv.
    #[error("Missing mandatory value for option {option}")]
    MissingValue { option: String },
    /// Abbreviated long option matching several entries.
    #[error("Ambiguous option '{token}'")]
    AmbiguousOption {
        token: String,
        candidates: Vec<String>,
    },
}

impl ParseError {
    /// The option as it should appear in a diagnostic.
    pub fn label(&self) -> String {
        match self {
            ParseError::UnknownLongOption { token } | ParseError::AmbiguousOption { token, .. } => {
                token.clone()
            }
            ParseError::UnknownShortOption { flag } => format!("-{flag}"),
            ParseError::MissingValue { option } => option.clone(),
        }
    }

    /// The long option name an unknown token was trying to spell.
    ///
    /// Leading dashes and any `=value` part are removed.
    pub fn unknown_long_name(&self) -> Option<&str> {
        match self {
            ParseError::UnknownLongOption { token } => {
                let body = token.strip_prefix("--").unwrap_or(token);
                Some(body.split_once('=').map_or(body, |(name, _)| name))
            }
            _ => None,
        }
    }
}

/// Errors returned by [`load_command_line`](crate::load_command_line).
#[derive(Debug, Error)]
pub enum CmdlineError {
    /// The option table could not be allocated.
    #[error("cannot allocate option table: {0}")]
    Allocation(#[from] TryReserveError),

    /// Argument scanning failed in strict mode.
    #[error(transparent)]
    Parse(#[from] ParseError),
}
