//! User-facing diagnostic text.
//!
//! These are the messages printed when a strict parse fails or an obsolete
//! option is used. They are rendered to strings so callers choose the
//! destination; [`load_command_line`](crate::load_command_line) writes them
//! to stderr.

use crate::error::ParseError;
use crate::suggest::Suggestion;

const RESET: &str = "\x1b[0m";
const RED_BOLD: &str = "\x1b[31;1m";
const YELLOW: &str = "\x1b[33m";
const YELLOW_BOLD: &str = "\x1b[33;1m";
const GREEN: &str = "\x1b[32m";

/// ANSI escape set, empty when color is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    color: bool,
}

impl Palette {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// A palette that emits no escapes.
    pub fn plain() -> Self {
        Self { color: false }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

/// Renders the full error block for a failed parse.
///
/// # Examples
///
/// ```
/// use modopts_cmdline::{ParseError, Palette, Suggestion, render_error};
///
/// let err = ParseError::UnknownLongOption { token: "--vidoe".into() };
/// let hint = Suggestion { name: "video", score: 0.95 };
/// let text = render_error(&err, Some(&hint), Palette::plain());
/// assert_eq!(
///     text,
///     "Error: Unknown option '--vidoe'\n       Did you mean --video?\nFor more information try --help\n"
/// );
/// ```
pub fn render_error(
    err: &ParseError,
    suggestion: Option<&Suggestion<'_>>,
    palette: Palette,
) -> String {
    let label = palette.paint(YELLOW, &err.label());
    let mut out = format!("{} ", palette.paint(RED_BOLD, "Error:"));

    match err {
        ParseError::MissingValue { .. } => {
            out.push_str(&format!("Missing mandatory value for option {label}\n"));
        }
        ParseError::UnknownLongOption { .. } | ParseError::UnknownShortOption { .. } => {
            out.push_str(&format!("Unknown option '{label}'\n"));
        }
        ParseError::AmbiguousOption { candidates, .. } => {
            let candidates: Vec<String> = candidates.iter().map(|c| format!("--{c}")).collect();
            out.push_str(&format!(
                "Ambiguous option '{label}' (could be {})\n",
                candidates.join(", ")
            ));
        }
    }

    if let Some(suggestion) = suggestion {
        let option = format!("--{}", suggestion.name);
        out.push_str(&format!(
            "       Did you mean {}?\n",
            palette.paint(GREEN, &option)
        ));
    }

    out.push_str(&format!(
        "For more information try {}\n",
        palette.paint(GREEN, "--help")
    ));
    out
}

/// Renders the warning printed for an obsolete option.
///
/// `option` is the option as it should be shown, dashes included.
///
/// # Examples
///
/// ```
/// use modopts_cmdline::{Palette, render_obsolete_warning};
///
/// assert_eq!(
///     render_obsolete_warning("--old-opt", Palette::plain()),
///     "Warning: Option --old-opt no longer exists.\n"
/// );
/// ```
pub fn render_obsolete_warning(option: &str, palette: Palette) -> String {
    format!(
        "{} Option {option} no longer exists.\n",
        palette.paint(YELLOW_BOLD, "Warning:")
    )
}
