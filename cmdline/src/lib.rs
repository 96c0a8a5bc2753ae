//! Runtime-assembled command line parsing for module parameters.
//!
//! The set of options is only known once every module's parameters are in a
//! [`ParameterCatalog`], so nothing here is generated at compile time. A
//! parse runs in four steps:
//!
//! 1. [`OptionTable::build`] turns the catalog into long-option rows (with
//!    `no<name>`/`no-<name>` rows for booleans) and a short-option index.
//! 2. [`Scanner`] walks argv and classifies each token.
//! 3. [`bind`] converts recognized values and writes them to a
//!    [`VariableSink`].
//! 4. On an unknown long option, [`suggest`] proposes the closest name.
//!
//! [`load_command_line`] drives all four and prints diagnostics.
//!
//! # Example
//!
//! ```
//! use modopts_cmdline::{ParserConfig, load_command_line_to};
//! use modopts_core::*;
//!
//! let mut catalog = ParameterCatalog::new();
//! catalog.push(
//!     Module::new("core")
//!         .with_param(ParameterDescriptor::integer("verbose").with_short('v'))
//!         .with_param(ParameterDescriptor::boolean("fullscreen").with_short('f')),
//! );
//! catalog.push(Module::new("http").with_param(ParameterDescriptor::string("bind")));
//!
//! let mut store = VariableStore::new();
//! let mut diagnostics = Vec::new();
//! let cmdline = load_command_line_to(
//!     &catalog,
//!     ["prog", "-vv", "movie.mkv", "--bind=0.0.0.0", "--no-fullscreen"],
//!     &mut store,
//!     &ParserConfig::default(),
//!     &mut diagnostics,
//! )
//! .unwrap();
//!
//! assert_eq!(cmdline.positionals(), ["movie.mkv"]);
//! assert_eq!(store.value("verbose"), Some(&Value::Integer(2)));
//! assert_eq!(store.value("fullscreen"), Some(&Value::Bool(false)));
//! assert_eq!(store.value("bind"), Some(&Value::String("0.0.0.0".into())));
//! ```

mod bind;
mod config;
mod diagnostics;
mod error;
mod scanner;
mod suggest;
mod table;

use std::io::Write;

use modopts_core::{ParameterCatalog, VariableSink};
use tracing::{debug, warn};

pub use bind::{Binding, Conversion, bind, parse_float, parse_integer};
pub use config::{ArgOrdering, ColorChoice, ErrorMode, ParserConfig};
pub use diagnostics::{Palette, render_error, render_obsolete_warning};
pub use error::{CmdlineError, ParseError};
pub use scanner::{Event, ParseState, ScanOutcome, Scanner};
pub use suggest::{SUGGESTION_THRESHOLD, Suggestion, jaro_winkler, suggest};
pub use table::{LongMatch, OptionEntry, OptionTable, ParamId, ShortArity, ShortEntry};

/// Result of a successful parse.
pub type CommandLine = ScanOutcome;

/// Parses `argv` against `catalog` and stores recognized options in `sink`.
///
/// Diagnostics go to stderr. See [`load_command_line_to`].
///
/// # Errors
///
/// See [`load_command_line_to`].
pub fn load_command_line<I, S, V>(
    catalog: &ParameterCatalog,
    argv: I,
    sink: &mut V,
    config: &ParserConfig,
) -> Result<CommandLine, CmdlineError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
    V: VariableSink + ?Sized,
{
    let stderr = std::io::stderr();
    let mut stderr = stderr.lock();
    load_command_line_to(catalog, argv, sink, config, &mut stderr)
}

/// Parses `argv` against `catalog`, writing diagnostics to `diagnostics`.
///
/// `argv[0]` is the program name. Recognized options are bound in argv
/// order, so the last occurrence of an option wins. Obsolete options print a
/// warning naming the parameter's long option, whichever spelling was used,
/// and bind nothing. The verbosity counter starts at zero on every
/// call.
///
/// Write failures on `diagnostics` are ignored.
///
/// # Errors
///
/// - [`CmdlineError::Allocation`] if the option table cannot be allocated.
/// - [`CmdlineError::Parse`] for the first unknown option, ambiguous
///   abbreviation or missing value, in [`ErrorMode::Strict`] only. The
///   error block (with a suggestion for unknown long options) has been
///   written to `diagnostics` by then. Options before the error are already
///   bound.
pub fn load_command_line_to<I, S, V, W>(
    catalog: &ParameterCatalog,
    argv: I,
    sink: &mut V,
    config: &ParserConfig,
    diagnostics: &mut W,
) -> Result<CommandLine, CmdlineError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
    V: VariableSink + ?Sized,
    W: Write + ?Sized,
{
    let table = OptionTable::build(catalog, config)?;
    let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
    let palette = Palette::new(config.color.enabled());
    let mut verbosity: i64 = 0;

    let mut scanner = Scanner::new(&table, &argv, config);
    for event in scanner.by_ref() {
        match event {
            Event::Long { entry, value } => {
                let param = table.param(entry.param);
                if param.obsolete {
                    warn!(option = %entry.name, "Obsolete option used");
                    let warning = render_obsolete_warning(&format!("--{}", param.name), palette);
                    let _ = diagnostics.write_all(warning.as_bytes());
                    continue;
                }
                bind(sink, param, Binding::Long { negated: entry.negated }, value);
            }
            Event::Short { flag, entry, value } => {
                let param = table.param(entry.param);
                if param.obsolete {
                    warn!(option = %flag, "Obsolete option used");
                    let warning = render_obsolete_warning(&format!("--{}", param.name), palette);
                    let _ = diagnostics.write_all(warning.as_bytes());
                    continue;
                }
                let binding = if entry.arity == ShortArity::Counter {
                    verbosity += 1;
                    Binding::Verbosity(verbosity)
                } else {
                    Binding::Short
                };
                bind(sink, param, binding, value);
            }
            Event::Error(err) => {
                let suggestion = err
                    .unknown_long_name()
                    .and_then(|name| suggest(name, &table, config.suggestion_threshold));
                debug!(error = %err, suggestion = ?suggestion, "Command line rejected");
                let message = render_error(&err, suggestion.as_ref(), palette);
                let _ = diagnostics.write_all(message.as_bytes());
                return Err(err.into());
            }
            Event::PositionalsBeginAt(index) => {
                debug!(index, "Positional arguments begin");
            }
        }
    }

    Ok(scanner.finish())
}
