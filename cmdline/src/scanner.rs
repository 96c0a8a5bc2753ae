//! getopt-style argv scanner.
//!
//! [`Scanner`] walks argv once and yields an [`Event`] per recognized option.
//! It never touches the variable store; binding is the caller's job.
//!
//! Syntax accepted:
//!
//! - `--name value`, `--name=value` for value-taking options
//! - `--name`, `--noname`, `--no-name` for booleans; `--flag=x` on a
//!   no-value option is accepted and the value dropped
//! - unambiguous abbreviations of long names
//! - `-abc` clusters; a value-taking short option always reads the next argv
//!   token, the rest of the cluster is still parsed as flags
//! - `--` ends option scanning
//!
//! argv[0] is the program name and is never scanned.

use tracing::debug;

use crate::config::{ArgOrdering, ParserConfig};
use crate::error::ParseError;
use crate::table::{LongMatch, OptionEntry, OptionTable, ShortArity, ShortEntry};

/// A classified piece of argv.
#[derive(Debug, Clone, PartialEq)]
pub enum Event<'t, 'a> {
    /// Recognized long option. `value` is set only for value-taking rows.
    Long {
        entry: &'t OptionEntry,
        value: Option<&'a str>,
    },
    /// Recognized short option.
    Short {
        flag: char,
        entry: ShortEntry,
        value: Option<&'a str>,
    },
    /// Scanning failed (strict mode only). No further events follow.
    Error(ParseError),
    /// Scanning finished; index of the first positional in the permuted argv.
    PositionalsBeginAt(usize),
}

/// Cursor into argv.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseState {
    /// Next argv index to read.
    pub index: usize,
    /// Short cluster being walked: argv index and byte offset of the next flag.
    pub cluster: Option<(usize, usize)>,
    /// Set once `--` (or, in require-order mode, a positional) was seen.
    pub terminated: bool,
}

/// Result of a finished scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    /// argv with options (and their values) first, positionals last.
    pub argv: Vec<String>,
    /// Index of the first positional in `argv`; `argv.len()` if none.
    pub first_positional: usize,
}

impl ScanOutcome {
    /// The positional arguments.
    pub fn positionals(&self) -> &[String] {
        &self.argv[self.first_positional..]
    }
}

/// Single-pass argv scanner.
///
/// # Examples
///
/// ```
/// use modopts_cmdline::{Event, OptionTable, ParserConfig, Scanner};
/// use modopts_core::{Module, ParameterCatalog, ParameterDescriptor};
///
/// let mut catalog = ParameterCatalog::new();
/// catalog.push(Module::new("http").with_param(ParameterDescriptor::string("bind")));
/// let config = ParserConfig::default();
/// let table = OptionTable::build(&catalog, &config).unwrap();
///
/// let argv: Vec<String> = ["prog", "file.mkv", "--bind=::1"].map(String::from).into();
/// let mut scanner = Scanner::new(&table, &argv, &config);
/// assert!(matches!(scanner.next(), Some(Event::Long { value: Some("::1"), .. })));
/// assert_eq!(scanner.next(), Some(Event::PositionalsBeginAt(2)));
/// assert_eq!(scanner.next(), None);
///
/// let outcome = scanner.finish();
/// assert_eq!(outcome.positionals(), ["file.mkv"]);
/// ```
#[derive(Debug)]
pub struct Scanner<'t, 'c, 'a> {
    table: &'t OptionTable<'c>,
    argv: &'a [String],
    config: &'t ParserConfig,
    state: ParseState,
    options: Vec<usize>,
    positionals: Vec<usize>,
    done: bool,
}

impl<'t, 'c, 'a> Scanner<'t, 'c, 'a> {
    /// Creates a scanner positioned after the program name.
    pub fn new(table: &'t OptionTable<'c>, argv: &'a [String], config: &'t ParserConfig) -> Self {
        Self {
            table,
            argv,
            config,
            state: ParseState {
                index: argv.len().min(1),
                ..ParseState::default()
            },
            options: Vec::new(),
            positionals: Vec::new(),
            done: false,
        }
    }

    /// Current cursor.
    pub fn state(&self) -> &ParseState {
        &self.state
    }

    /// Index the first positional will have once argv is permuted.
    fn first_positional(&self) -> usize {
        self.argv.len().min(1) + self.options.len()
    }

    /// Consumes the scanner and returns the permuted argv.
    ///
    /// Tokens not reached yet (after a strict-mode error) are kept in order
    /// after the positionals seen so far.
    pub fn finish(self) -> ScanOutcome {
        let first_positional = self.first_positional();
        let head = self.argv.len().min(1);
        let rest = (self.state.index..self.argv.len())
            .filter(|i| !self.positionals.contains(i) && !self.options.contains(i));
        let argv = (0..head)
            .chain(self.options.iter().copied())
            .chain(self.positionals.iter().copied())
            .chain(rest)
            .map(|i| self.argv[i].clone())
            .collect();
        ScanOutcome {
            argv,
            first_positional,
        }
    }

    fn fail(&mut self, err: ParseError) -> Option<Event<'t, 'a>> {
        if self.config.ignores_errors() {
            debug!(error = %err, "Ignoring command line error");
            return None;
        }
        self.done = true;
        Some(Event::Error(err))
    }

    fn take_value(&mut self) -> Option<&'a str> {
        let argv = self.argv;
        let value = argv.get(self.state.index)?;
        self.options.push(self.state.index);
        self.state.index += 1;
        Some(value.as_str())
    }

    fn scan_long(&mut self, token: &'a str, body: &'a str) -> Option<Event<'t, 'a>> {
        let (name, attached) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };

        let table = self.table;
        let entry = match table.lookup_long(name) {
            LongMatch::Exact(entry) | LongMatch::Abbreviated(entry) => entry,
            LongMatch::Ambiguous(candidates) => {
                return self.fail(ParseError::AmbiguousOption {
                    token: token.to_string(),
                    candidates: candidates.into_iter().map(String::from).collect(),
                });
            }
            LongMatch::NotFound => {
                return self.fail(ParseError::UnknownLongOption {
                    token: token.to_string(),
                });
            }
        };

        if !entry.takes_value {
            if let Some(value) = attached {
                debug!(option = %entry.name, value, "Dropping value given to a no-value option");
            }
            return Some(Event::Long { entry, value: None });
        }

        let value = match attached {
            Some(value) => value,
            None => match self.take_value() {
                Some(value) => value,
                None => {
                    return self.fail(ParseError::MissingValue {
                        option: token.to_string(),
                    });
                }
            },
        };
        Some(Event::Long {
            entry,
            value: Some(value),
        })
    }

    fn scan_short(&mut self, index: usize, offset: usize) -> Option<Event<'t, 'a>> {
        let argv = self.argv;
        let token: &'a str = &argv[index];
        let Some(flag) = token[offset..].chars().next() else {
            self.state.cluster = None;
            return None;
        };
        let next = offset + flag.len_utf8();
        self.state.cluster = (next < token.len()).then_some((index, next));

        let Some(entry) = self.table.short(flag) else {
            return self.fail(ParseError::UnknownShortOption { flag });
        };

        match entry.arity {
            ShortArity::Flag | ShortArity::Counter => Some(Event::Short {
                flag,
                entry,
                value: None,
            }),
            ShortArity::Value => match self.take_value() {
                Some(value) => Some(Event::Short {
                    flag,
                    entry,
                    value: Some(value),
                }),
                None => self.fail(ParseError::MissingValue {
                    option: format!("-{flag}"),
                }),
            },
        }
    }
}

impl<'t, 'c, 'a> Iterator for Scanner<'t, 'c, 'a> {
    type Item = Event<'t, 'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            if let Some((index, offset)) = self.state.cluster {
                if let Some(event) = self.scan_short(index, offset) {
                    return Some(event);
                }
                continue;
            }

            let argv = self.argv;
            let index = self.state.index;
            let Some(token) = argv.get(index) else {
                self.done = true;
                return Some(Event::PositionalsBeginAt(self.first_positional()));
            };
            let token = token.as_str();

            if self.state.terminated {
                self.positionals.push(index);
                self.state.index += 1;
                continue;
            }

            if token == "--" {
                self.options.push(index);
                self.state.index += 1;
                self.state.terminated = true;
                continue;
            }

            if let Some(body) = token.strip_prefix("--") {
                self.options.push(index);
                self.state.index += 1;
                if let Some(event) = self.scan_long(token, body) {
                    return Some(event);
                }
                continue;
            }

            if token.len() > 1 && token.starts_with('-') {
                self.options.push(index);
                self.state.index += 1;
                self.state.cluster = Some((index, 1));
                continue;
            }

            match self.config.ordering {
                ArgOrdering::Permute => {
                    self.positionals.push(index);
                    self.state.index += 1;
                }
                ArgOrdering::RequireOrder => self.state.terminated = true,
            }
        }
        None
    }
}
