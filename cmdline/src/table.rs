//! Option table construction.
//!
//! The option set is not known until the catalog is assembled, so the long
//! option table and the short option index are built at runtime, once per
//! parse. Every value-bearing descriptor gets one row; booleans get two more
//! rows (`no<name>` and `no-<name>`) pointing at the same parameter with the
//! `negated` bit set.
//!
//! Rows are kept in catalog order (module registration order, then
//! declaration order). Lookups go through a name index; the order only
//! matters for suggestion tie-breaks.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use modopts_core::{ParamKind, ParameterCatalog, ParameterDescriptor};
use tracing::{debug, warn};

use crate::config::ParserConfig;
use crate::error::CmdlineError;

/// Index of a parameter inside an [`OptionTable`].
pub type ParamId = usize;

/// One long-option row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEntry {
    /// Spelling accepted after `--`.
    pub name: String,
    /// Parameter this row binds to.
    pub param: ParamId,
    /// `true` for the `no`/`no-` spellings of a boolean.
    pub negated: bool,
    /// Whether the option consumes an argument.
    pub takes_value: bool,
    /// Copied from the descriptor; obsolete rows are never suggested.
    pub obsolete: bool,
}

/// How a short flag consumes argv.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortArity {
    /// Presence only.
    Flag,
    /// Takes the next argv token.
    Value,
    /// Verbosity counter: presence increments.
    Counter,
}

/// One short-option index entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortEntry {
    pub param: ParamId,
    pub arity: ShortArity,
}

/// Result of a long-name lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LongMatch<'t> {
    /// The name is a table row.
    Exact(&'t OptionEntry),
    /// The name is an unambiguous prefix of one parameter spelling.
    Abbreviated(&'t OptionEntry),
    /// The name prefixes rows of several parameters.
    Ambiguous(Vec<&'t str>),
    NotFound,
}

/// Parser-ready view of a [`ParameterCatalog`].
///
/// # Examples
///
/// ```
/// use modopts_cmdline::{LongMatch, OptionTable, ParserConfig};
/// use modopts_core::{Module, ParameterCatalog, ParameterDescriptor};
///
/// let mut catalog = ParameterCatalog::new();
/// catalog.push(
///     Module::new("core")
///         .with_param(ParameterDescriptor::boolean("audio"))
///         .with_param(ParameterDescriptor::string("bind")),
/// );
///
/// let table = OptionTable::build(&catalog, &ParserConfig::default()).unwrap();
/// let names: Vec<_> = table.entries().iter().map(|e| e.name.as_str()).collect();
/// assert_eq!(names, ["audio", "noaudio", "no-audio", "bind"]);
/// assert!(matches!(table.lookup_long("no-audio"), LongMatch::Exact(e) if e.negated));
/// ```
#[derive(Debug)]
pub struct OptionTable<'c> {
    params: Vec<&'c ParameterDescriptor>,
    entries: Vec<OptionEntry>,
    by_name: HashMap<String, usize>,
    shorts: HashMap<char, ShortEntry>,
    verbosity_flag: char,
}

impl<'c> OptionTable<'c> {
    /// Builds the long-option table and the short-option index.
    ///
    /// Hint entries are skipped. A short flag claimed twice keeps its first
    /// registration; the later one is dropped with a warning. A long name
    /// produced twice resolves to its first row.
    ///
    /// # Errors
    ///
    /// Returns [`CmdlineError::Allocation`] if the table storage cannot be
    /// reserved.
    pub fn build(
        catalog: &'c ParameterCatalog,
        config: &ParserConfig,
    ) -> Result<Self, CmdlineError> {
        let row_count = catalog.long_option_count();
        let param_count = catalog.params().filter(|p| p.is_value_bearing()).count();
        let short_count = catalog
            .params()
            .filter(|p| p.is_value_bearing() && p.short.is_some())
            .count();

        let mut entries: Vec<OptionEntry> = Vec::new();
        entries.try_reserve_exact(row_count)?;
        let mut by_name: HashMap<String, usize> = HashMap::new();
        by_name.try_reserve(row_count)?;
        let mut params: Vec<&'c ParameterDescriptor> = Vec::new();
        params.try_reserve_exact(param_count)?;
        let mut shorts: HashMap<char, ShortEntry> = HashMap::new();
        shorts.try_reserve(short_count)?;

        for module in catalog.modules() {
            for param in module.params.iter().filter(|p| p.is_value_bearing()) {
                let id = params.len();
                params.push(param);

                let mut push_row = |name: String, negated: bool| {
                    match by_name.entry(name.clone()) {
                        Entry::Occupied(existing) => {
                            debug!(
                                option = %name,
                                module = %module.name,
                                first_row = *existing.get(),
                                "long option already defined, first definition wins"
                            );
                        }
                        Entry::Vacant(slot) => {
                            slot.insert(entries.len());
                        }
                    }
                    entries.push(OptionEntry {
                        name,
                        param: id,
                        negated,
                        takes_value: !negated && param.takes_value(),
                        obsolete: param.obsolete,
                    });
                };

                push_row(param.name.clone(), false);
                if param.kind == ParamKind::Bool {
                    push_row(format!("no{}", param.name), true);
                    push_row(format!("no-{}", param.name), true);
                }

                if let Some(flag) = param.short {
                    let arity = if flag == config.verbosity_flag {
                        ShortArity::Counter
                    } else if param.kind == ParamKind::Bool {
                        ShortArity::Flag
                    } else {
                        ShortArity::Value
                    };
                    match shorts.entry(flag) {
                        Entry::Occupied(existing) => {
                            warn!(
                                flag = %flag,
                                kept = %params[existing.get().param].name,
                                dropped = %param.name,
                                "short option already registered, ignoring later registration"
                            );
                        }
                        Entry::Vacant(slot) => {
                            slot.insert(ShortEntry { param: id, arity });
                        }
                    }
                }
            }
        }

        debug!(
            modules = catalog.modules().len(),
            params = params.len(),
            rows = entries.len(),
            shorts = shorts.len(),
            "Built option table"
        );

        Ok(Self {
            params,
            entries,
            by_name,
            shorts,
            verbosity_flag: config.verbosity_flag,
        })
    }

    /// All long-option rows in catalog order.
    pub fn entries(&self) -> &[OptionEntry] {
        &self.entries
    }

    /// Number of long-option rows.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Descriptor behind a row or short entry.
    pub fn param(&self, id: ParamId) -> &'c ParameterDescriptor {
        self.params[id]
    }

    /// Number of distinct parameters in the table.
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Looks up a short flag.
    pub fn short(&self, flag: char) -> Option<ShortEntry> {
        self.shorts.get(&flag).copied()
    }

    /// The flag treated as verbosity counter.
    pub fn verbosity_flag(&self) -> char {
        self.verbosity_flag
    }

    /// Resolves a long option name.
    ///
    /// Exact names always win. Otherwise the name is accepted as an
    /// abbreviation when every row it prefixes belongs to the same parameter
    /// with the same polarity (so `--no` resolves when the catalog holds a
    /// single boolean).
    pub fn lookup_long(&self, name: &str) -> LongMatch<'_> {
        if let Some(&row) = self.by_name.get(name) {
            return LongMatch::Exact(&self.entries[row]);
        }
        if name.is_empty() {
            return LongMatch::NotFound;
        }

        let mut found: Option<&OptionEntry> = None;
        let mut candidates = Vec::new();
        let mut ambiguous = false;
        for entry in self.entries.iter().filter(|e| e.name.starts_with(name)) {
            match found {
                None => found = Some(entry),
                Some(first) if first.param == entry.param && first.negated == entry.negated => {}
                Some(_) => ambiguous = true,
            }
            candidates.push(entry.name.as_str());
        }

        match found {
            None => LongMatch::NotFound,
            Some(_) if ambiguous => LongMatch::Ambiguous(candidates),
            Some(entry) => LongMatch::Abbreviated(entry),
        }
    }
}
