mod output;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use modopts_catalog::{CatalogLoader, Settings};
use modopts_cmdline::{
    ArgOrdering, CmdlineError, ColorChoice, ErrorMode, OptionTable, load_command_line, suggest,
};
use modopts_core::{ParameterCatalog, VariableStore, validate_catalog};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::output::{OutputFormat, ParseReport, format_options, format_report, option_rows};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "MODOPTS_LOG";

#[derive(Debug, Parser)]
#[command(name = "modopts")]
#[command(
    version,
    about = "Inspect module parameter catalogs and parse command lines against them"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a command line against a catalog and print the resulting variables.
    Parse(ParseArgs),
    /// List every option spelling a catalog produces.
    Options(OptionsArgs),
    /// Check one or more catalogs for structural problems.
    Validate(ValidateArgs),
    /// Print the option closest to a misspelled name.
    Suggest(SuggestArgs),
}

#[derive(Debug, Args)]
struct CatalogArgs {
    /// Catalog file or directory of module files. Repeat to add fallbacks.
    #[arg(long = "catalog", required = true)]
    catalogs: Vec<PathBuf>,
    /// YAML settings file (parser behavior and module filter).
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ParseArgs {
    #[command(flatten)]
    catalog: CatalogArgs,
    /// Skip unknown options and missing values instead of failing.
    #[arg(long)]
    ignore_unknown: bool,
    /// Stop at the first positional argument instead of permuting.
    #[arg(long)]
    require_order: bool,
    /// Colorize diagnostics.
    #[arg(long)]
    color: Option<ColorChoice>,
    /// Name reported as argv[0].
    #[arg(long, default_value = "modopts")]
    program_name: String,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Command line to parse, after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct OptionsArgs {
    #[command(flatten)]
    catalog: CatalogArgs,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Catalog files and/or directories of module files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct SuggestArgs {
    #[command(flatten)]
    catalog: CatalogArgs,
    /// Minimum similarity (0.0-1.0) a suggestion must reach.
    #[arg(long)]
    threshold: Option<f64>,
    /// Misspelled option name, with or without leading dashes.
    #[arg(allow_hyphen_values = true)]
    name: String,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Options(args) => run_options(args),
        Command::Validate(args) => run_validate(args),
        Command::Suggest(args) => run_suggest(args),
    };

    match result {
        Ok(()) => {}
        Err(Failure::Reported) => std::process::exit(1),
        Err(Failure::Message(err)) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

/// Why a subcommand failed.
#[derive(Debug)]
enum Failure {
    /// The diagnostics are already on stderr.
    Reported,
    Message(String),
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Failure::Message(message)
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

fn run_parse(args: ParseArgs) -> Result<(), Failure> {
    let (catalog, settings) = load_catalog(&args.catalog)?;

    let mut config = settings.parser;
    if args.ignore_unknown {
        config.errors = ErrorMode::Ignore;
    }
    if args.require_order {
        config.ordering = ArgOrdering::RequireOrder;
    }
    if let Some(color) = args.color {
        config.color = color;
    }

    let argv = std::iter::once(args.program_name).chain(args.args);
    let mut store = VariableStore::new();
    let cmdline = load_command_line(&catalog, argv, &mut store, &config).map_err(|e| match e {
        CmdlineError::Parse(_) => Failure::Reported,
        other => Failure::Message(other.to_string()),
    })?;

    let report = ParseReport::new(&store, &cmdline);
    print!("{}", ensure_newline(format_report(&report, args.format)?));
    Ok(())
}

fn run_options(args: OptionsArgs) -> Result<(), Failure> {
    let (catalog, settings) = load_catalog(&args.catalog)?;
    let table = OptionTable::build(&catalog, &settings.parser).map_err(|e| e.to_string())?;
    let rows = option_rows(&table);
    print!("{}", ensure_newline(format_options(&rows, args.format)?));
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), Failure> {
    let mut invalid = 0usize;
    let mut modules = 0usize;

    for path in &args.inputs {
        let catalog = load_path(path)?.into_catalog();
        modules += catalog.modules().len();
        let problems = validate_catalog(&catalog);
        for problem in &problems {
            eprintln!("{}: {problem}", path.display());
        }
        if !problems.is_empty() {
            invalid += 1;
        }
    }

    if invalid > 0 {
        return Err(format!(
            "{invalid} of {} catalog(s) failed validation",
            args.inputs.len()
        )
        .into());
    }
    println!(
        "Validated {} catalog(s) with {modules} module(s).",
        args.inputs.len()
    );
    Ok(())
}

fn run_suggest(args: SuggestArgs) -> Result<(), Failure> {
    let (catalog, settings) = load_catalog(&args.catalog)?;
    let threshold = args
        .threshold
        .unwrap_or(settings.parser.suggestion_threshold);
    let table = OptionTable::build(&catalog, &settings.parser).map_err(|e| e.to_string())?;

    let name = args.name.trim_start_matches('-');
    let name = name.split_once('=').map_or(name, |(name, _)| name);
    match suggest(name, &table, threshold) {
        Some(suggestion) => {
            println!("--{} ({:.3})", suggestion.name, suggestion.score);
            Ok(())
        }
        None => Err(format!("no option resembles '{}'", args.name).into()),
    }
}

/// Loads the catalog chain and applies the settings' module filter.
fn load_catalog(args: &CatalogArgs) -> Result<(ParameterCatalog, Settings), String> {
    let settings = match &args.settings {
        Some(path) => Settings::load(path)
            .map_err(|err| format!("Failed to load settings '{}': {err}", path.display()))?,
        None => Settings::default(),
    };

    let mut catalog = match args.catalogs.as_slice() {
        [single] => load_path(single)?.into_catalog(),
        many => {
            let builder = many.iter().fold(CatalogLoader::builder(), |builder, path| {
                if path.is_dir() {
                    builder.from_dir(path)
                } else {
                    builder.from_file(path)
                }
            });
            builder.build().map_err(|e| e.to_string())?.into_catalog()
        }
    };

    let removed = settings.apply(&mut catalog);
    debug!(modules = catalog.modules().len(), removed, "Catalog ready");
    Ok((catalog, settings))
}

fn load_path(path: &Path) -> Result<CatalogLoader, String> {
    let loaded = if path.is_dir() {
        CatalogLoader::from_dir(path)
    } else {
        CatalogLoader::from_file(path)
    };
    loaded.map_err(|err| format!("Failed to load catalog '{}': {err}", path.display()))
}

fn ensure_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
