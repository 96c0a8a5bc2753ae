use modopts_cmdline::{
    CmdlineError, ColorChoice, OptionTable, ParseError, ParserConfig, SUGGESTION_THRESHOLD,
    load_command_line_to, suggest,
};
use modopts_core::{Module, ParameterCatalog, ParameterDescriptor, Value, VariableStore};

fn media_catalog() -> ParameterCatalog {
    let mut catalog = ParameterCatalog::new();
    catalog.push(
        Module::new("core")
            .with_param(ParameterDescriptor::hint("General"))
            .with_param(ParameterDescriptor::integer("verbose").with_short('v'))
            .with_param(ParameterDescriptor::boolean("video").with_description("Enable video"))
            .with_param(ParameterDescriptor::boolean("fullscreen").with_short('f'))
            .with_param(ParameterDescriptor::integer("rate").with_range(0, 100))
            .with_param(ParameterDescriptor::float("zoom").with_range(0.25, 4.0))
            .with_param(ParameterDescriptor::string("config").with_short('c')),
    );
    catalog.push(
        Module::new("http")
            .with_param(ParameterDescriptor::hint("HTTP server"))
            .with_param(ParameterDescriptor::string("bind"))
            .with_param(ParameterDescriptor::boolean("http-legacy").deprecated())
            .with_param(
                ParameterDescriptor::string("http-old-root")
                    .with_short('o')
                    .deprecated(),
            ),
    );
    catalog
}

fn plain() -> ParserConfig {
    ParserConfig::default().with_color(ColorChoice::Never)
}

struct Run {
    result: Result<modopts_cmdline::CommandLine, CmdlineError>,
    store: VariableStore,
    stderr: String,
}

fn run(args: &[&str], config: &ParserConfig) -> Run {
    let catalog = media_catalog();
    let mut store = VariableStore::new();
    let mut stderr = Vec::new();
    let argv = std::iter::once("vlc").chain(args.iter().copied());
    let result = load_command_line_to(&catalog, argv, &mut store, config, &mut stderr);
    Run {
        result,
        store,
        stderr: String::from_utf8(stderr).unwrap(),
    }
}

// ---------------------------------------------------------------------------
// Table shape
// ---------------------------------------------------------------------------

#[test]
fn table_size_is_value_bearing_plus_two_per_boolean() {
    let catalog = media_catalog();
    let table = OptionTable::build(&catalog, &plain()).unwrap();

    let value_bearing = catalog.params().filter(|p| p.is_value_bearing()).count();
    let booleans = catalog
        .params()
        .filter(|p| p.kind == modopts_core::ParamKind::Bool)
        .count();
    assert_eq!(table.len(), value_bearing + 2 * booleans);
}

#[test]
fn empty_catalog_parses_positionals_only() {
    let catalog = ParameterCatalog::new();
    let mut store = VariableStore::new();
    let mut stderr = Vec::new();
    let argv = ["vlc", "a", "b"];
    let cmdline = load_command_line_to(&catalog, argv, &mut store, &plain(), &mut stderr).unwrap();
    assert_eq!(cmdline.first_positional, 1);
    assert_eq!(cmdline.positionals(), ["a", "b"]);
    assert!(store.is_empty());
}

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

#[test]
fn boolean_spellings_bind_the_same_variable() {
    for (arg, expected) in [("--video", true), ("--novideo", false), ("--no-video", false)] {
        let run = run(&[arg], &plain());
        run.result.unwrap();
        assert_eq!(run.store.len(), 1, "{arg}");
        assert_eq!(run.store.value("video"), Some(&Value::Bool(expected)), "{arg}");
    }
}

#[test]
fn attached_and_separate_values_are_equivalent() {
    let a = run(&["--bind=127.0.0.1", "extra"], &plain());
    let b = run(&["--bind", "127.0.0.1", "extra"], &plain());

    assert_eq!(a.store, b.store);
    assert_eq!(
        a.store.value("bind"),
        Some(&Value::String("127.0.0.1".to_string()))
    );
    assert_eq!(a.result.unwrap().positionals(), ["extra"]);
    assert_eq!(b.result.unwrap().positionals(), ["extra"]);
}

#[test]
fn verbosity_accumulates_within_one_parse() {
    let clustered = run(&["-vvv"], &plain());
    assert_eq!(clustered.store.value("verbose"), Some(&Value::Integer(3)));

    let separate = run(&["-v", "-v", "-v"], &plain());
    assert_eq!(separate.store.value("verbose"), Some(&Value::Integer(3)));
}

#[test]
fn long_verbose_takes_a_value() {
    let run = run(&["--verbose", "2", "-v"], &plain());
    // The counter is independent of the long spelling.
    assert_eq!(run.store.value("verbose"), Some(&Value::Integer(1)));
}

#[test]
fn integer_bounds_are_propagated_not_applied() {
    let run = run(&["--rate", "500"], &plain());
    let var = run.store.get("rate").unwrap();
    assert_eq!(var.value, Value::Integer(500));
    let range = var.range.as_ref().unwrap();
    assert_eq!((range.min.clone(), range.max.clone()), (Value::Integer(0), Value::Integer(100)));
    assert_eq!(run.store.clamped("rate"), Some(Value::Integer(100)));
}

#[test]
fn float_parsing_is_locale_independent_and_permissive() {
    let ok = run(&["--zoom=1.5"], &plain());
    assert_eq!(ok.store.value("zoom"), Some(&Value::Float(1.5)));

    let comma = run(&["--zoom", "1,5"], &plain());
    comma.result.unwrap();
    assert_eq!(comma.store.value("zoom"), Some(&Value::Float(1.0)));
}

#[test]
fn malformed_integer_degrades_to_zero() {
    let run = run(&["--rate", "fast"], &plain());
    run.result.unwrap();
    assert_eq!(run.store.value("rate"), Some(&Value::Integer(0)));
}

#[test]
fn last_occurrence_wins() {
    let run = run(
        &["--config", "a.ini", "-c", "b.ini", "--fullscreen", "--no-fullscreen"],
        &plain(),
    );
    assert_eq!(run.store.value("config"), Some(&Value::String("b.ini".into())));
    assert_eq!(run.store.value("fullscreen"), Some(&Value::Bool(false)));
}

#[test]
fn obsolete_options_warn_and_bind_nothing() {
    let run = run(&["--http-legacy", "--http-old-root", "/srv", "file"], &plain());
    let cmdline = run.result.unwrap();
    assert!(run.store.is_empty());
    assert_eq!(cmdline.positionals(), ["file"]);
    assert_eq!(
        run.stderr,
        "Warning: Option --http-legacy no longer exists.\n\
         Warning: Option --http-old-root no longer exists.\n"
    );
}

#[test]
fn obsolete_warning_names_the_long_option_for_every_spelling() {
    let run = run(&["-o", "/srv", "--no-http-legacy", "file"], &plain());
    let cmdline = run.result.unwrap();
    assert!(run.store.is_empty());
    assert_eq!(cmdline.positionals(), ["file"]);
    assert_eq!(
        run.stderr,
        "Warning: Option --http-old-root no longer exists.\n\
         Warning: Option --http-legacy no longer exists.\n"
    );
}

#[test]
fn parsing_is_idempotent() {
    let args = ["-vv", "--rate=7", "--no-video", "x", "--zoom", "2"];
    let first = run(&args, &plain());
    let second = run(&args, &plain());
    assert_eq!(first.store, second.store);
    assert_eq!(first.result.unwrap(), second.result.unwrap());
}

// ---------------------------------------------------------------------------
// Positionals
// ---------------------------------------------------------------------------

#[test]
fn double_dash_makes_everything_positional() {
    let run = run(&["--", "--not-an-option"], &plain());
    let cmdline = run.result.unwrap();
    assert_eq!(cmdline.positionals(), ["--not-an-option"]);
    assert!(run.store.is_empty());
}

#[test]
fn first_positional_is_argc_without_positionals() {
    let run = run(&["-f", "--rate", "3"], &plain());
    let cmdline = run.result.unwrap();
    assert_eq!(cmdline.first_positional, cmdline.argv.len());
    assert_eq!(cmdline.first_positional, 4);
}

// ---------------------------------------------------------------------------
// Errors and suggestions
// ---------------------------------------------------------------------------

#[test]
fn unknown_long_option_suggests_closest_name() {
    let run = run(&["--vidoe"], &plain());
    assert!(matches!(
        run.result,
        Err(CmdlineError::Parse(ParseError::UnknownLongOption { ref token })) if token == "--vidoe"
    ));
    assert_eq!(
        run.stderr,
        "Error: Unknown option '--vidoe'\n       Did you mean --video?\nFor more information try --help\n"
    );
}

#[test]
fn unrelated_unknown_option_has_no_suggestion() {
    let run = run(&["--xyz123"], &plain());
    assert!(run.result.is_err());
    assert_eq!(
        run.stderr,
        "Error: Unknown option '--xyz123'\nFor more information try --help\n"
    );

    let catalog = media_catalog();
    let table = OptionTable::build(&catalog, &plain()).unwrap();
    assert!(suggest("xyz123", &table, SUGGESTION_THRESHOLD).is_none());
}

#[test]
fn obsolete_names_are_never_suggested() {
    let run = run(&["--http-legacyy"], &plain());
    assert!(!run.stderr.contains("Did you mean --http-legacy?"));
}

#[test]
fn missing_value_is_reported() {
    let long = run(&["--bind"], &plain());
    assert!(long.result.is_err());
    assert_eq!(
        long.stderr,
        "Error: Missing mandatory value for option --bind\nFor more information try --help\n"
    );

    let short = run(&["-c"], &plain());
    assert!(short.stderr.starts_with("Error: Missing mandatory value for option -c\n"));
}

#[test]
fn unknown_short_option_is_reported() {
    let run = run(&["-fz"], &plain());
    assert!(matches!(
        run.result,
        Err(CmdlineError::Parse(ParseError::UnknownShortOption { flag: 'z' }))
    ));
    // Options before the error were applied.
    assert_eq!(run.store.value("fullscreen"), Some(&Value::Bool(true)));
}

#[test]
fn ignore_mode_swallows_errors_and_reports_positional_index() {
    let config = plain().ignoring_errors();
    let run = run(&["--vidoe", "movie.mkv", "-z", "--rate", "5", "--bind"], &config);
    let cmdline = run.result.unwrap();
    assert!(run.stderr.is_empty());
    assert_eq!(run.store.value("rate"), Some(&Value::Integer(5)));
    assert_eq!(cmdline.positionals(), ["movie.mkv"]);
    assert_eq!(cmdline.first_positional, 6);
}

#[test]
fn require_order_leaves_later_options_alone() {
    let config = plain().require_order();
    let run = run(&["-f", "movie.mkv", "--rate", "5"], &config);
    let cmdline = run.result.unwrap();
    assert_eq!(cmdline.positionals(), ["movie.mkv", "--rate", "5"]);
    assert!(run.store.get("rate").is_none());
}

#[test]
fn ambiguous_abbreviation_is_reported() {
    let run = run(&["--no"], &plain());
    assert!(matches!(
        run.result,
        Err(CmdlineError::Parse(ParseError::AmbiguousOption { .. }))
    ));
    assert!(run.stderr.starts_with("Error: Ambiguous option '--no' (could be --novideo, "));
}
