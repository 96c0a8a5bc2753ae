use std::fs;
use std::path::Path;

use modopts_catalog::{CatalogError, CatalogLoader, Settings};
use modopts_cmdline::{ColorChoice, load_command_line_to};
use modopts_core::{Value, VariableStore};

const CORE_MODULE: &str = r#"
name: core
params:
  - name: General
    kind: hint
  - name: verbose
    kind: integer
    short: v
  - name: fullscreen
    kind: bool
    short: f
  - name: rate
    kind: integer
    min: 0
    max: 100
"#;

const HTTP_MODULE: &str = r#"{
  "name": "http",
  "params": [
    {"name": "bind", "kind": "string"},
    {"name": "http-legacy", "kind": "bool", "obsolete": true}
  ]
}"#;

const ALSA_MODULE: &str = r#"
name: alsa
params:
  - name: alsa-device
    kind: string
    short: f
"#;

fn seed_modules(dir: &Path) {
    fs::write(dir.join("00-core.yaml"), CORE_MODULE).unwrap();
    fs::write(dir.join("10-http.json"), HTTP_MODULE).unwrap();
    fs::write(dir.join("20-alsa.yml"), ALSA_MODULE).unwrap();
}

fn parse(
    catalog: &modopts_core::ParameterCatalog,
    settings: &Settings,
    args: &[&str],
) -> (VariableStore, String, bool) {
    let config = settings.parser.clone().with_color(ColorChoice::Never);
    let mut store = VariableStore::new();
    let mut stderr = Vec::new();
    let argv = std::iter::once("prog").chain(args.iter().copied());
    let ok = load_command_line_to(catalog, argv, &mut store, &config, &mut stderr).is_ok();
    (store, String::from_utf8(stderr).unwrap(), ok)
}

#[test]
fn directory_catalog_parses_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    seed_modules(dir.path());

    let catalog = CatalogLoader::from_dir(dir.path()).unwrap().into_catalog();
    assert_eq!(catalog.modules().len(), 3);

    let (store, stderr, ok) = parse(
        &catalog,
        &Settings::default(),
        &["-vv", "--bind", "::1", "--rate=250", "-f", "--http-legacy"],
    );
    assert!(ok);
    assert_eq!(store.value("verbose"), Some(&Value::Integer(2)));
    assert_eq!(store.value("bind"), Some(&Value::String("::1".into())));
    assert_eq!(store.clamped("rate"), Some(Value::Integer(100)));
    // core registered -f first
    assert_eq!(store.value("fullscreen"), Some(&Value::Bool(true)));
    assert!(store.get("alsa-device").is_none());
    assert_eq!(stderr, "Warning: Option --http-legacy no longer exists.\n");
}

#[test]
fn settings_filter_modules_before_parsing() {
    let dir = tempfile::tempdir().unwrap();
    let modules = dir.path().join("modules.d");
    fs::create_dir(&modules).unwrap();
    seed_modules(&modules);
    let settings_path = dir.path().join("settings.yaml");
    fs::write(
        &settings_path,
        "version: \"1.0\"\nexclude_modules: [core]\nparser:\n  errors: ignore\n",
    )
    .unwrap();

    let settings = Settings::load(&settings_path).unwrap();
    let mut catalog = CatalogLoader::from_dir(&modules).unwrap().into_catalog();
    assert_eq!(settings.apply(&mut catalog), 1);

    // With core gone, -f belongs to alsa and takes a value.
    let (store, stderr, ok) = parse(&catalog, &settings, &["-f", "hw:0", "--fullscreen"]);
    assert!(ok);
    assert!(stderr.is_empty());
    assert_eq!(store.value("alsa-device"), Some(&Value::String("hw:0".into())));
    assert!(store.get("fullscreen").is_none());
}

#[test]
fn builder_prefers_first_working_source() {
    let dir = tempfile::tempdir().unwrap();
    let modules = dir.path().join("modules.d");
    fs::create_dir(&modules).unwrap();
    seed_modules(&modules);
    let listing = dir.path().join("modules.json");
    fs::write(&listing, r#"{"modules": [{"name": "only"}]}"#).unwrap();

    let loader = CatalogLoader::builder()
        .from_dir(&modules)
        .from_file(&listing)
        .build()
        .unwrap();
    assert_eq!(loader.catalog().modules().len(), 3);

    let loader = CatalogLoader::builder()
        .from_dir(dir.path().join("missing"))
        .from_file(&listing)
        .build()
        .unwrap();
    assert_eq!(loader.catalog().modules()[0].name, "only");
}

#[test]
fn malformed_module_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("core.json"), "{\"name\": ").unwrap();
    assert!(matches!(
        CatalogLoader::from_dir(dir.path()),
        Err(CatalogError::Json(_))
    ));
}

#[test]
fn duplicate_short_flag_fails_validation_but_still_parses() {
    let dir = tempfile::tempdir().unwrap();
    seed_modules(dir.path());

    let loader = CatalogLoader::from_dir(dir.path()).unwrap();
    let catalog = loader.catalog().clone();
    let err = loader.validated().unwrap_err();
    assert!(err.to_string().contains("short flag -f"));

    let (_, _, ok) = parse(&catalog, &Settings::default(), &["-f"]);
    assert!(ok);
}
