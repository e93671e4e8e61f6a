//! CLI tests
//!
//! Argument parsing through clap plus end-to-end runs over temporary files.

use clap::Parser as ClapParser;
use lint_cli::{Cli, CliError, LintConfig, Outcome, Reporter, Runner};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::Level;

fn js_file(source: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".js").tempfile().unwrap();
    file.write_all(source.as_bytes()).unwrap();
    file
}

fn run_text(runner: &Runner, files: &[PathBuf]) -> (Outcome, String) {
    let mut out = Vec::new();
    let outcome = runner.run(files, Reporter::Text, &mut out).unwrap();
    (outcome, String::from_utf8(out).unwrap())
}

// =============================================================================
// Argument parsing
// =============================================================================

#[test]
fn test_parse_files_and_defaults() {
    let cli = Cli::try_parse_from(["corten-lint", "a.js", "b.js"]).unwrap();

    assert_eq!(cli.files, vec![PathBuf::from("a.js"), PathBuf::from("b.js")]);
    assert_eq!(cli.config, None);
    assert!(cli.options.is_empty());
    assert_eq!(cli.reporter, Reporter::Text);
    assert_eq!(cli.verbose, 0);
    assert_eq!(cli.log_level(), Level::WARN);
}

#[test]
fn test_parse_requires_a_file() {
    assert!(Cli::try_parse_from(["corten-lint"]).is_err());
}

#[test]
fn test_parse_config_and_repeated_options() {
    let cli = Cli::try_parse_from([
        "corten-lint",
        "--config",
        "lint.json",
        "-o",
        "undef=true",
        "--option",
        "-W033=true",
        "app.js",
    ])
    .unwrap();

    assert_eq!(cli.config, Some(PathBuf::from("lint.json")));
    assert_eq!(cli.options, vec!["undef=true", "-W033=true"]);
    assert_eq!(cli.files, vec![PathBuf::from("app.js")]);
}

#[test]
fn test_parse_reporter() {
    let cli = Cli::try_parse_from(["corten-lint", "--reporter", "json", "a.js"]).unwrap();
    assert_eq!(cli.reporter, Reporter::Json);

    assert!(Cli::try_parse_from(["corten-lint", "--reporter", "xml", "a.js"]).is_err());
}

#[test]
fn test_parse_verbosity() {
    let cli = Cli::try_parse_from(["corten-lint", "-vv", "a.js"]).unwrap();
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.log_level(), Level::DEBUG);

    let cli = Cli::try_parse_from(["corten-lint", "-v", "-v", "-v", "-v", "a.js"]).unwrap();
    assert_eq!(cli.log_level(), Level::TRACE);
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_from_cli_layers_overrides_on_config() {
    let mut config = NamedTempFile::new().unwrap();
    write!(
        config,
        r#"{{"options": {{"undef": true, "maxlen": 120}}, "globals": {{"app": false}}}}"#
    )
    .unwrap();
    let path = config.path().to_str().unwrap().to_string();

    let cli = Cli::try_parse_from([
        "corten-lint",
        "--config",
        path.as_str(),
        "-o",
        "maxlen=80",
        "a.js",
    ])
    .unwrap();
    let runner = Runner::from_cli(&cli).unwrap();
    let options = &runner.config().options;

    assert_eq!(options.len(), 2);
    assert_eq!(options.get("maxlen"), Some(&lint_core::OptionValue::Int(80)));
    assert!(runner.config().globals.is_some());
}

#[test]
fn test_missing_config_file() {
    let cli = Cli::try_parse_from([
        "corten-lint",
        "--config",
        "/nonexistent/lint.json",
        "a.js",
    ])
    .unwrap();
    assert!(matches!(Runner::from_cli(&cli), Err(CliError::Io { .. })));
}

#[test]
fn test_invalid_config_json() {
    let mut config = NamedTempFile::new().unwrap();
    write!(config, "{{ options: ").unwrap();

    let err = LintConfig::load(config.path()).unwrap_err();
    assert!(matches!(err, CliError::Config { .. }));
    assert!(err.to_string().starts_with("invalid config"));
}

#[test]
fn test_bad_override_fails_the_run() {
    let cli = Cli::try_parse_from(["corten-lint", "-o", "nosuch=true", "a.js"]).unwrap();
    let err = Runner::from_cli(&cli).unwrap_err();
    assert!(matches!(err, CliError::BadOption { .. }));
    assert!(err.to_string().contains("Bad option: 'nosuch'."));
}

// =============================================================================
// Runs
// =============================================================================

#[test]
fn test_clean_file() {
    let file = js_file("var a = 1;\na = a + 1;\n");
    let (outcome, output) = run_text(&Runner::default(), &[file.path().to_path_buf()]);

    assert_eq!(outcome, Outcome::Clean);
    assert_eq!(outcome.exit_code(), 0);
    assert!(output.is_empty());
}

#[test]
fn test_text_reporter() {
    let file = js_file("var a = 1\nvar b = 2;\n");
    let (outcome, output) = run_text(&Runner::default(), &[file.path().to_path_buf()]);
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(outcome, Outcome::Findings);
    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with(&format!("{}: line 1, col ", file.path().display())));
    assert!(lines[0].ends_with("Missing semicolon. (W033)"));
    assert_eq!(lines[1], "");
    assert_eq!(lines[2], "1 error");
}

#[test]
fn test_text_reporter_counts_across_files() {
    let first = js_file("var a = 1\nvar b = 2;\n");
    let second = js_file("foo();\n");
    let mut config = LintConfig::default();
    config.apply_override("undef=true").unwrap();

    let files = [first.path().to_path_buf(), second.path().to_path_buf()];
    let (outcome, output) = run_text(&Runner::new(config), &files);

    assert_eq!(outcome, Outcome::Findings);
    assert!(output.contains("'foo' is not defined. (W117)"));
    assert!(output.ends_with("\n2 errors\n"));
}

#[test]
fn test_json_reporter() {
    let file = js_file("var a = 1\nvar b = 2;\n");
    let mut out = Vec::new();
    let outcome = Runner::default()
        .run(&[file.path().to_path_buf()], Reporter::Json, &mut out)
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

    assert_eq!(outcome, Outcome::Findings);
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["report"]["success"], false);
    assert_eq!(entries[0]["report"]["diagnostics"][0]["code"], "W033");
    assert_eq!(entries[0]["report"]["diagnostics"][0]["line"], 1);
}

#[test]
fn test_ignore_override_silences_code() {
    let file = js_file("var a = 1\nvar b = 2;\n");
    let mut config = LintConfig::default();
    config.apply_override("-W033=true").unwrap();

    let (outcome, output) = run_text(&Runner::new(config), &[file.path().to_path_buf()]);
    assert_eq!(outcome, Outcome::Clean);
    assert!(output.is_empty());
}

#[test]
fn test_configured_globals_apply_to_every_file() {
    let first = js_file("app.start();\n");
    let second = js_file("app.stop();\n");
    let config: LintConfig =
        serde_json::from_str(r#"{"options": {"undef": true}, "globals": ["app"]}"#).unwrap();

    let files = [first.path().to_path_buf(), second.path().to_path_buf()];
    let (outcome, output) = run_text(&Runner::new(config), &files);
    assert_eq!(outcome, Outcome::Clean, "{output}");
}

#[test]
fn test_unreadable_file_stops_the_run() {
    let good = js_file("var a = 1;\n");
    let files = [good.path().to_path_buf(), PathBuf::from("/nonexistent/app.js")];
    let mut out = Vec::new();

    let err = Runner::default()
        .run(&files, Reporter::Text, &mut out)
        .unwrap_err();
    assert!(matches!(err, CliError::Io { ref path, .. } if path.ends_with("app.js")));
    assert!(out.is_empty());
}

#[test]
fn test_lint_source_in_memory() {
    let report = Runner::default().lint_source(Path::new("inline.js"), "debugger;");
    assert_eq!(report.file, PathBuf::from("inline.js"));
    assert_eq!(report.report.codes(), vec!["W087"]);
}
