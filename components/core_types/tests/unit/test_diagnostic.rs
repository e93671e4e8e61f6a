//! Unit tests for Diagnostic serialization and display

use core_types::{Diagnostic, ErrorKind, Severity, SourcePosition};

#[test]
fn test_diagnostic_display_includes_code() {
    let diag = Diagnostic::new(4, 1, "W087", "Forgotten 'debugger' statement?", ErrorKind::Semantic);
    assert_eq!(
        diag.to_string(),
        "line 4, col 1, Forgotten 'debugger' statement? (W087)"
    );
}

#[test]
fn test_diagnostic_serializes_lowercase_enums() {
    let diag = Diagnostic::new(1, 5, "E024", "Unexpected '#'.", ErrorKind::Lex);
    let json = serde_json::to_value(&diag).unwrap();
    assert_eq!(json["severity"], "error");
    assert_eq!(json["kind"], "lex");
    assert_eq!(json["line"], 1);
}

#[test]
fn test_diagnostic_roundtrips_through_json() {
    let diag = Diagnostic::new(9, 3, "I001", "Comma warnings can be turned off.", ErrorKind::Syntax);
    let text = serde_json::to_string(&diag).unwrap();
    let back: Diagnostic = serde_json::from_str(&text).unwrap();
    assert_eq!(back, diag);
    assert_eq!(back.severity, Severity::Info);
}

#[test]
fn test_source_position_default_is_run_level() {
    assert!(SourcePosition::default().is_run_level());
}
