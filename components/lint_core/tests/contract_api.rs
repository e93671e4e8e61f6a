//! Contract tests for the lint engine API
//!
//! These tests drive `lint()` end to end and check the report it returns.

use lint_core::{lint, LintReport, OptionSet, PredefinedGlobals, Severity, SourceInput};

fn run(source: &str, options: OptionSet) -> LintReport {
    lint(&SourceInput::from(source), &options, None)
}

fn codes(source: &str, options: OptionSet) -> Vec<String> {
    run(source, options)
        .diagnostics
        .into_iter()
        .map(|d| d.code)
        .collect()
}

fn clean(source: &str) -> bool {
    run(source, OptionSet::new()).diagnostics.is_empty()
}

// =============================================================================
// Run-level properties
// =============================================================================

#[test]
fn test_clean_program_has_no_diagnostics() {
    let source = r#"
function greet(name) {
  "use strict";
  var parts = ["Hello", name];
  for (var i = 0; i < parts.length; i += 1) {
    console.log(parts[i]);
  }
  return parts.join(" ");
}
greet("world");
"#;
    let report = run(source, OptionSet::new());
    assert!(report.success, "unexpected: {:?}", report.diagnostics);
    assert!(report.diagnostics.is_empty());
}

#[test]
fn test_modern_syntax_is_clean() {
    let source = r#"
const double = (x) => x * 2;
class Counter {
  constructor(start) {
    this.count = start;
  }
  increment() {
    this.count += 1;
    return this.count;
  }
}
let total = double(new Counter(1).increment());
total = `${total}!`;
"#;
    assert!(clean(source));
}

#[test]
fn test_runs_are_idempotent() {
    let source = "var a = 1\nif (a == null) b()\nfunction f(x, y) { return y }";
    let options = OptionSet::new().with("unused", true).with("curly", true);
    let first = run(source, options.clone());
    let second = run(source, options);
    assert_eq!(first, second);
    assert!(!first.diagnostics.is_empty());
}

#[test]
fn test_unrelated_option_keeps_other_diagnostics() {
    let source = "if (a) b = a | 1\nc()";
    let base = OptionSet::new().with("curly", true);
    let without = codes(source, base.clone());
    let with: Vec<String> = codes(source, base.with("bitwise", true))
        .into_iter()
        .filter(|code| code != "W016")
        .collect();
    assert_eq!(without, vec!["W116", "W033", "W033"]);
    assert_eq!(with, without);
}

#[test]
fn test_predefined_globals_map_and_list() {
    let map: PredefinedGlobals = serde_json::from_str(r#"{"app": false, "state": true}"#).unwrap();
    let source = SourceInput::from("app.run();\nstate = 1;");
    let options = OptionSet::new().with("undef", true);
    assert!(lint(&source, &options, Some(&map)).diagnostics.is_empty());

    let removed: PredefinedGlobals = serde_json::from_str(r#"["-Math"]"#).unwrap();
    let report = lint(&SourceInput::from("Math.max(1, 2);"), &options, Some(&removed));
    assert_eq!(report.codes(), vec!["W117"]);
}

// =============================================================================
// Semicolons
// =============================================================================

#[test]
fn test_missing_semicolon_before_newline() {
    let report = run("var a = 1\nvar b = 2;", OptionSet::new());
    assert_eq!(report.codes(), vec!["W033"]);
    assert_eq!(report.diagnostics[0].line, 1);
    assert_eq!(report.diagnostics[0].message, "Missing semicolon.");
}

#[test]
fn test_missing_semicolon_on_same_line_is_an_error() {
    let report = run("var a = 1 var b = 2;", OptionSet::new());
    assert_eq!(report.codes(), vec!["E058"]);
    assert_eq!(report.error_count(), 1);
}

#[test]
fn test_asi_and_lastsemic() {
    assert!(codes("var a = 1\nvar b = 2", OptionSet::new().with("asi", true)).is_empty());

    let source = "function f() { return 1 }\nf();";
    assert_eq!(codes(source, OptionSet::new()), vec!["W033"]);
    assert!(codes(source, OptionSet::new().with("lastsemic", true)).is_empty());
    // lastsemic only covers a brace on the same line
    let split = "function f() {\n  return 1\n}\nf();";
    assert_eq!(codes(split, OptionSet::new().with("lastsemic", true)), vec!["W033"]);
}

#[test]
fn test_empty_statement() {
    assert_eq!(codes("var a = 1;;", OptionSet::new()), vec!["W032"]);
}

// =============================================================================
// Scope: shadowing, unused, latedef, implied globals
// =============================================================================

#[test]
fn test_shadowing_in_same_function() {
    let source = "var a = 1; if (true) var a = 2;";
    let report = run(source, OptionSet::new());
    assert_eq!(report.codes(), vec!["W004"]);
    assert_eq!(report.diagnostics[0].message, "'a' is already defined.");
    assert!(codes(source, OptionSet::new().with("shadow", true)).is_empty());
}

#[test]
fn test_shadow_outer() {
    let source = "var a;\nfunction f() { var a = 1; return a; }\nf();\na = 2;";
    assert!(codes(source, OptionSet::new()).is_empty());
    let report = run(source, OptionSet::new().with("shadow", "outer"));
    assert_eq!(report.codes(), vec!["W123"]);
    assert_eq!(report.diagnostics[0].line, 2);
}

#[test]
fn test_unused_parameter_gradient() {
    let source = "function f(a, b, c) { return b; }\nf(1, 2, 3);";

    let last = run(source, OptionSet::new().with("unused", true));
    assert_eq!(last.codes(), vec!["W098"]);
    assert_eq!(last.diagnostics[0].message, "'c' is defined but never used.");

    let strict = run(source, OptionSet::new().with("unused", "strict"));
    let names: Vec<&str> = strict.diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(
        names,
        vec!["'a' is defined but never used.", "'c' is defined but never used."]
    );

    assert!(codes(source, OptionSet::new().with("unused", "vars")).is_empty());
}

#[test]
fn test_unused_list_is_filled_even_when_off() {
    let report = run("function f(a) { var b; }\nf();", OptionSet::new());
    assert!(report.diagnostics.is_empty());
    let names: Vec<&str> = report.unused.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn test_latedef_gradient() {
    let source = "fn();\nfunction fn() {}";
    assert!(codes(source, OptionSet::new()).is_empty());

    let all = run(source, OptionSet::new().with("latedef", true));
    assert_eq!(all.codes(), vec!["W003"]);
    assert_eq!(all.diagnostics[0].line, 2);

    assert!(codes(source, OptionSet::new().with("latedef", "nofunc")).is_empty());
    assert_eq!(
        codes("a = 1;\nvar a;", OptionSet::new().with("latedef", "nofunc")),
        vec!["W003"]
    );
}

#[test]
fn test_implied_globals_without_undef() {
    let report = run("foo(x);\nbar(x);", OptionSet::new());
    assert!(report.diagnostics.is_empty());

    let x = report.implieds.iter().find(|i| i.name == "x").unwrap();
    assert_eq!(x.lines, vec![1, 2]);
    let names: Vec<&str> = report.implieds.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["foo", "x", "bar"]);
}

#[test]
fn test_undef_reports_every_reference() {
    let report = run("foo(x);\nbar(x);", OptionSet::new().with("undef", true));
    assert_eq!(report.codes(), vec!["W117", "W117", "W117", "W117"]);
    assert!(report.implieds.is_empty());
    assert_eq!(report.diagnostics[1].message, "'x' is not defined.");
}

#[test]
fn test_later_declaration_resolves_reference() {
    let report = run("helper();\nfunction helper() {}", OptionSet::new().with("undef", true));
    assert!(report.diagnostics.is_empty());
    assert!(report.implieds.is_empty());
    assert_eq!(report.globals, vec!["helper"]);
}

#[test]
fn test_typeof_guard_is_not_undefined() {
    let options = OptionSet::new().with("undef", true);
    assert!(codes("var t = typeof missing;", options).is_empty());
}

#[test]
fn test_environment_options_predefine_names() {
    let source = "document.title = 'x';";
    assert_eq!(codes(source, OptionSet::new().with("undef", true)), vec!["W117"]);
    let browser = OptionSet::new().with("undef", true).with("browser", true);
    assert!(codes(source, browser).is_empty());
}

#[test]
fn test_block_var_used_out_of_scope() {
    let source = "function f() { { var x = 1; } return x; }\nf();";
    assert_eq!(codes(source, OptionSet::new()), vec!["W038"]);
    assert!(codes(source, OptionSet::new().with("funcscope", true)).is_empty());
}

#[test]
fn test_constant_and_redeclaration_errors() {
    assert_eq!(codes("const a = 1;\na = 2;", OptionSet::new()), vec!["E013"]);
    assert_eq!(codes("let a;\nlet a;", OptionSet::new()), vec!["E011"]);
    assert_eq!(codes("Math = 1;", OptionSet::new()), vec!["W020"]);
    assert_eq!(
        codes("try { f(); } catch (e) { e = 1; }", OptionSet::new()),
        vec!["W022"]
    );
}

// =============================================================================
// Directives and ignore lists
// =============================================================================

#[test]
fn test_directive_applies_only_inside_its_function() {
    let source = r#"
function a() {
  /* jshint curly:true */
  if (x) y();
}
function b() {
  if (x) y();
}
a(); b();
"#;
    let report = run(source, OptionSet::new());
    assert_eq!(report.codes(), vec!["W116"]);
    assert_eq!(report.diagnostics[0].line, 4);
}

#[test]
fn test_global_directive_governs_what_follows() {
    let source = "if (x) y();\n/* jshint curly:true */\nif (x) y();";
    let report = run(source, OptionSet::new());
    assert_eq!(report.codes(), vec!["W116"]);
    assert_eq!(report.diagnostics[0].line, 3);
}

#[test]
fn test_bad_directive_entry_is_a_configuration_diagnostic() {
    let report = run("/* jshint nosuch:true */\nvar a;", OptionSet::new());
    assert_eq!(report.codes(), vec!["E001"]);
    assert_eq!(report.diagnostics[0].line, 1);
    assert_eq!(report.diagnostics[0].message, "Bad option: 'nosuch'.");

    let base = run("var a;", OptionSet::new().with("nosuch", true));
    assert_eq!(base.codes(), vec!["E001"]);
    assert_eq!(base.diagnostics[0].line, 0);
}

#[test]
fn test_validthis_rejected_in_global_code() {
    assert_eq!(codes("/* jshint validthis:true */", OptionSet::new()), vec!["E009"]);
    let inside = "function f() {\n  /* jshint validthis:true */\n  return 1;\n}\nf();";
    assert!(codes(inside, OptionSet::new()).is_empty());
}

#[test]
fn test_ignore_code_option() {
    let options = OptionSet::new().with("-W033", true);
    assert!(codes("var a = 1\nvar b = 2", options).is_empty());
    assert_eq!(
        codes("/* jshint -W033 */\nvar a = 1\nvar b = 2;;", OptionSet::new()),
        vec!["W032"]
    );
}

#[test]
fn test_ignore_regions() {
    let source = "// jshint ignore:start\nvar a = 1\n// jshint ignore:end\nvar b = 2";
    let report = run(source, OptionSet::new());
    assert_eq!(report.codes(), vec!["W033"]);
    assert_eq!(report.diagnostics[0].line, 4);

    let line = "var a = 1 // jshint ignore:line\nvar b = 2;";
    assert!(codes(line, OptionSet::new()).is_empty());
}

#[test]
fn test_directive_globals() {
    let options = OptionSet::new().with("undef", true).with("unused", true);
    let report = run("/* global app, helper */\napp.run();", options);
    assert_eq!(report.codes(), vec!["W098"]);
    assert_eq!(report.diagnostics[0].message, "'helper' is defined but never used.");

    let exported = "/* exported main */\nfunction main() {}";
    assert!(codes(exported, OptionSet::new().with("unused", true)).is_empty());
}

// =============================================================================
// Metrics
// =============================================================================

#[test]
fn test_maxcomplexity() {
    let source = "function f(a) { if (a) { return 1; } return a && 2; }\nf(1);";
    let report = run(source, OptionSet::new().with("maxcomplexity", 1));
    assert_eq!(report.codes(), vec!["W074"]);
    assert_eq!(
        report.diagnostics[0].message,
        "This function's cyclomatic complexity is too high. (3)"
    );
    assert!(codes(source, OptionSet::new().with("maxcomplexity", 3)).is_empty());
    assert!(codes("function g() { return 1; }\ng();", OptionSet::new().with("maxcomplexity", 1)).is_empty());
}

#[test]
fn test_maxparams_and_maxstatements() {
    let source = "function f(a, b, c) {\n  var d = a + b;\n  return d + c;\n}\nf(1, 2, 3);";
    let params = run(source, OptionSet::new().with("maxparams", 2));
    assert_eq!(params.codes(), vec!["W072"]);
    assert_eq!((params.diagnostics[0].line, params.diagnostics[0].character), (1, 1));

    let statements = run(source, OptionSet::new().with("maxstatements", 1));
    assert_eq!(statements.codes(), vec!["W071"]);
    assert_eq!(
        statements.diagnostics[0].message,
        "This function has too many statements. (2)"
    );
}

#[test]
fn test_maxdepth_reports_each_violating_block_once() {
    let source = "function f(a) {\n  if (a) {\n    if (a) { a(); }\n    if (a) { a(); }\n  }\n}\nf();";
    let report = run(source, OptionSet::new().with("maxdepth", 1));
    assert_eq!(report.codes(), vec!["W073", "W073"]);
    assert_eq!(report.diagnostics[0].line, 3);
    assert_eq!(report.diagnostics[1].line, 4);
}

#[test]
fn test_function_records() {
    let source = "function outer(a) {\n  var inner = function () {};\n  return inner(a);\n}\nouter();";
    let report = run(source, OptionSet::new());
    let names: Vec<&str> = report.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["inner", "outer"]);

    let outer = &report.functions[1];
    assert_eq!(outer.line, 1);
    assert_eq!(outer.metrics.parameters, 1);
    assert_eq!(outer.metrics.statements, 2);
    assert_eq!(outer.metrics.complexity, 1);

    let anonymous = run("[1].map(function (x) { return x; });", OptionSet::new());
    assert_eq!(anonymous.functions[0].name, "(anonymous)");
}

#[test]
fn test_maxlen() {
    let source = "var a = 1;\nvar bb = 22222222;\n";
    let report = run(source, OptionSet::new().with("maxlen", 10));
    assert_eq!(report.codes(), vec!["W101"]);
    assert_eq!((report.diagnostics[0].line, report.diagnostics[0].character), (2, 18));
}

// =============================================================================
// Passfail
// =============================================================================

#[test]
fn test_passfail_stops_after_first_diagnostic() {
    let source = "var a = 1\nvar b = 2";
    let report = run(source, OptionSet::new().with("passfail", true));
    assert_eq!(report.codes(), vec!["W033", "E042"]);
    assert_eq!(report.diagnostics[1].message, "Stopping. (47% scanned).");
    assert!(!report.success);
}

// =============================================================================
// Inline checks
// =============================================================================

#[test]
fn test_curly() {
    let report = run("if (a) b();", OptionSet::new().with("curly", true));
    assert_eq!(report.codes(), vec!["W116"]);
    assert_eq!(report.diagnostics[0].message, "Expected '{' and instead saw 'b'.");
    assert!(codes("while (a) { b(); }", OptionSet::new().with("curly", true)).is_empty());
}

#[test]
fn test_equality_checks() {
    let strict = run("if (a == b) { f(); }", OptionSet::new().with("eqeqeq", true));
    assert_eq!(strict.codes(), vec!["W116"]);
    assert_eq!(strict.diagnostics[0].message, "Expected '===' and instead saw '=='.");

    let loose = run("if (a == null) { f(); }", OptionSet::new());
    assert_eq!(loose.codes(), vec!["W041"]);
    assert_eq!(loose.diagnostics[0].message, "Use '===' to compare with 'null'.");
    assert!(codes("if (a == null) { f(); }", OptionSet::new().with("eqnull", true)).is_empty());
    assert!(clean("if (a == b) { f(); }"));
    assert_eq!(codes("if (a === NaN) { f(); }", OptionSet::new()), vec!["W019"]);
}

#[test]
fn test_expression_statements() {
    assert_eq!(codes("a.b;", OptionSet::new()), vec!["W030"]);
    assert_eq!(codes("x;", OptionSet::new()), vec!["W030"]);
    assert!(codes("a.b;", OptionSet::new().with("expr", true)).is_empty());
    assert!(clean("a();\nb = 1;\ndelete a.b;\nc++;\n!d();"));
    assert!(clean("new Widget();"));
    assert_eq!(codes("new Widget();", OptionSet::new().with("nonew", true)), vec!["W031"]);
}

#[test]
fn test_unreachable_code() {
    let report = run("function f() {\n  return 1;\n  var x = 2;\n}\nf();", OptionSet::new());
    assert_eq!(report.codes(), vec!["W027"]);
    assert_eq!(report.diagnostics[0].message, "Unreachable 'var' after 'return'.");
    // hoisted function declarations are fine
    assert!(clean("function f() {\n  return g();\n  function g() { return 1; }\n}\nf();"));
}

#[test]
fn test_assignment_in_condition_and_return() {
    assert_eq!(codes("if (a = b) { f(); }", OptionSet::new()), vec!["W084"]);
    assert_eq!(codes("if ((a = b)) { f(); }", OptionSet::new()), vec!["W084"]);
    assert!(codes("if (a = b) { f(); }", OptionSet::new().with("boss", true)).is_empty());
    assert_eq!(
        codes("function f() { return a = 1; }\nf();", OptionSet::new()),
        vec!["W093"]
    );
}

#[test]
fn test_token_pattern_checks() {
    assert_eq!(codes("a = b & 1;", OptionSet::new().with("bitwise", true)), vec!["W016"]);
    assert_eq!(codes("a++;", OptionSet::new().with("plusplus", true)), vec!["W016"]);
    assert_eq!(codes("eval('x');", OptionSet::new()), vec!["W061"]);
    assert!(codes("eval('x');", OptionSet::new().with("evil", true)).is_empty());
    assert_eq!(codes("debugger;", OptionSet::new()), vec!["W087"]);
    assert!(codes("debugger;", OptionSet::new().with("debug", true)).is_empty());
    assert_eq!(
        codes("function f() { return arguments.callee; }\nf();", OptionSet::new().with("noarg", true)),
        vec!["W059"]
    );
    assert_eq!(codes("with (a) { b(); }", OptionSet::new()), vec!["W085"]);
    assert_eq!(codes("setTimeout('tick()', 10);", OptionSet::new()), vec!["W066"]);
    assert_eq!(codes("var f = new Function('return 1');", OptionSet::new()), vec!["W054"]);
    assert_eq!(codes("var n = new Number(1);", OptionSet::new()), vec!["W053"]);
    assert_eq!(codes("a['name'] = 1;", OptionSet::new()), vec!["W069"]);
    assert!(codes("a['name'] = 1;", OptionSet::new().with("sub", true)).is_empty());
    assert_eq!(codes("a.__proto__ = b;", OptionSet::new()), vec!["W103"]);
    assert_eq!(codes("var a = undefined;", OptionSet::new()), vec!["W080"]);
}

#[test]
fn test_constructor_naming() {
    let newcap = OptionSet::new().with("newcap", true);
    assert_eq!(codes("var w = new widget();", newcap.clone()), vec!["W055"]);
    assert_eq!(codes("var w = Widget();", newcap.clone()), vec!["W064"]);
    assert!(codes("var d = Date();", newcap).is_empty());
}

#[test]
fn test_for_in_filter() {
    let options = OptionSet::new().with("forin", true);
    let report = run("for (var k in o) { f(k); }", options.clone());
    assert_eq!(report.codes(), vec!["W089"]);
    assert_eq!(report.diagnostics[0].character, 1);
    assert!(codes("for (var k in o) { if (o.hasOwnProperty(k)) { f(k); } }", options).is_empty());
}

#[test]
fn test_loop_function() {
    let source = "for (var i = 0; i < 3; i += 1) { f(function () { return i; }); }";
    assert_eq!(codes(source, OptionSet::new()), vec!["W083"]);
    assert!(codes(source, OptionSet::new().with("loopfunc", true)).is_empty());
}

#[test]
fn test_labels() {
    assert!(clean("outer: for (;;) { break outer; }"));
    assert_eq!(codes("for (;;) { break nowhere; }", OptionSet::new()), vec!["W090"]);
}

#[test]
fn test_quotmark() {
    let single = OptionSet::new().with("quotmark", "single");
    assert_eq!(codes("var a = \"x\";", single), vec!["W109"]);
    let double = OptionSet::new().with("quotmark", "double");
    assert_eq!(codes("var a = 'x';", double), vec!["W108"]);
    let consistent = OptionSet::new().with("quotmark", true);
    assert_eq!(codes("var a = \"x\", b = 'y';", consistent.clone()), vec!["W110"]);
    assert!(codes("var a = 'x', b = 'y';", consistent).is_empty());
}

#[test]
fn test_script_urls_and_multistr() {
    assert_eq!(codes("var u = 'javascript:void(0)';", OptionSet::new()), vec!["W107"]);
    assert!(codes("var u = 'javascript:void(0)';", OptionSet::new().with("scripturl", true)).is_empty());
    assert_eq!(codes("var s = 'a\\\nb';", OptionSet::new()), vec!["W043"]);
    assert!(codes("var s = 'a\\\nb';", OptionSet::new().with("multistr", true)).is_empty());
}

#[test]
fn test_camelcase() {
    let options = OptionSet::new().with("camelcase", true);
    assert_eq!(codes("var first_name = 1;", options.clone()), vec!["W106"]);
    assert!(codes("var MAX_SIZE = 1, firstName = 2;", options).is_empty());
}

#[test]
fn test_empty_block() {
    assert!(clean("if (a) {}"));
    assert_eq!(codes("if (a) {}", OptionSet::new().with("noempty", true)), vec!["W035"]);
}

// =============================================================================
// Strict mode
// =============================================================================

#[test]
fn test_strict_directive_placement() {
    let global = "\"use strict\";\nfunction f() { return 1; }\nf();";
    assert_eq!(codes(global, OptionSet::new()), vec!["W097"]);
    assert!(codes(global, OptionSet::new().with("globalstrict", true)).is_empty());
    assert!(codes(global, OptionSet::new().with("node", true)).is_empty());

    let missing = run("function f() { return 1; }\nf();", OptionSet::new().with("strict", true));
    assert_eq!(missing.codes(), vec!["E007"]);
    assert_eq!(missing.diagnostics[0].severity, Severity::Error);

    let present = "function f() {\n  \"use strict\";\n  return 1;\n}\nf();";
    assert!(codes(present, OptionSet::new().with("strict", true)).is_empty());

    let twice = "function f() {\n  \"use strict\";\n  \"use strict\";\n}\nf();";
    assert_eq!(codes(twice, OptionSet::new()), vec!["W034"]);
}

#[test]
fn test_strict_violations() {
    let this_in_function = "function f() { \"use strict\"; return this; }\nf();";
    assert_eq!(codes(this_in_function, OptionSet::new()), vec!["W040"]);
    assert!(clean("function F() { \"use strict\"; this.a = 1; }\nF.call({});"));
    assert!(clean("function f() { return this; }\nf();"));

    let eval_write = "function f() { \"use strict\"; eval = 1; }\nf();";
    assert_eq!(codes(eval_write, OptionSet::new()), vec!["E008", "W020"]);

    let octal = "function f() { \"use strict\"; return 017; }\nf();";
    assert_eq!(codes(octal, OptionSet::new()), vec!["W115"]);
}

// =============================================================================
// Errors and recovery
// =============================================================================

#[test]
fn test_missing_closing_paren_recovers() {
    let report = run("foo(1, 2;\nbar();", OptionSet::new());
    assert_eq!(report.codes(), vec!["E021"]);
    assert_eq!(report.diagnostics[0].message, "Expected ')' and instead saw ';'.");
    // the statement after the error is still analysed
    assert_eq!(codes("foo(1, 2;\nvar a = 1\nb();", OptionSet::new()), vec!["E021", "W033"]);
}

#[test]
fn test_unmatched_bracket_at_end_of_input() {
    let report = run("foo(1, 2", OptionSet::new());
    assert_eq!(report.codes(), vec!["E019"]);
    assert_eq!((report.diagnostics[0].line, report.diagnostics[0].character), (1, 4));
    assert_eq!(report.diagnostics[0].message, "Unmatched '('.");
}

#[test]
fn test_stray_closing_brace() {
    assert_eq!(codes("a();\n}\nb();", OptionSet::new()), vec!["E024"]);
}

#[test]
fn test_bad_assignment() {
    assert_eq!(codes("1 = 2;", OptionSet::new()), vec!["E031"]);
}

#[test]
fn test_lex_error_recovers() {
    let report = run("var s = \"abc;\nfoo();", OptionSet::new());
    assert_eq!(report.codes(), vec!["E029", "W033"]);
    assert_eq!(report.diagnostics[0].message, "Unclosed string.");
}

// =============================================================================
// Templates, regular expressions and nesting
// =============================================================================

#[test]
fn test_template_followed_by_operator() {
    assert!(clean("var a = 1;\nvar s = `${a}` + 'x';"));
    assert!(clean("var a = 1;\nvar t = `x${a}y${a}z` + 'x';"));
    assert!(clean("var o = {};\nvar t = `${o.b}` + 'x';"));
}

#[test]
fn test_template_followed_by_argument() {
    assert!(clean("var a = 1;\nf(`${a}`, 1);"));
    assert!(clean("var a = 1;\nf(`${a}`, `${a}`);"));
}

#[test]
fn test_template_division() {
    assert!(clean("var a = 1;\nvar d = `${a}` / 2;"));
    assert!(clean("var a = 1;\nvar d = `${a / 2}` / 2;"));
}

#[test]
fn test_regex_after_block_brace() {
    assert!(clean("function f() {}\n/ab/.test('x');"));
    assert!(clean("if (x) { f(); }\n/ab/.test('x');"));
    assert!(clean("class A {}\n/ab/.test('x');"));
}

#[test]
fn test_regex_after_statement_head() {
    assert!(clean("if (x) /ab/.test(y);"));
    assert!(clean("while (x) /a/.exec(y);"));
    assert!(clean("for (;;) /a/g.exec(y);"));
}

#[test]
fn test_division_after_value_brace_and_paren() {
    assert!(clean("var o = {};\nvar n = (1) / 2;"));
    assert!(clean("var f = function () {} / 2;"));
}

#[test]
fn test_deep_nesting_stops_with_fatal_diagnostic() {
    for source in ["[".repeat(1000), "(".repeat(5000), "{".repeat(1000)] {
        let report = run(&source, OptionSet::new());
        assert!(!report.success);
        let last = report.diagnostics.last().map(|d| d.code.as_str());
        assert_eq!(last, Some("E041"), "{:?}", report.codes());
    }
}

#[test]
fn test_moderate_nesting_is_clean() {
    let source = format!("var a = {}1{};", "[".repeat(50), "]".repeat(50));
    assert!(clean(&source));
    let blocks = format!("{}f();{}", "{".repeat(50), "}".repeat(50));
    assert!(clean(&blocks));
    let chain: String = (0..300).map(|i| format!("if (x) {{ f({i}); }} else ")).collect();
    assert!(clean(&format!("{chain}{{ f(); }}")));
}

#[test]
fn test_labeled_statement_counts_once() {
    let labeled = run("function f(a) {\n  done: while (a) { break done; }\n}\nf();", OptionSet::new());
    let plain = run("function f(a) {\n  while (a) { break; }\n}\nf();", OptionSet::new());
    assert_eq!(
        labeled.functions[0].metrics.statements,
        plain.functions[0].metrics.statements
    );
    let limited = OptionSet::new().with("maxstatements", 2);
    assert!(codes("function f(a) {\n  done: while (a) { break done; }\n}\nf();", limited).is_empty());
}

#[test]
fn test_function_reference_to_later_block_var_is_out_of_scope() {
    // the reference sits outside the block, so it resolves when the block var
    // is hoisted and reports W038 rather than W003
    let source = "function f() {\n  g(x);\n  { var x = 1; }\n}\nf();";
    let report = run(source, OptionSet::new());
    assert_eq!(report.codes(), vec!["W038"]);
    assert_eq!(report.diagnostics[0].line, 2);
    assert_eq!(codes(source, OptionSet::new().with("latedef", true)), vec!["W038"]);
}
