//! Option catalogue and the overlay-stack registry that resolves option values.
//!
//! The catalogue is a process-wide immutable table describing every switch
//! the engine understands. The [`OptionRegistry`] owns one run's effective
//! configuration: an immutable base layer plus a stack of overlays that
//! directive comments write into. An overlay is pushed when a function body
//! opens and popped when it closes, so a directive inside a function only
//! affects that function.

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;
use thiserror::Error;

/// The value of one option.
///
/// Deserializes from plain JSON: `true`, `80`, `"nofunc"`, `["a", "b"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Boolean switch
    Bool(bool),
    /// Positive integer limit (maxlen, maxparams, ...)
    Int(u32),
    /// Graded level such as `"nofunc"` or `"strict"`
    Str(String),
    /// Set of names
    Set(BTreeSet<String>),
}

static DISABLED: OptionValue = OptionValue::Bool(false);

impl OptionValue {
    /// Whether the option is switched on at all
    pub fn is_truthy(&self) -> bool {
        match self {
            OptionValue::Bool(b) => *b,
            OptionValue::Int(n) => *n > 0,
            OptionValue::Str(s) => !s.is_empty() && s != "false",
            OptionValue::Set(names) => !names.is_empty(),
        }
    }

    /// The graded level, if the value is a string
    pub fn as_level(&self) -> Option<&str> {
        match self {
            OptionValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The integer limit, if the value is one
    pub fn as_limit(&self) -> Option<u32> {
        match self {
            OptionValue::Int(n) if *n > 0 => Some(*n),
            _ => None,
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<u32> for OptionValue {
    fn from(value: u32) -> Self {
        OptionValue::Int(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Str(value.to_string())
    }
}

/// The value type an option accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// `true` / `false`
    Bool,
    /// A positive integer, or `false` to unset
    Int,
    /// `true` / `false` or one of the listed levels
    Graded(&'static [&'static str]),
}

/// Rough grouping used by documentation and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionCategory {
    /// Turns additional checks on
    Enforcing,
    /// Tolerates something reported by default
    Relaxing,
    /// Adds a predefined global set
    Environment,
}

/// One entry of the option catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    /// Option name as written in configuration and directives
    pub name: &'static str,
    /// Accepted value type
    pub kind: OptionKind,
    /// Grouping
    pub category: OptionCategory,
}

const fn spec(name: &'static str, kind: OptionKind, category: OptionCategory) -> OptionSpec {
    OptionSpec {
        name,
        kind,
        category,
    }
}

use OptionCategory::{Enforcing, Environment, Relaxing};
use OptionKind::{Bool, Graded, Int};

/// Every option the engine understands. All options default to `false`.
pub const CATALOG: &[OptionSpec] = &[
    spec("bitwise", Bool, Enforcing),
    spec("camelcase", Bool, Enforcing),
    spec("curly", Bool, Enforcing),
    spec("eqeqeq", Bool, Enforcing),
    spec("forin", Bool, Enforcing),
    spec("globalstrict", Bool, Enforcing),
    spec("latedef", Graded(&["nofunc"]), Enforcing),
    spec("maxcomplexity", Int, Enforcing),
    spec("maxdepth", Int, Enforcing),
    spec("maxlen", Int, Enforcing),
    spec("maxparams", Int, Enforcing),
    spec("maxstatements", Int, Enforcing),
    spec("newcap", Bool, Enforcing),
    spec("noarg", Bool, Enforcing),
    spec("noempty", Bool, Enforcing),
    spec("nonew", Bool, Enforcing),
    spec("plusplus", Bool, Enforcing),
    spec("quotmark", Graded(&["single", "double"]), Enforcing),
    spec("strict", Bool, Enforcing),
    spec("undef", Bool, Enforcing),
    spec("unused", Graded(&["vars", "strict"]), Enforcing),
    spec("asi", Bool, Relaxing),
    spec("boss", Bool, Relaxing),
    spec("debug", Bool, Relaxing),
    spec("eqnull", Bool, Relaxing),
    spec("evil", Bool, Relaxing),
    spec("expr", Bool, Relaxing),
    spec("funcscope", Bool, Relaxing),
    spec("lastsemic", Bool, Relaxing),
    spec("loopfunc", Bool, Relaxing),
    spec("multistr", Bool, Relaxing),
    spec("passfail", Bool, Relaxing),
    spec("proto", Bool, Relaxing),
    spec("scripturl", Bool, Relaxing),
    spec("shadow", Graded(&["inner", "outer"]), Relaxing),
    spec("sub", Bool, Relaxing),
    spec("supernew", Bool, Relaxing),
    spec("validthis", Bool, Relaxing),
    spec("withstmt", Bool, Relaxing),
    spec("browser", Bool, Environment),
    spec("devel", Bool, Environment),
    spec("jquery", Bool, Environment),
    spec("node", Bool, Environment),
    spec("nonstandard", Bool, Environment),
    spec("worker", Bool, Environment),
];

/// Look an option up in the catalogue
pub fn lookup(name: &str) -> Option<&'static OptionSpec> {
    CATALOG.iter().find(|spec| spec.name == name)
}

/// Whether `name` is an environment option (adds predefined globals)
pub fn is_environment(name: &str) -> bool {
    lookup(name).map_or(false, |spec| spec.category == Environment)
}

/// An option that, when switched on, switches another one on as well.
struct Implication {
    trigger: &'static str,
    implies: &'static str,
}

/// Side effects applied whenever the trigger becomes truthy. An explicit
/// `false` for the implied option anywhere in the active layers wins.
const IMPLICATIONS: &[Implication] = &[Implication {
    trigger: "globalstrict",
    implies: "strict",
}];

/// A rejected configuration entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The name is not in the catalogue
    #[error("Bad option: '{0}'.")]
    UnknownOption(String),
    /// The value does not fit the option's type
    #[error("Bad option value.")]
    BadValue(String),
    /// An integer option got something other than a positive integer or `false`
    #[error("Expected a small integer or 'false' and instead saw '{0}'.")]
    BadInteger(String),
    /// `validthis` outside of a function body
    #[error("Option 'validthis' can't be used in a global scope.")]
    ValidThisInGlobal,
}

impl ConfigError {
    /// Stable diagnostic code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::UnknownOption(_) => "E001",
            ConfigError::BadValue(_) => "E002",
            ConfigError::BadInteger(_) => "E032",
            ConfigError::ValidThisInGlobal => "E009",
        }
    }
}

impl OptionSpec {
    /// Type a raw directive value (`true`, `80`, `nofunc`) for this option
    pub fn parse_value(&self, raw: &str) -> Result<OptionValue, ConfigError> {
        let raw = raw.trim();
        match self.kind {
            Bool => match raw {
                "true" => Ok(OptionValue::Bool(true)),
                "false" => Ok(OptionValue::Bool(false)),
                _ => Err(ConfigError::BadValue(raw.to_string())),
            },
            Int => {
                if raw == "false" {
                    return Ok(OptionValue::Bool(false));
                }
                match raw.parse::<u32>() {
                    Ok(n) if n > 0 => Ok(OptionValue::Int(n)),
                    _ => Err(ConfigError::BadInteger(raw.to_string())),
                }
            }
            Graded(levels) => match raw {
                "true" => Ok(OptionValue::Bool(true)),
                "false" => Ok(OptionValue::Bool(false)),
                level if levels.contains(&level) => Ok(OptionValue::Str(level.to_string())),
                _ => Err(ConfigError::BadValue(raw.to_string())),
            },
        }
    }

    /// Validate an already-typed value (from a JSON base configuration)
    pub fn check_value(&self, value: &OptionValue) -> Result<(), ConfigError> {
        match (self.kind, value) {
            (_, OptionValue::Bool(_)) => Ok(()),
            (Int, OptionValue::Int(n)) if *n > 0 => Ok(()),
            (Int, other) => Err(ConfigError::BadInteger(describe(other))),
            (Graded(levels), OptionValue::Str(s)) if levels.contains(&s.as_str()) => Ok(()),
            (_, other) => Err(ConfigError::BadValue(describe(other))),
        }
    }
}

fn describe(value: &OptionValue) -> String {
    match value {
        OptionValue::Bool(b) => b.to_string(),
        OptionValue::Int(n) => n.to_string(),
        OptionValue::Str(s) => s.clone(),
        OptionValue::Set(names) => names.iter().cloned().collect::<Vec<_>>().join(","),
    }
}

fn ignore_code_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^-([EWI][0-9]+)$").ok())
        .as_ref()
}

/// Extract the diagnostic code from an ignore key such as `-W034`
pub fn ignore_code(key: &str) -> Option<&str> {
    ignore_code_pattern()?
        .captures(key)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// A flat option mapping supplied once per run.
///
/// # Examples
///
/// ```
/// use lint_core::OptionSet;
///
/// let options = OptionSet::new()
///     .with("undef", true)
///     .with("latedef", "nofunc")
///     .with("maxlen", 80);
/// assert_eq!(options.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSet(IndexMap<String, OptionValue>);

impl OptionSet {
    /// Empty option set: every option at its default
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: &str, value: impl Into<OptionValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Insert or replace one entry
    pub fn set(&mut self, name: &str, value: impl Into<OptionValue>) {
        self.0.insert(name.to_string(), value.into());
    }

    /// Look an entry up
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.0.get(name)
    }

    /// Number of entries, ignore codes included
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no entry is present
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Codes switched off by `-W###` keys with a truthy value
    pub fn ignore_codes(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, value)| value.is_truthy())
            .filter_map(|(key, _)| ignore_code(key).map(str::to_string))
            .collect()
    }
}

impl FromIterator<(String, OptionValue)> for OptionSet {
    fn from_iter<I: IntoIterator<Item = (String, OptionValue)>>(iter: I) -> Self {
        OptionSet(iter.into_iter().collect())
    }
}

/// Level of the `unused` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedPolicy {
    /// No check
    Off,
    /// Variables plus parameters after the last used one
    LastParam,
    /// Variables only
    Vars,
    /// Variables and every parameter
    Strict,
}

/// Level of the `latedef` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LateDefPolicy {
    /// No check
    Off,
    /// Every binding, functions included
    All,
    /// Only non-function bindings
    NoFunc,
}

/// Level of the `shadow` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowPolicy {
    /// Re-declarations within the same function are reported (default)
    Inner,
    /// Re-declarations of names bound in outer functions are reported too
    Outer,
    /// Nothing is reported
    Allow,
}

/// Level of the `quotmark` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotePolicy {
    /// No check
    Off,
    /// Any quote, as long as the file is consistent
    Consistent,
    /// Single quotes only
    Single,
    /// Double quotes only
    Double,
}

#[derive(Debug, Clone)]
struct Entry {
    value: OptionValue,
    explicit: bool,
}

/// Directive-scoped layer of option values.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    entries: HashMap<String, Entry>,
}

impl Overlay {
    fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }
}

/// One run's effective configuration.
///
/// Resolution reads the overlay stack top-down, then the base layer, then the
/// built-in default (`false`).
///
/// # Examples
///
/// ```
/// use lint_core::{OptionRegistry, OptionSet, OptionValue};
///
/// let (mut registry, problems) = OptionRegistry::new(&OptionSet::new().with("strict", false));
/// assert!(problems.is_empty());
///
/// registry.push_overlay();
/// registry.apply("globalstrict", OptionValue::Bool(true), false).unwrap();
/// // the explicit base `strict: false` dominates the implied `true`
/// assert!(!registry.enabled("strict"));
/// registry.pop_overlay();
/// ```
#[derive(Debug, Clone)]
pub struct OptionRegistry {
    base: IndexMap<String, OptionValue>,
    overlays: Vec<Overlay>,
}

impl OptionRegistry {
    /// Build a registry from a base option set.
    ///
    /// Invalid base entries are dropped and returned as problems. Ignore-code
    /// keys are skipped (see [`OptionSet::ignore_codes`]). The returned
    /// registry already holds the global overlay.
    pub fn new(options: &OptionSet) -> (Self, Vec<ConfigError>) {
        let mut problems = Vec::new();
        let mut base = IndexMap::new();

        for (name, value) in options.iter() {
            if ignore_code(name).is_some() {
                continue;
            }
            match lookup(name) {
                Some(spec) => match spec.check_value(value) {
                    Ok(()) => {
                        base.insert(name.to_string(), value.clone());
                    }
                    Err(problem) => problems.push(problem),
                },
                None => problems.push(ConfigError::UnknownOption(name.to_string())),
            }
        }

        let mut registry = Self {
            base,
            overlays: vec![Overlay::default()],
        };

        let triggers: Vec<String> = registry
            .base
            .iter()
            .filter(|(_, value)| value.is_truthy())
            .map(|(name, _)| name.clone())
            .collect();
        for trigger in triggers {
            registry.apply_implications(&trigger);
        }

        (registry, problems)
    }

    /// Effective value of an option
    pub fn resolve(&self, name: &str) -> &OptionValue {
        self.overlays
            .iter()
            .rev()
            .find_map(|overlay| overlay.get(name).map(|entry| &entry.value))
            .or_else(|| self.base.get(name))
            .unwrap_or(&DISABLED)
    }

    /// Whether an option is switched on
    pub fn enabled(&self, name: &str) -> bool {
        self.resolve(name).is_truthy()
    }

    /// Integer limit of an option, if set
    pub fn limit(&self, name: &str) -> Option<u32> {
        self.resolve(name).as_limit()
    }

    /// Options that are currently truthy, in catalogue order
    pub fn enabled_names(&self) -> Vec<&'static str> {
        CATALOG
            .iter()
            .filter(|spec| self.enabled(spec.name))
            .map(|spec| spec.name)
            .collect()
    }

    /// Typed view of `unused`
    pub fn unused_policy(&self) -> UnusedPolicy {
        match self.resolve("unused") {
            OptionValue::Str(level) if level == "vars" => UnusedPolicy::Vars,
            OptionValue::Str(level) if level == "strict" => UnusedPolicy::Strict,
            value if value.is_truthy() => UnusedPolicy::LastParam,
            _ => UnusedPolicy::Off,
        }
    }

    /// Typed view of `latedef`
    pub fn latedef_policy(&self) -> LateDefPolicy {
        match self.resolve("latedef") {
            OptionValue::Str(level) if level == "nofunc" => LateDefPolicy::NoFunc,
            value if value.is_truthy() => LateDefPolicy::All,
            _ => LateDefPolicy::Off,
        }
    }

    /// Typed view of `shadow`
    pub fn shadow_policy(&self) -> ShadowPolicy {
        match self.resolve("shadow") {
            OptionValue::Str(level) if level == "outer" => ShadowPolicy::Outer,
            OptionValue::Str(_) => ShadowPolicy::Inner,
            value if value.is_truthy() => ShadowPolicy::Allow,
            _ => ShadowPolicy::Inner,
        }
    }

    /// Typed view of `quotmark`
    pub fn quote_policy(&self) -> QuotePolicy {
        match self.resolve("quotmark") {
            OptionValue::Str(level) if level == "single" => QuotePolicy::Single,
            OptionValue::Str(level) if level == "double" => QuotePolicy::Double,
            value if value.is_truthy() => QuotePolicy::Consistent,
            _ => QuotePolicy::Off,
        }
    }

    /// Open a new directive scope (function body entry)
    pub fn push_overlay(&mut self) {
        self.overlays.push(Overlay::default());
    }

    /// Close the innermost directive scope. The global overlay is never popped.
    pub fn pop_overlay(&mut self) {
        if self.overlays.len() > 1 {
            self.overlays.pop();
        }
    }

    /// Number of open overlays, the global one included
    pub fn depth(&self) -> usize {
        self.overlays.len()
    }

    /// Apply one directive entry to the innermost overlay.
    ///
    /// `at_global` tells whether the directive sits outside every function
    /// body. On error the option keeps its prior value.
    pub fn apply(
        &mut self,
        name: &str,
        value: OptionValue,
        at_global: bool,
    ) -> Result<(), ConfigError> {
        let spec = lookup(name).ok_or_else(|| ConfigError::UnknownOption(name.to_string()))?;
        spec.check_value(&value)?;
        if spec.name == "validthis" && at_global {
            return Err(ConfigError::ValidThisInGlobal);
        }

        let truthy = value.is_truthy();
        self.write(name, value, true);
        if truthy {
            self.apply_implications(name);
        }
        Ok(())
    }

    fn write(&mut self, name: &str, value: OptionValue, explicit: bool) {
        if let Some(top) = self.overlays.last_mut() {
            top.entries
                .insert(name.to_string(), Entry { value, explicit });
        }
    }

    fn apply_implications(&mut self, trigger: &str) {
        for implication in IMPLICATIONS.iter().filter(|i| i.trigger == trigger) {
            if !self.explicitly_false(implication.implies) {
                self.write(implication.implies, OptionValue::Bool(true), false);
            }
        }
    }

    /// Whether the nearest explicit setting of `name` is falsy
    fn explicitly_false(&self, name: &str) -> bool {
        for overlay in self.overlays.iter().rev() {
            if let Some(entry) = overlay.get(name) {
                if entry.explicit {
                    return !entry.value.is_truthy();
                }
            }
        }
        self.base.get(name).map_or(false, |value| !value.is_truthy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(options: OptionSet) -> OptionRegistry {
        let (registry, problems) = OptionRegistry::new(&options);
        assert!(problems.is_empty(), "unexpected problems: {:?}", problems);
        registry
    }

    #[test]
    fn test_defaults_are_disabled() {
        let registry = registry(OptionSet::new());
        assert!(!registry.enabled("undef"));
        assert_eq!(registry.limit("maxlen"), None);
        assert_eq!(registry.unused_policy(), UnusedPolicy::Off);
    }

    #[test]
    fn test_overlay_shadows_base_and_pops() {
        let mut registry = registry(OptionSet::new().with("undef", true));
        registry.push_overlay();
        registry.apply("undef", OptionValue::Bool(false), false).unwrap();
        assert!(!registry.enabled("undef"));
        registry.pop_overlay();
        assert!(registry.enabled("undef"));
    }

    #[test]
    fn test_global_overlay_is_never_popped() {
        let mut registry = registry(OptionSet::new());
        registry.pop_overlay();
        registry.pop_overlay();
        assert_eq!(registry.depth(), 1);
    }

    #[test]
    fn test_globalstrict_implies_strict() {
        let mut registry = registry(OptionSet::new());
        registry.apply("globalstrict", OptionValue::Bool(true), true).unwrap();
        assert!(registry.enabled("strict"));
    }

    #[test]
    fn test_base_globalstrict_implies_strict() {
        let registry = registry(OptionSet::new().with("globalstrict", true));
        assert!(registry.enabled("strict"));
    }

    #[test]
    fn test_explicit_false_dominates_implied_true() {
        let mut registry = registry(OptionSet::new());
        registry.apply("strict", OptionValue::Bool(false), true).unwrap();
        registry.push_overlay();
        registry.apply("globalstrict", OptionValue::Bool(true), false).unwrap();
        assert!(!registry.enabled("strict"));
    }

    #[test]
    fn test_explicit_true_in_inner_overlay_wins_over_outer_false() {
        let mut registry = registry(OptionSet::new().with("strict", false));
        registry.push_overlay();
        registry.apply("strict", OptionValue::Bool(true), false).unwrap();
        registry.apply("globalstrict", OptionValue::Bool(true), false).unwrap();
        assert!(registry.enabled("strict"));
    }

    #[test]
    fn test_graded_values_keep_exact_level() {
        let registry = registry(OptionSet::new().with("unused", "vars").with("latedef", "nofunc"));
        assert_eq!(registry.resolve("unused"), &OptionValue::Str("vars".to_string()));
        assert_eq!(registry.unused_policy(), UnusedPolicy::Vars);
        assert_eq!(registry.latedef_policy(), LateDefPolicy::NoFunc);
    }

    #[test]
    fn test_validthis_rejected_at_global_scope() {
        let mut registry = registry(OptionSet::new());
        let err = registry
            .apply("validthis", OptionValue::Bool(true), true)
            .unwrap_err();
        assert_eq!(err, ConfigError::ValidThisInGlobal);
        assert_eq!(err.code(), "E009");
        assert!(!registry.enabled("validthis"));
    }

    #[test]
    fn test_rejected_value_keeps_prior_value() {
        let mut registry = registry(OptionSet::new().with("maxlen", 80));
        let err = registry
            .apply("maxlen", OptionValue::Str("wide".to_string()), true)
            .unwrap_err();
        assert_eq!(err.code(), "E032");
        assert_eq!(registry.limit("maxlen"), Some(80));
    }

    #[test]
    fn test_unknown_base_option_reported() {
        let (_, problems) = OptionRegistry::new(&OptionSet::new().with("nosuchthing", true));
        assert_eq!(problems, vec![ConfigError::UnknownOption("nosuchthing".to_string())]);
    }

    #[test]
    fn test_parse_value_by_kind() {
        let maxlen = lookup("maxlen").unwrap();
        assert_eq!(maxlen.parse_value("100"), Ok(OptionValue::Int(100)));
        assert_eq!(maxlen.parse_value("false"), Ok(OptionValue::Bool(false)));
        assert!(maxlen.parse_value("0").is_err());

        let unused = lookup("unused").unwrap();
        assert_eq!(unused.parse_value("strict"), Ok(OptionValue::Str("strict".to_string())));
        assert!(unused.parse_value("sometimes").is_err());

        let curly = lookup("curly").unwrap();
        assert!(curly.parse_value("yes").is_err());
    }

    #[test]
    fn test_ignore_codes_extracted() {
        let options = OptionSet::new()
            .with("-W033", true)
            .with("-W098", false)
            .with("undef", true);
        assert_eq!(options.ignore_codes(), vec!["W033".to_string()]);
        assert_eq!(ignore_code("-W"), None);
        assert_eq!(ignore_code("W033"), None);
    }

    #[test]
    fn test_option_set_deserializes_from_json() {
        let options: OptionSet =
            serde_json::from_str(r#"{"undef": true, "maxlen": 80, "unused": "strict"}"#).unwrap();
        assert_eq!(options.get("maxlen"), Some(&OptionValue::Int(80)));
        assert_eq!(options.get("unused"), Some(&OptionValue::Str("strict".to_string())));
    }
}
