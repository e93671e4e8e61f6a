//! Predefined global names: the language built-ins, the environment sets the
//! `browser`/`node`/... options switch on, and caller-supplied globals.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A static global set: name and whether assignments are allowed
pub type GlobalSet = &'static [(&'static str, bool)];

/// Language built-ins, always present
pub const ECMA: GlobalSet = &[
    ("Array", false),
    ("ArrayBuffer", false),
    ("Boolean", false),
    ("DataView", false),
    ("Date", false),
    ("decodeURI", false),
    ("decodeURIComponent", false),
    ("encodeURI", false),
    ("encodeURIComponent", false),
    ("Error", false),
    ("eval", false),
    ("EvalError", false),
    ("Float32Array", false),
    ("Float64Array", false),
    ("Function", false),
    ("hasOwnProperty", false),
    ("Infinity", false),
    ("Int8Array", false),
    ("Int16Array", false),
    ("Int32Array", false),
    ("isFinite", false),
    ("isNaN", false),
    ("JSON", false),
    ("Map", false),
    ("Math", false),
    ("NaN", false),
    ("Number", false),
    ("Object", false),
    ("parseFloat", false),
    ("parseInt", false),
    ("Promise", false),
    ("Proxy", false),
    ("RangeError", false),
    ("ReferenceError", false),
    ("Reflect", false),
    ("RegExp", false),
    ("Set", false),
    ("String", false),
    ("Symbol", false),
    ("SyntaxError", false),
    ("TypeError", false),
    ("Uint8Array", false),
    ("Uint8ClampedArray", false),
    ("Uint16Array", false),
    ("Uint32Array", false),
    ("undefined", false),
    ("URIError", false),
    ("WeakMap", false),
    ("WeakSet", false),
];

const BROWSER: GlobalSet = &[
    ("addEventListener", false),
    ("atob", false),
    ("blur", false),
    ("btoa", false),
    ("clearInterval", false),
    ("clearTimeout", false),
    ("close", false),
    ("CustomEvent", false),
    ("document", false),
    ("Element", false),
    ("Event", false),
    ("fetch", false),
    ("FileReader", false),
    ("focus", false),
    ("FormData", false),
    ("frames", false),
    ("getComputedStyle", false),
    ("history", false),
    ("HTMLElement", false),
    ("Image", false),
    ("localStorage", false),
    ("location", false),
    ("MutationObserver", false),
    ("name", true),
    ("navigator", false),
    ("Node", false),
    ("onbeforeunload", true),
    ("onblur", true),
    ("onerror", true),
    ("onfocus", true),
    ("onload", true),
    ("onresize", true),
    ("onunload", true),
    ("open", false),
    ("opener", true),
    ("parent", false),
    ("removeEventListener", false),
    ("requestAnimationFrame", false),
    ("screen", false),
    ("scroll", false),
    ("self", false),
    ("sessionStorage", false),
    ("setInterval", false),
    ("setTimeout", false),
    ("status", true),
    ("top", false),
    ("URL", false),
    ("WebSocket", false),
    ("window", false),
    ("Worker", false),
    ("XMLHttpRequest", false),
];

const NODE: GlobalSet = &[
    ("__dirname", false),
    ("__filename", false),
    ("Buffer", false),
    ("clearImmediate", false),
    ("clearInterval", false),
    ("clearTimeout", false),
    ("console", false),
    ("exports", true),
    ("global", false),
    ("GLOBAL", false),
    ("module", false),
    ("process", false),
    ("require", false),
    ("setImmediate", false),
    ("setInterval", false),
    ("setTimeout", false),
];

const DEVEL: GlobalSet = &[
    ("alert", false),
    ("confirm", false),
    ("console", false),
    ("Debug", false),
    ("opera", false),
    ("prompt", false),
];

const JQUERY: GlobalSet = &[("$", false), ("jQuery", false)];

const WORKER: GlobalSet = &[
    ("importScripts", true),
    ("onmessage", true),
    ("postMessage", true),
    ("self", true),
    ("FileReaderSync", false),
];

const NONSTANDARD: GlobalSet = &[("escape", false), ("unescape", false)];

/// The global set an environment option adds, if `option` is one
pub fn environment(option: &str) -> Option<GlobalSet> {
    match option {
        "browser" => Some(BROWSER),
        "node" => Some(NODE),
        "devel" => Some(DEVEL),
        "jquery" => Some(JQUERY),
        "worker" => Some(WORKER),
        "nonstandard" => Some(NONSTANDARD),
        _ => None,
    }
}

/// Caller-supplied predefined globals.
///
/// Either a map from name to writability, or a list of names where a leading
/// `-` removes a predefined name.
///
/// ```
/// use lint_core::PredefinedGlobals;
///
/// let list: PredefinedGlobals = serde_json::from_str(r#"["app", "-Map"]"#).unwrap();
/// let map: PredefinedGlobals = serde_json::from_str(r#"{"app": true}"#).unwrap();
/// assert_eq!(list.changes().len(), 2);
/// assert_eq!(map.changes().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredefinedGlobals {
    /// `{"name": writable}`
    Map(IndexMap<String, bool>),
    /// `["name", "-removed"]`
    List(Vec<String>),
}

/// One edit to the predefined table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalChange {
    /// Add a name
    Declare {
        /// Global name
        name: String,
        /// Whether assignments are allowed
        writable: bool,
    },
    /// Remove a name
    Remove(String),
}

fn change(name: &str, writable: bool) -> GlobalChange {
    match name.strip_prefix('-') {
        Some(removed) => GlobalChange::Remove(removed.to_string()),
        None => GlobalChange::Declare {
            name: name.to_string(),
            writable,
        },
    }
}

impl PredefinedGlobals {
    /// Edits in declaration order
    pub fn changes(&self) -> Vec<GlobalChange> {
        match self {
            PredefinedGlobals::Map(map) => map
                .iter()
                .map(|(name, writable)| change(name, *writable))
                .collect(),
            PredefinedGlobals::List(names) => names.iter().map(|name| change(name, false)).collect(),
        }
    }
}

/// The run's predefined table
#[derive(Debug, Clone)]
pub struct GlobalTable {
    entries: IndexMap<String, bool>,
    removed: HashSet<String>,
}

impl GlobalTable {
    /// Table holding the language built-ins
    pub fn standard() -> Self {
        let mut table = Self {
            entries: IndexMap::new(),
            removed: HashSet::new(),
        };
        table.add_set(ECMA);
        table
    }

    /// Add a static set; names removed earlier stay removed
    pub fn add_set(&mut self, set: GlobalSet) {
        for (name, writable) in set {
            if !self.removed.contains(*name) {
                let entry = self.entries.entry(name.to_string()).or_insert(false);
                *entry |= *writable;
            }
        }
    }

    /// Apply one edit
    pub fn apply(&mut self, change: GlobalChange) {
        match change {
            GlobalChange::Declare { name, writable } => {
                self.removed.remove(&name);
                self.entries.insert(name, writable);
            }
            GlobalChange::Remove(name) => {
                self.entries.shift_remove(&name);
                self.removed.insert(name);
            }
        }
    }

    /// `Some(writable)` if `name` is predefined
    pub fn lookup(&self, name: &str) -> Option<bool> {
        self.entries.get(name).copied()
    }

    /// Whether `name` is predefined
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table() {
        let table = GlobalTable::standard();
        assert_eq!(table.lookup("Math"), Some(false));
        assert!(!table.contains("window"));
    }

    #[test]
    fn test_environment_sets() {
        let mut table = GlobalTable::standard();
        table.add_set(environment("browser").unwrap());
        assert!(table.contains("document"));
        assert_eq!(table.lookup("onload"), Some(true));
        assert!(environment("curly").is_none());
    }

    #[test]
    fn test_removed_name_stays_removed() {
        let mut table = GlobalTable::standard();
        table.apply(GlobalChange::Remove("console".into()));
        table.add_set(environment("devel").unwrap());
        assert!(!table.contains("console"));
        assert!(table.contains("alert"));
    }

    #[test]
    fn test_predefined_globals_forms() {
        let list = PredefinedGlobals::List(vec!["app".into(), "-Map".into()]);
        assert_eq!(
            list.changes(),
            vec![
                GlobalChange::Declare { name: "app".into(), writable: false },
                GlobalChange::Remove("Map".into()),
            ]
        );

        let mut map = IndexMap::new();
        map.insert("store".to_string(), true);
        let map = PredefinedGlobals::Map(map);
        assert_eq!(
            map.changes(),
            vec![GlobalChange::Declare { name: "store".into(), writable: true }]
        );
    }
}
