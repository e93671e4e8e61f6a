//! Directive comments: `/*jshint ...*/`, `/*jslint ...*/`, `/*global ...*/`,
//! `/*globals ...*/` and `/*exported ...*/`, block or line form.
//!
//! The lexer hands every comment body to [`parse_comment`]. Entries are typed
//! against the option catalogue here; bad entries become problems carried on
//! the directive rather than lexing failures.

use crate::options::{self, ConfigError, OptionValue};
use regex::Regex;
use std::sync::OnceLock;

/// Which family of directive a comment holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    /// `jshint` / `jslint`
    Options,
    /// `global` / `globals`
    Globals,
    /// `exported`
    Exported,
}

/// Line suppression markers (`ignore:start`, `ignore:end`, `ignore:line`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreMarker {
    /// Suppress from this line on
    Start,
    /// Stop suppressing after this line
    End,
    /// Suppress this line only
    Line,
}

/// One parsed directive entry
#[derive(Debug, Clone, PartialEq)]
pub enum DirectiveEntry {
    /// `name:value`
    SetOption {
        /// Option name
        name: String,
        /// Typed value
        value: OptionValue,
    },
    /// `-W034`: drop this code for the rest of the run
    IgnoreCode(String),
    /// `ignore:start` and friends
    Ignore(IgnoreMarker),
    /// `name` or `name:true` inside a globals directive
    DeclareGlobal {
        /// Global name
        name: String,
        /// Whether assignments are allowed
        writable: bool,
    },
    /// `-name` inside a globals directive
    RemoveGlobal(String),
    /// A name listed in `exported`
    Export(String),
}

/// A parsed directive comment
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    /// Directive family
    pub kind: DirectiveKind,
    /// Well-formed entries in source order
    pub entries: Vec<DirectiveEntry>,
    /// Entries that were rejected
    pub problems: Vec<ConfigError>,
}

fn colon_spacing() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s*:\s*").ok()).as_ref()
}

/// Parse a comment body (delimiters stripped). Returns `None` for ordinary
/// comments.
pub fn parse_comment(body: &str) -> Option<Directive> {
    let trimmed = body.trim_start();
    let word_len = trimmed
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(trimmed.len());
    let (word, rest) = trimmed.split_at(word_len);

    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let kind = match word {
        "jshint" | "jslint" => DirectiveKind::Options,
        "global" | "globals" => DirectiveKind::Globals,
        "exported" => DirectiveKind::Exported,
        _ => return None,
    };

    Some(parse_entries(kind, rest))
}

fn split_items(rest: &str) -> Vec<String> {
    let normalized = match colon_spacing() {
        Some(pattern) => pattern.replace_all(rest, ":").into_owned(),
        None => rest.to_string(),
    };
    normalized
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_entries(kind: DirectiveKind, rest: &str) -> Directive {
    let mut directive = Directive {
        kind,
        entries: Vec::new(),
        problems: Vec::new(),
    };

    for item in split_items(rest) {
        let (key, value) = match item.split_once(':') {
            Some((key, value)) => (key, Some(value)),
            None => (item.as_str(), None),
        };

        let parsed = match kind {
            DirectiveKind::Options => option_entry(key, value),
            DirectiveKind::Globals => global_entry(key, value),
            DirectiveKind::Exported => Ok(Some(DirectiveEntry::Export(key.to_string()))),
        };

        match parsed {
            Ok(Some(entry)) => directive.entries.push(entry),
            Ok(None) => {}
            Err(problem) => directive.problems.push(problem),
        }
    }

    directive
}

fn option_entry(key: &str, value: Option<&str>) -> Result<Option<DirectiveEntry>, ConfigError> {
    if let Some(code) = options::ignore_code(key) {
        return match value {
            Some("false") => Ok(None),
            None | Some("true") => Ok(Some(DirectiveEntry::IgnoreCode(code.to_string()))),
            Some(other) => Err(ConfigError::BadValue(other.to_string())),
        };
    }

    if key == "ignore" {
        let marker = match value {
            Some("start") => IgnoreMarker::Start,
            Some("end") => IgnoreMarker::End,
            Some("line") => IgnoreMarker::Line,
            other => return Err(ConfigError::BadValue(other.unwrap_or_default().to_string())),
        };
        return Ok(Some(DirectiveEntry::Ignore(marker)));
    }

    let spec = options::lookup(key).ok_or_else(|| ConfigError::UnknownOption(key.to_string()))?;
    let raw = value.ok_or_else(|| ConfigError::BadValue(key.to_string()))?;
    let value = spec.parse_value(raw)?;
    Ok(Some(DirectiveEntry::SetOption {
        name: spec.name.to_string(),
        value,
    }))
}

fn global_entry(key: &str, value: Option<&str>) -> Result<Option<DirectiveEntry>, ConfigError> {
    if let Some(name) = key.strip_prefix('-') {
        return Ok(Some(DirectiveEntry::RemoveGlobal(name.to_string())));
    }
    let writable = match value {
        None | Some("false") => false,
        Some("true") => true,
        Some(other) => return Err(ConfigError::BadValue(other.to_string())),
    };
    Ok(Some(DirectiveEntry::DeclareGlobal {
        name: key.to_string(),
        writable,
    }))
}
