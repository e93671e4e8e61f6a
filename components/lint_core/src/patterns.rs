//! Compiled regular expressions used by the inline checks

use regex::Regex;
use std::sync::OnceLock;

fn compiled(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

fn matches(cell: &'static OnceLock<Option<Regex>>, pattern: &str, text: &str) -> bool {
    compiled(cell, pattern).map_or(false, |re| re.is_match(text))
}

/// `javascript:` and friends at the start of a string
pub fn is_script_url(text: &str) -> bool {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    matches(
        &CELL,
        r"(?i)^\s*(?:javascript|jscript|ecmascript|vbscript|livescript)\s*:",
        text,
    )
}

/// `MAX_SIZE`-style names, which camel-case checking accepts
pub fn is_constant_case(text: &str) -> bool {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    matches(&CELL, r"^[A-Z0-9_$]*$", text)
}

/// Capitalized names with at least one lowercase letter (or a single
/// capital), the shape of a constructor
pub fn looks_like_constructor(text: &str) -> bool {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    matches(&CELL, r"^[A-Z]([A-Z0-9_$]*[a-z][A-Za-z0-9_$]*)?$", text)
}

/// Plain ASCII identifier, usable after a dot
pub fn is_identifier_name(text: &str) -> bool {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    matches(&CELL, r"^[A-Za-z_$][A-Za-z0-9_$]*$", text)
}

/// Whether `name` breaks camel case: an inner underscore in a name that is
/// not all capitals
pub fn breaks_camel_case(name: &str) -> bool {
    name.trim_matches('_').contains('_') && !is_constant_case(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_url() {
        assert!(is_script_url("javascript:void(0)"));
        assert!(is_script_url("  JavaScript :alert(1)"));
        assert!(!is_script_url("http://example.com"));
    }

    #[test]
    fn test_camel_case() {
        assert!(breaks_camel_case("first_name"));
        assert!(!breaks_camel_case("firstName"));
        assert!(!breaks_camel_case("MAX_SIZE"));
        assert!(!breaks_camel_case("_private_"));
    }

    #[test]
    fn test_constructor_shape() {
        assert!(looks_like_constructor("Widget"));
        assert!(looks_like_constructor("X"));
        assert!(!looks_like_constructor("JSON"));
        assert!(!looks_like_constructor("widget"));
    }

    #[test]
    fn test_identifier_name() {
        assert!(is_identifier_name("foo_bar$"));
        assert!(!is_identifier_name("foo-bar"));
        assert!(!is_identifier_name("1a"));
    }
}
