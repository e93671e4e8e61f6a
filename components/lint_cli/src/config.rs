//! JSON configuration and command-line overrides

use crate::error::{CliError, CliResult};
use lint_core::options::{self, ConfigError};
use lint_core::{OptionSet, OptionValue, PredefinedGlobals};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Options and predefined globals for every file of one invocation
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LintConfig {
    /// Base option layer
    #[serde(default)]
    pub options: OptionSet,
    /// Caller-provided globals
    #[serde(default)]
    pub globals: Option<PredefinedGlobals>,
}

impl LintConfig {
    /// Read a config file
    pub fn load(path: &Path) -> CliResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: LintConfig =
            serde_json::from_str(&text).map_err(|source| CliError::Config {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(
            path = %path.display(),
            options = config.options.len(),
            "config loaded"
        );
        Ok(config)
    }

    /// Apply one `key=value` override on top of the loaded options
    ///
    /// Values are typed through the option catalogue, so `maxlen=80` becomes
    /// an integer and `latedef=nofunc` a graded level. Ignore keys such as
    /// `-W033` take `true` or `false`.
    pub fn apply_override(&mut self, raw: &str) -> CliResult<()> {
        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| CliError::Usage(raw.to_string()))?;
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() {
            return Err(CliError::Usage(raw.to_string()));
        }

        let typed = if options::ignore_code(key).is_some() {
            match value {
                "true" => OptionValue::Bool(true),
                "false" => OptionValue::Bool(false),
                _ => return Err(bad_option(raw, ConfigError::BadValue(value.to_string()))),
            }
        } else {
            let spec = options::lookup(key)
                .ok_or_else(|| bad_option(raw, ConfigError::UnknownOption(key.to_string())))?;
            spec.parse_value(value).map_err(|err| bad_option(raw, err))?
        };

        debug!(key, ?typed, "option override");
        self.options.set(key, typed);
        Ok(())
    }
}

fn bad_option(raw: &str, source: ConfigError) -> CliError {
    CliError::BadOption {
        raw: raw.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_shape() {
        let config: LintConfig =
            serde_json::from_str(r#"{"options": {"undef": true}, "globals": ["app"]}"#).unwrap();
        assert_eq!(config.options.get("undef"), Some(&OptionValue::Bool(true)));
        assert!(matches!(config.globals, Some(PredefinedGlobals::List(_))));
    }

    #[test]
    fn test_empty_config() {
        let config: LintConfig = serde_json::from_str("{}").unwrap();
        assert!(config.options.is_empty());
        assert!(config.globals.is_none());
    }

    #[test]
    fn test_unknown_top_level_key() {
        assert!(serde_json::from_str::<LintConfig>(r#"{"rules": {}}"#).is_err());
    }

    #[test]
    fn test_typed_overrides() {
        let mut config = LintConfig::default();
        config.apply_override("maxlen=80").unwrap();
        config.apply_override("latedef=nofunc").unwrap();
        config.apply_override("undef = true").unwrap();
        config.apply_override("-W033=true").unwrap();

        assert_eq!(config.options.get("maxlen"), Some(&OptionValue::Int(80)));
        assert_eq!(
            config.options.get("latedef"),
            Some(&OptionValue::Str("nofunc".to_string()))
        );
        assert_eq!(config.options.get("undef"), Some(&OptionValue::Bool(true)));
        assert_eq!(config.options.ignore_codes(), vec!["W033".to_string()]);
    }

    #[test]
    fn test_override_replaces_config_value() {
        let mut config: LintConfig =
            serde_json::from_str(r#"{"options": {"maxlen": 120}}"#).unwrap();
        config.apply_override("maxlen=false").unwrap();
        assert_eq!(config.options.get("maxlen"), Some(&OptionValue::Bool(false)));
        assert_eq!(config.options.len(), 1);
    }

    #[test]
    fn test_rejected_overrides() {
        let mut config = LintConfig::default();
        assert!(matches!(
            config.apply_override("undef"),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            config.apply_override("=true"),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            config.apply_override("nosuch=true"),
            Err(CliError::BadOption {
                source: ConfigError::UnknownOption(_),
                ..
            })
        ));
        assert!(matches!(
            config.apply_override("maxlen=wide"),
            Err(CliError::BadOption {
                source: ConfigError::BadInteger(_),
                ..
            })
        ));
        assert!(matches!(
            config.apply_override("-W033=yes"),
            Err(CliError::BadOption {
                source: ConfigError::BadValue(_),
                ..
            })
        ));
        assert!(config.options.is_empty());
    }
}
