use std::{error::Error, fs, path::Path};

use serde::{de, Deserialize, Deserializer};
use serde_derive::Deserialize;

use crate::Options;

fn default_pattern() -> String {
    "*.s".to_string()
}

/// Settings read from a TOML file given with `--config`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Accept label definitions without a trailing colon.
    #[serde(default)]
    pub legacy_labels: bool,

    /// File name pattern for recursive runs.
    #[serde(default = "default_pattern", deserialize_with = "deserialize_pattern")]
    pub pattern: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            legacy_labels: false,
            pattern: default_pattern(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path).map_err(|e| format!("cant open file: {e}"))?;
        Ok(toml::from_str(&text)?)
    }

    pub fn options(&self) -> Options {
        Options {
            colon_required: !self.legacy_labels,
        }
    }
}

fn deserialize_pattern<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let pattern = String::deserialize(deserializer)?;
    if pattern.trim().is_empty() {
        return Err(de::Error::custom("pattern must not be empty"));
    }
    Ok(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.options().colon_required);
    }

    #[test]
    fn reads_all_keys() {
        let config: Config = toml::from_str("legacy_labels = true\npattern = \"*.asm\"\n").unwrap();
        assert_eq!(config.pattern, "*.asm");
        assert!(!config.options().colon_required);
    }

    #[test]
    fn rejects_bad_files() {
        assert!(toml::from_str::<Config>("colour = true").is_err());
        assert!(toml::from_str::<Config>("pattern = \"\"").is_err());
        assert!(toml::from_str::<Config>("legacy_labels = \"yes\"").is_err());
    }
}
