//! Construction-time limits of a registry.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_FLAGS: usize = 256;
pub const DEFAULT_MAX_SUBCOMMANDS: usize = 64;
pub const DEFAULT_MAX_MAIN_ARGS: usize = 16;
pub const DEFAULT_HASH_BUCKETS: usize = 1024;

/// Table capacities and parse policy for a [`crate::Drapeau`] registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Flags per scope, the auto-declared `help` flag included
    pub max_flags: usize,

    /// Subcommands per registry
    pub max_subcommands: usize,

    /// Positional values collected per scope
    pub max_main_args: usize,

    /// Bucket count of the subcommand name index
    pub hash_buckets: usize,

    /// When false, parsing an empty argument vector prints help and fails
    pub allow_empty_arguments: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_flags: DEFAULT_MAX_FLAGS,
            max_subcommands: DEFAULT_MAX_SUBCOMMANDS,
            max_main_args: DEFAULT_MAX_MAIN_ARGS,
            hash_buckets: DEFAULT_HASH_BUCKETS,
            allow_empty_arguments: true,
        }
    }
}

impl ParserConfig {
    /// Parse a config from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn strict(mut self) -> Self {
        self.allow_empty_arguments = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let content = "max_main_args = 4\nallow_empty_arguments = false\n";
        let config = ParserConfig::from_toml_str(content).unwrap();
        assert_eq!(config.max_main_args, 4);
        assert!(!config.allow_empty_arguments);
        assert_eq!(config.max_flags, DEFAULT_MAX_FLAGS);
        assert_eq!(config.hash_buckets, DEFAULT_HASH_BUCKETS);
    }

    #[test]
    fn test_unknown_field_type_is_rejected() {
        assert!(ParserConfig::from_toml_str("max_flags = \"many\"").is_err());
    }
}
