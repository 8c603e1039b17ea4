use std::path::Path;

use anyhow::{bail, Context, Result};
use drapeau_core::{ParserConfig, ValueKind};
use serde::{Deserialize, Serialize};

/// Describes the program whose arguments the host parses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub config: ParserConfig,
    #[serde(default)]
    pub main_arg: Option<MainArgSpec>,
    #[serde(default)]
    pub flags: Vec<FlagSpec>,
    #[serde(default)]
    pub subcommands: Vec<SubcommandSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainArgSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlagSpec {
    #[serde(default)]
    pub long: Option<String>,
    #[serde(default)]
    pub short: Option<char>,
    pub kind: ValueKind,
    #[serde(default)]
    pub list: bool,
    #[serde(default)]
    pub default: Option<toml::Value>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubcommandSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub main_arg: Option<MainArgSpec>,
    #[serde(default)]
    pub flags: Vec<FlagSpec>,
}

impl Manifest {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse manifest {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        let subcommand_flags = self.subcommands.iter().flat_map(|sub| sub.flags.iter());
        for flag in self.flags.iter().chain(subcommand_flags) {
            flag.validate()?;
        }
        Ok(())
    }
}

impl FlagSpec {
    /// `--long` or `-c`, for messages.
    pub fn label(&self) -> String {
        match (self.long.as_deref(), self.short) {
            (Some(long), _) if !long.is_empty() => format!("--{long}"),
            (_, Some(short)) => format!("-{short}"),
            _ => String::from("<unnamed>"),
        }
    }

    fn validate(&self) -> Result<()> {
        let has_long = self.long.as_deref().is_some_and(|long| !long.is_empty());
        if !has_long && self.short.is_none() {
            bail!("flag of kind {} needs a long or a short name", self.kind);
        }
        if self.list && self.default.is_some() {
            bail!("list flag {} cannot have a default", self.label());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VESTI: &str = r#"
name = "vesti"
description = "A preprocessor for LaTeX"

[config]
max_main_args = 4

[main_arg]
name = "FILES"
description = "input files"

[[flags]]
long = "count"
short = "c"
kind = "i32"
default = 3
description = "how many"

[[subcommands]]
name = "build"
description = "build the document"
main_arg = { name = "FILE", description = "input" }
flags = [ { long = "ids", kind = "u32", list = true, description = "ids" } ]
"#;

    #[test]
    fn test_manifest_parses() {
        let manifest = Manifest::from_toml_str(VESTI).unwrap();
        assert_eq!(manifest.name, "vesti");
        assert_eq!(manifest.config.max_main_args, 4);
        assert_eq!(manifest.config.max_flags, ParserConfig::default().max_flags);
        assert_eq!(manifest.flags[0].short, Some('c'));
        assert_eq!(manifest.flags[0].kind, ValueKind::I32);
        assert_eq!(manifest.flags[0].default, Some(toml::Value::Integer(3)));
        assert!(manifest.subcommands[0].flags[0].list);
        assert_eq!(manifest.subcommands[0].main_arg.as_ref().unwrap().name, "FILE");
    }

    #[test]
    fn test_nameless_flag_is_rejected() {
        let err = Manifest::from_toml_str("[[flags]]\nkind = \"bool\"\n").unwrap_err();
        assert!(err.to_string().contains("needs a long or a short name"));
    }

    #[test]
    fn test_list_default_is_rejected() {
        let content = "[[flags]]\nlong = \"ids\"\nkind = \"u8\"\nlist = true\ndefault = 1\n";
        let err = Manifest::from_toml_str(content).unwrap_err();
        assert!(err.to_string().contains("cannot have a default"));
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert!(Manifest::from_toml_str("[[flags]]\nlong = \"x\"\nkind = \"f64\"\n").is_err());
    }
}
