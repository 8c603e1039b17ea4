//! JSON report of a finished parse.

use anyhow::Result;
use drapeau_core::{Drapeau, Scope};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Serialize)]
pub struct ScopeReport {
    pub args: Vec<String>,
    pub flags: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct SubcommandReport {
    pub name: String,
    #[serde(flatten)]
    pub scope: ScopeReport,
}

/// Values of the global scope and of the selected subcommand, if any.
#[derive(Debug, Serialize)]
pub struct ParseReport {
    pub program: String,
    pub global: ScopeReport,
    pub subcommand: Option<SubcommandReport>,
}

impl ScopeReport {
    fn collect(scope: &Scope) -> Result<Self> {
        let mut flags = Map::new();
        for flag in scope.flags() {
            flags.insert(flag.key(), serde_json::to_value(flag.value())?);
        }

        Ok(Self {
            args: scope.main_arg().values().to_vec(),
            flags,
        })
    }
}

impl ParseReport {
    pub fn collect(drapeau: &Drapeau) -> Result<Self> {
        let subcommand = match drapeau.active_subcommand() {
            Some(active) => Some(SubcommandReport {
                name: active.name().to_owned(),
                scope: ScopeReport::collect(active.scope())?,
            }),
            None => None,
        };

        Ok(Self {
            program: drapeau.name().to_owned(),
            global: ScopeReport::collect(drapeau.global_scope())?,
            subcommand,
        })
    }

    /// Pretty JSON, or a single line when `raw` is set.
    pub fn render(&self, raw: bool) -> Result<String> {
        let json = if raw {
            serde_json::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };
        Ok(json)
    }
}
