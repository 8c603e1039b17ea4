//! Scopes: the global scope and one per subcommand.

use crate::error::{DrapeauError, Result};
use crate::flag::Flag;
use crate::list::TypedList;
use crate::value::ValueKind;

/// Identifies the scope a declaration or handle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeId {
    Global,
    Subcommand(usize),
}

/// Positional values of a scope.
#[derive(Debug, Clone, PartialEq)]
pub struct MainArg {
    name: Option<String>,
    description: String,
    values: TypedList,
}

impl Default for MainArg {
    fn default() -> Self {
        Self {
            name: None,
            description: String::new(),
            values: TypedList::new(ValueKind::String),
        }
    }
}

impl MainArg {
    /// Set name and description and preallocate `capacity` values.
    pub(crate) fn declare(&mut self, name: &str, description: &str, capacity: usize) {
        self.name = Some(name.to_owned());
        self.description = description.to_owned();
        if self.values.capacity() < capacity {
            let mut values = TypedList::with_capacity(ValueKind::String, capacity);
            for value in self.values() {
                values.push_str(value);
            }
            self.values = values;
        }
    }

    /// Name shown in help, `None` until declared.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn values(&self) -> &[String] {
        self.values.as_slice::<String>().unwrap_or_default()
    }

    pub(crate) fn push(&mut self, value: &str, capacity: usize) -> Result<()> {
        if self.values.len() >= capacity {
            return Err(DrapeauError::MainArgOverflow(capacity));
        }
        if !self.values.push_str(value) {
            return Err(DrapeauError::Internal("main argument list is not a string list".into()));
        }
        Ok(())
    }

    pub(crate) fn release(&mut self) {
        self.values.release();
    }
}

/// Flags and positional values declared in one scope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    flags: Vec<Flag>,
    main_arg: MainArg,
}

impl Scope {
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    pub fn main_arg(&self) -> &MainArg {
        &self.main_arg
    }

    pub(crate) fn main_arg_mut(&mut self) -> &mut MainArg {
        &mut self.main_arg
    }

    pub(crate) fn flag(&self, index: usize) -> Option<&Flag> {
        self.flags.get(index)
    }

    pub(crate) fn flag_mut(&mut self, index: usize) -> Option<&mut Flag> {
        self.flags.get_mut(index)
    }

    /// Append `flag` unless `limit` flags are already declared.
    pub(crate) fn push_flag(&mut self, flag: Flag, limit: usize) -> Result<usize> {
        if self.flags.len() >= limit {
            return Err(DrapeauError::CapacityExceeded { what: "flags", limit });
        }
        self.flags.push(flag);
        Ok(self.flags.len() - 1)
    }

    /// First flag, in declaration order, whose long name is `name`.
    pub fn find_long(&self, name: &str) -> Option<usize> {
        self.flags.iter().position(|flag| flag.long_name() == Some(name))
    }

    /// First flag, in declaration order, whose short name is `short`.
    pub fn find_short(&self, short: char) -> Option<usize> {
        self.flags.iter().position(|flag| flag.short_name() == Some(short))
    }

    pub(crate) fn release(&mut self) {
        for flag in &mut self.flags {
            flag.release();
        }
        self.main_arg.release();
    }
}

/// A declared subcommand and the scope it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct Subcommand {
    name: String,
    description: String,
    is_active: bool,
    scope: Scope,
}

impl Subcommand {
    pub(crate) fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_owned(),
            description: description.to_owned(),
            is_active: false,
            scope: Scope::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub(crate) fn activate(&mut self) {
        self.is_active = true;
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub(crate) fn scope_mut(&mut self) -> &mut Scope {
        &mut self.scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_arg_respects_capacity() {
        let mut main_arg = MainArg::default();
        main_arg.declare("FILES", "input files", 2);
        main_arg.push("a", 2).unwrap();
        main_arg.push("b", 2).unwrap();
        assert_eq!(main_arg.push("c", 2), Err(DrapeauError::MainArgOverflow(2)));
        assert_eq!(main_arg.values(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_main_arg_redeclaration_keeps_values() {
        let mut main_arg = MainArg::default();
        main_arg.push("early", 16).unwrap();
        main_arg.declare("FILE", "input", 16);
        assert_eq!(main_arg.name(), Some("FILE"));
        assert_eq!(main_arg.values(), ["early".to_string()]);
    }

    #[test]
    fn test_find_uses_declaration_order() {
        let mut scope = Scope::default();
        scope
            .push_flag(Flag::scalar(Some("mode".into()), Some('m'), 1_u8, "first"), 8)
            .unwrap();
        scope
            .push_flag(Flag::scalar(Some("mode".into()), Some('m'), 2_u8, "second"), 8)
            .unwrap();
        assert_eq!(scope.find_long("mode"), Some(0));
        assert_eq!(scope.find_short('m'), Some(0));
        assert_eq!(scope.find_long("other"), None);
    }

    #[test]
    fn test_flag_capacity() {
        let mut scope = Scope::default();
        scope.push_flag(Flag::scalar(Some("a".into()), None, true, ""), 1).unwrap();
        let err = scope
            .push_flag(Flag::scalar(Some("b".into()), None, true, ""), 1)
            .unwrap_err();
        assert_eq!(err, DrapeauError::CapacityExceeded { what: "flags", limit: 1 });
    }
}
