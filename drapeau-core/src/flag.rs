//! Flag declarations.

use crate::list::TypedList;
use crate::value::{FlagType, FlagValue, ValueKind};

/// One declared flag with its current and default value.
#[derive(Debug, Clone, PartialEq)]
pub struct Flag {
    long_name: Option<String>,
    short_name: Option<char>,
    current: FlagValue,
    default: FlagValue,
    description: String,
}

impl Flag {
    pub(crate) fn scalar<T: FlagType>(
        long_name: Option<String>,
        short_name: Option<char>,
        default: T,
        description: &str,
    ) -> Self {
        let default = default.into_value();
        Self {
            long_name,
            short_name,
            current: default.clone(),
            default,
            description: description.to_owned(),
        }
    }

    pub(crate) fn list(
        long_name: Option<String>,
        short_name: Option<char>,
        kind: ValueKind,
        description: &str,
    ) -> Self {
        Self {
            long_name,
            short_name,
            current: FlagValue::List(TypedList::new(kind)),
            default: FlagValue::List(TypedList::new(kind)),
            description: description.to_owned(),
        }
    }

    pub fn long_name(&self) -> Option<&str> {
        self.long_name.as_deref()
    }

    pub fn short_name(&self) -> Option<char> {
        self.short_name
    }

    pub fn value(&self) -> &FlagValue {
        &self.current
    }

    pub(crate) fn value_mut(&mut self) -> &mut FlagValue {
        &mut self.current
    }

    pub fn default_value(&self) -> &FlagValue {
        &self.default
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> ValueKind {
        self.current.kind()
    }

    pub fn is_list(&self) -> bool {
        self.current.is_list()
    }

    /// `--long` when a long name exists, `-c` otherwise.
    pub fn display_name(&self) -> String {
        match (&self.long_name, self.short_name) {
            (Some(long), _) => format!("--{long}"),
            (None, Some(short)) => format!("-{short}"),
            (None, None) => String::from("<unnamed>"),
        }
    }

    /// Key used when reporting values, the long name if there is one.
    pub fn key(&self) -> String {
        match (&self.long_name, self.short_name) {
            (Some(long), _) => long.clone(),
            (None, Some(short)) => short.to_string(),
            (None, None) => String::new(),
        }
    }

    pub(crate) fn release(&mut self) {
        if let FlagValue::List(list) = &mut self.current {
            list.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_starts_at_default() {
        let flag = Flag::scalar(Some("count".into()), Some('c'), 3_i32, "how many");
        assert_eq!(flag.value(), &FlagValue::I32(3));
        assert_eq!(flag.value(), flag.default_value());
        assert_eq!(flag.kind(), ValueKind::I32);
        assert!(!flag.is_list());
    }

    #[test]
    fn test_list_starts_empty() {
        let flag = Flag::list(Some("ids".into()), None, ValueKind::U32, "ids");
        assert!(flag.is_list());
        assert_eq!(flag.kind(), ValueKind::U32);
        assert_eq!(flag.value(), &FlagValue::List(TypedList::new(ValueKind::U32)));
    }

    #[test]
    fn test_display_name_prefers_long() {
        let both = Flag::scalar(Some("verbose".into()), Some('v'), false, "");
        let short = Flag::scalar(None, Some('v'), false, "");
        assert_eq!(both.display_name(), "--verbose");
        assert_eq!(short.display_name(), "-v");
        assert_eq!(short.key(), "v");
    }
}
