//! Scalar kinds, flag values and token conversion.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::list::TypedList;

/// Element kind shared by scalar flags and typed lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    String,
}

impl ValueKind {
    pub fn is_numeric(self) -> bool {
        !matches!(self, ValueKind::Bool | ValueKind::String)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::I8 => "i8",
            ValueKind::I16 => "i16",
            ValueKind::I32 => "i32",
            ValueKind::I64 => "i64",
            ValueKind::U8 => "u8",
            ValueKind::U16 => "u16",
            ValueKind::U32 => "u32",
            ValueKind::U64 => "u64",
            ValueKind::String => "string",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current or default value of a flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    String(String),
    List(TypedList),
}

impl FlagValue {
    /// Element kind, for lists the kind of their elements.
    pub fn kind(&self) -> ValueKind {
        match self {
            FlagValue::Bool(_) => ValueKind::Bool,
            FlagValue::I8(_) => ValueKind::I8,
            FlagValue::I16(_) => ValueKind::I16,
            FlagValue::I32(_) => ValueKind::I32,
            FlagValue::I64(_) => ValueKind::I64,
            FlagValue::U8(_) => ValueKind::U8,
            FlagValue::U16(_) => ValueKind::U16,
            FlagValue::U32(_) => ValueKind::U32,
            FlagValue::U64(_) => ValueKind::U64,
            FlagValue::String(_) => ValueKind::String,
            FlagValue::List(list) => list.kind(),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, FlagValue::List(_))
    }

    /// Convert `token` into this integer slot. The slot is left untouched on
    /// failure. Returns false for non-integer values.
    pub(crate) fn assign_integer(&mut self, token: &str) -> bool {
        match self {
            FlagValue::I8(slot) => store(slot, token),
            FlagValue::I16(slot) => store(slot, token),
            FlagValue::I32(slot) => store(slot, token),
            FlagValue::I64(slot) => store(slot, token),
            FlagValue::U8(slot) => store(slot, token),
            FlagValue::U16(slot) => store(slot, token),
            FlagValue::U32(slot) => store(slot, token),
            FlagValue::U64(slot) => store(slot, token),
            FlagValue::Bool(_) | FlagValue::String(_) | FlagValue::List(_) => false,
        }
    }
}

fn store<T: FlagType>(slot: &mut T, token: &str) -> bool {
    match T::parse_token(token) {
        Some(value) => {
            *slot = value;
            true
        }
        None => false,
    }
}

/// A Rust type that can back a flag or the elements of a list flag.
///
/// Implemented for `bool`, the fixed-width integers and `String`.
pub trait FlagType: Sized + Clone + fmt::Debug + 'static {
    const KIND: ValueKind;

    fn into_value(self) -> FlagValue;

    fn from_value(value: &FlagValue) -> Option<&Self>;

    fn from_list(list: &TypedList) -> Option<&[Self]>;

    /// Convert one list element token.
    fn parse_token(token: &str) -> Option<Self>;
}

impl FlagType for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn into_value(self) -> FlagValue {
        FlagValue::Bool(self)
    }

    fn from_value(value: &FlagValue) -> Option<&Self> {
        match value {
            FlagValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    fn from_list(list: &TypedList) -> Option<&[Self]> {
        match list {
            TypedList::Bool(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    fn parse_token(token: &str) -> Option<Self> {
        Some(is_truthy(token))
    }
}

impl FlagType for String {
    const KIND: ValueKind = ValueKind::String;

    fn into_value(self) -> FlagValue {
        FlagValue::String(self)
    }

    fn from_value(value: &FlagValue) -> Option<&Self> {
        match value {
            FlagValue::String(v) => Some(v),
            _ => None,
        }
    }

    fn from_list(list: &TypedList) -> Option<&[Self]> {
        match list {
            TypedList::String(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    fn parse_token(token: &str) -> Option<Self> {
        Some(token.to_owned())
    }
}

macro_rules! integer_flag_type {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl FlagType for $ty {
            const KIND: ValueKind = ValueKind::$variant;

            fn into_value(self) -> FlagValue {
                FlagValue::$variant(self)
            }

            fn from_value(value: &FlagValue) -> Option<&Self> {
                match value {
                    FlagValue::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn from_list(list: &TypedList) -> Option<&[Self]> {
                match list {
                    TypedList::$variant(items) => Some(items.as_slice()),
                    _ => None,
                }
            }

            fn parse_token(token: &str) -> Option<Self> {
                parse_integer(token)
            }
        }
    )*};
}

integer_flag_type!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
);

/// Parse an integer literal and narrow it to `T`.
///
/// Leading whitespace and a sign are accepted. The base follows C literal
/// rules: `0x`/`0X` is hexadecimal, a leading `0` is octal, anything else is
/// decimal. The whole remainder must be digits of that base, the magnitude
/// must fit in 64 bits and the signed result must fit in `T`.
pub fn parse_integer<T: TryFrom<i128>>(token: &str) -> Option<T> {
    let trimmed = token.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, digits) = if let Some(hex) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        (16, hex)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (8, &unsigned[1..])
    } else {
        (10, unsigned)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    let magnitude = i128::from(u64::from_str_radix(digits, radix).ok()?);
    let value = if negative { -magnitude } else { magnitude };
    T::try_from(value).ok()
}

/// Truthiness of a boolean list element: `t`, `T`, `true` and `True`.
pub fn is_truthy(token: &str) -> bool {
    matches!(token, "t" | "T" | "true" | "True")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_hex_and_octal() {
        assert_eq!(parse_integer::<i32>("42"), Some(42));
        assert_eq!(parse_integer::<i32>("0x2A"), Some(42));
        assert_eq!(parse_integer::<i32>("0X2a"), Some(42));
        assert_eq!(parse_integer::<i32>("052"), Some(42));
        assert_eq!(parse_integer::<i32>("0"), Some(0));
        assert_eq!(parse_integer::<i32>("  +7"), Some(7));
    }

    #[test]
    fn test_parse_negative_values() {
        assert_eq!(parse_integer::<i8>("-128"), Some(-128));
        assert_eq!(parse_integer::<i64>("-0x10"), Some(-16));
        assert_eq!(parse_integer::<i64>("-9223372036854775808"), Some(i64::MIN));
        assert_eq!(parse_integer::<u8>("-1"), None);
        assert_eq!(parse_integer::<u32>("-0"), Some(0));
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert_eq!(parse_integer::<i8>("128"), None);
        assert_eq!(parse_integer::<u8>("256"), None);
        assert_eq!(parse_integer::<u16>("0x10000"), None);
        assert_eq!(parse_integer::<u64>("18446744073709551615"), Some(u64::MAX));
        assert_eq!(parse_integer::<u64>("18446744073709551616"), None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_integer::<i32>(""), None);
        assert_eq!(parse_integer::<i32>("-"), None);
        assert_eq!(parse_integer::<i32>("0x"), None);
        assert_eq!(parse_integer::<i32>("12abc"), None);
        assert_eq!(parse_integer::<i32>("08"), None);
        assert_eq!(parse_integer::<i32>("hello"), None);
        assert_eq!(parse_integer::<i32>("1 2"), None);
    }

    #[test]
    fn test_widths_round_trip_at_their_bounds() {
        assert_eq!(parse_integer::<i16>(&i16::MAX.to_string()), Some(i16::MAX));
        assert_eq!(parse_integer::<i16>(&i16::MIN.to_string()), Some(i16::MIN));
        assert_eq!(parse_integer::<i32>(&i32::MIN.to_string()), Some(i32::MIN));
        assert_eq!(parse_integer::<u32>(&u32::MAX.to_string()), Some(u32::MAX));
        assert_eq!(parse_integer::<i32>(&(i64::from(i32::MAX) + 1).to_string()), None);
    }

    #[test]
    fn test_truthy_tokens() {
        for token in ["t", "T", "true", "True"] {
            assert!(is_truthy(token), "{token}");
        }
        for token in ["TRUE", "yes", "1", "false", "tru", ""] {
            assert!(!is_truthy(token), "{token}");
        }
    }

    #[test]
    fn test_assign_integer_keeps_value_on_failure() {
        let mut value = FlagValue::U8(5);
        assert!(!value.assign_integer("300"));
        assert_eq!(value, FlagValue::U8(5));
        assert!(value.assign_integer("0xff"));
        assert_eq!(value, FlagValue::U8(255));
    }

    #[test]
    fn test_flag_type_round_trip_through_value() {
        let value = 12_i16.into_value();
        assert_eq!(value.kind(), ValueKind::I16);
        assert_eq!(i16::from_value(&value), Some(&12));
        assert_eq!(i32::from_value(&value), None);
    }
}
