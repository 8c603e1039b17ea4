//! Homogeneously typed, growable value list.
//!
//! Backs list flags and the positional values of each scope. The element
//! kind is fixed by the variant chosen at creation.

use serde::Serialize;

use crate::value::{FlagType, ValueKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedList {
    Bool(Vec<bool>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    String(Vec<String>),
}

/// Applies `$body` to the inner vector whatever the variant.
macro_rules! each_list {
    ($list:expr, $items:ident => $body:expr) => {
        match $list {
            TypedList::Bool($items) => $body,
            TypedList::I8($items) => $body,
            TypedList::I16($items) => $body,
            TypedList::I32($items) => $body,
            TypedList::I64($items) => $body,
            TypedList::U8($items) => $body,
            TypedList::U16($items) => $body,
            TypedList::U32($items) => $body,
            TypedList::U64($items) => $body,
            TypedList::String($items) => $body,
        }
    };
}

impl TypedList {
    /// Empty list of the given kind. Nothing is allocated.
    pub fn new(kind: ValueKind) -> Self {
        Self::with_capacity(kind, 0)
    }

    pub fn with_capacity(kind: ValueKind, capacity: usize) -> Self {
        match kind {
            ValueKind::Bool => TypedList::Bool(Vec::with_capacity(capacity)),
            ValueKind::I8 => TypedList::I8(Vec::with_capacity(capacity)),
            ValueKind::I16 => TypedList::I16(Vec::with_capacity(capacity)),
            ValueKind::I32 => TypedList::I32(Vec::with_capacity(capacity)),
            ValueKind::I64 => TypedList::I64(Vec::with_capacity(capacity)),
            ValueKind::U8 => TypedList::U8(Vec::with_capacity(capacity)),
            ValueKind::U16 => TypedList::U16(Vec::with_capacity(capacity)),
            ValueKind::U32 => TypedList::U32(Vec::with_capacity(capacity)),
            ValueKind::U64 => TypedList::U64(Vec::with_capacity(capacity)),
            ValueKind::String => TypedList::String(Vec::with_capacity(capacity)),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            TypedList::Bool(_) => ValueKind::Bool,
            TypedList::I8(_) => ValueKind::I8,
            TypedList::I16(_) => ValueKind::I16,
            TypedList::I32(_) => ValueKind::I32,
            TypedList::I64(_) => ValueKind::I64,
            TypedList::U8(_) => ValueKind::U8,
            TypedList::U16(_) => ValueKind::U16,
            TypedList::U32(_) => ValueKind::U32,
            TypedList::U64(_) => ValueKind::U64,
            TypedList::String(_) => ValueKind::String,
        }
    }

    pub fn len(&self) -> usize {
        each_list!(self, items => items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        each_list!(self, items => items.capacity())
    }

    /// Typed view of the elements, `None` when `T` is not the element kind.
    pub fn as_slice<T: FlagType>(&self) -> Option<&[T]> {
        T::from_list(self)
    }

    /// Convert and append every token.
    ///
    /// On the first token that does not convert, everything appended by this
    /// call is dropped again and the offending token is returned.
    pub(crate) fn append_tokens(&mut self, tokens: &[String]) -> Result<(), String> {
        each_list!(self, items => extend_converted(items, tokens))
    }

    /// Push a positional value. Only string lists accept one.
    pub(crate) fn push_str(&mut self, value: &str) -> bool {
        match self {
            TypedList::String(items) => {
                items.push(value.to_owned());
                true
            }
            _ => false,
        }
    }

    /// Drop every element and give the buffer back.
    pub fn release(&mut self) {
        each_list!(self, items => {
            items.clear();
            items.shrink_to_fit();
        })
    }
}

fn extend_converted<T: FlagType>(items: &mut Vec<T>, tokens: &[String]) -> Result<(), String> {
    let start = items.len();
    items.reserve_exact(tokens.len());

    for token in tokens {
        match T::parse_token(token) {
            Some(value) => items.push(value),
            None => {
                items.truncate(start);
                return Err(token.clone());
            }
        }
    }

    Ok(())
}
