//! Typed handles returned by declarations.
//!
//! A handle is a non-owning key into the registry that created it; values are
//! read back through [`crate::Drapeau`] once parsing is done.

use std::fmt;
use std::marker::PhantomData;

use crate::scope::ScopeId;

/// Handle to a scalar flag of type `T`.
pub struct FlagHandle<T> {
    pub(crate) registry: u64,
    pub(crate) scope: ScopeId,
    pub(crate) index: usize,
    _kind: PhantomData<fn() -> T>,
}

/// Handle to a list flag with elements of type `T`.
pub struct ListHandle<T> {
    pub(crate) registry: u64,
    pub(crate) scope: ScopeId,
    pub(crate) index: usize,
    _kind: PhantomData<fn() -> T>,
}

/// Handle to a declared subcommand, used to ask whether it was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubcommandHandle {
    pub(crate) registry: u64,
    pub(crate) slot: usize,
}

/// Handle to the positional values of a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MainArgHandle {
    pub(crate) registry: u64,
    pub(crate) scope: ScopeId,
}

impl<T> FlagHandle<T> {
    pub(crate) fn new(registry: u64, scope: ScopeId, index: usize) -> Self {
        Self {
            registry,
            scope,
            index,
            _kind: PhantomData,
        }
    }

    pub fn scope(&self) -> ScopeId {
        self.scope
    }
}

impl<T> ListHandle<T> {
    pub(crate) fn new(registry: u64, scope: ScopeId, index: usize) -> Self {
        Self {
            registry,
            scope,
            index,
            _kind: PhantomData,
        }
    }

    pub fn scope(&self) -> ScopeId {
        self.scope
    }
}

impl SubcommandHandle {
    pub fn slot(&self) -> usize {
        self.slot
    }
}

impl MainArgHandle {
    pub fn scope(&self) -> ScopeId {
        self.scope
    }
}

// Manual impls so `T` itself needs none of these traits.
macro_rules! handle_impls {
    ($($handle:ident),*) => {$(
        impl<T> Clone for $handle<T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for $handle<T> {}

        impl<T> PartialEq for $handle<T> {
            fn eq(&self, other: &Self) -> bool {
                self.registry == other.registry
                    && self.scope == other.scope
                    && self.index == other.index
            }
        }

        impl<T> Eq for $handle<T> {}

        impl<T> fmt::Debug for $handle<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($handle))
                    .field("scope", &self.scope)
                    .field("index", &self.index)
                    .finish()
            }
        }
    )*};
}

handle_impls!(FlagHandle, ListHandle);
