//! Error types for the drapeau parser.
//!
//! Every fallible operation returns a [`DrapeauError`] and also leaves its
//! [`ErrorKind`] in the owning registry's [`ErrorReporter`], so a host can ask
//! for the last failure message after the fact.

use std::borrow::Cow;
use std::cell::Cell;

use thiserror::Error;

/// Upper bound, in characters, of the internal error message.
pub const INTERNAL_DETAIL_LIMIT: usize = 200;

/// Discriminant of the most recent failure held by an [`ErrorReporter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorKind {
    #[default]
    Ok,
    SubcommandFind,
    FlagFind,
    MainArgOverflow,
    InvalidNumber,
    LongFlagWithShortFlag,
    MissingValue,
    CapacityExceeded,
    DuplicateSubcommand,
    EmptyArguments,
    Internal,
}

impl ErrorKind {
    /// Fixed human-readable message for this kind.
    ///
    /// `Ok` has no message. `Internal` only has a generic one here; the
    /// reporter formats the detail string into it.
    pub fn message(self) -> Option<&'static str> {
        match self {
            ErrorKind::Ok => None,
            ErrorKind::SubcommandFind => Some("Cannot find an appropriate subcommand"),
            ErrorKind::FlagFind => Some("Cannot find an appropriate flag"),
            ErrorKind::MainArgOverflow => Some("Too many main arguments are given"),
            ErrorKind::InvalidNumber => Some("Invalid number or overflowed number is given"),
            ErrorKind::LongFlagWithShortFlag => Some("Long flags must start with `--`, not `-`"),
            ErrorKind::MissingValue => Some("A flag that takes a value was given none"),
            ErrorKind::CapacityExceeded => Some("Too many flags or subcommands are declared"),
            ErrorKind::DuplicateSubcommand => {
                Some("A subcommand with this name is already declared")
            }
            ErrorKind::EmptyArguments => Some("No arguments are given"),
            ErrorKind::Internal => Some("Internal error"),
        }
    }
}

/// Main error type of the parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrapeauError {
    /// Unknown subcommand token, or a declaration scoped to an unknown subcommand
    #[error("Cannot find an appropriate subcommand: {0}")]
    SubcommandFind(String),

    /// Unrecognized long or short flag
    #[error("Cannot find an appropriate flag: {0}")]
    FlagFind(String),

    /// More positional arguments than the scope can hold
    #[error("Too many main arguments are given (at most {0})")]
    MainArgOverflow(usize),

    /// Integer conversion failed or overflowed
    #[error("Invalid number or overflowed number is given: {0}")]
    InvalidNumber(String),

    /// A single dash followed by more than one character
    #[error("Long flags must start with `--`, not `-`: {0}")]
    LongFlagWithShortFlag(String),

    /// A value-taking flag was the last token
    #[error("Flag {0} requires a value")]
    MissingValue(String),

    /// A configured table limit was reached
    #[error("Cannot declare more {what} (limit is {limit})")]
    CapacityExceeded { what: &'static str, limit: usize },

    /// Subcommand names must be unique
    #[error("Subcommand `{0}` is already declared")]
    DuplicateSubcommand(String),

    /// Strict mode rejected an empty argument vector
    #[error("No arguments are given")]
    EmptyArguments,

    /// Unreachable-state guard
    #[error("Internal error was found at {0}")]
    Internal(String),
}

impl DrapeauError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DrapeauError::SubcommandFind(_) => ErrorKind::SubcommandFind,
            DrapeauError::FlagFind(_) => ErrorKind::FlagFind,
            DrapeauError::MainArgOverflow(_) => ErrorKind::MainArgOverflow,
            DrapeauError::InvalidNumber(_) => ErrorKind::InvalidNumber,
            DrapeauError::LongFlagWithShortFlag(_) => ErrorKind::LongFlagWithShortFlag,
            DrapeauError::MissingValue(_) => ErrorKind::MissingValue,
            DrapeauError::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            DrapeauError::DuplicateSubcommand(_) => ErrorKind::DuplicateSubcommand,
            DrapeauError::EmptyArguments => ErrorKind::EmptyArguments,
            DrapeauError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Result type alias for drapeau operations
pub type Result<T> = std::result::Result<T, DrapeauError>;

/// Single-slot holder of the most recent failure.
#[derive(Debug, Clone, Default)]
pub struct ErrorReporter {
    kind: ErrorKind,
    detail: Option<String>,
    read: Cell<bool>,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the slot with `err`.
    pub fn record(&mut self, err: &DrapeauError) {
        self.kind = err.kind();
        self.detail = match err {
            DrapeauError::Internal(detail) => {
                Some(bounded(detail, INTERNAL_DETAIL_LIMIT).into_owned())
            }
            _ => None,
        };
        self.read.set(false);
    }

    /// Record `err` only while no earlier failure is pending.
    ///
    /// Declarations use this so the first unread failure survives. A failure
    /// whose message was already read no longer counts as pending.
    pub fn record_first(&mut self, err: &DrapeauError) {
        if self.kind == ErrorKind::Ok || self.read.get() {
            self.record(err);
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn is_ok(&self) -> bool {
        self.kind == ErrorKind::Ok
    }

    /// Message for the pending failure, if any. Marks the failure as read.
    pub fn message(&self) -> Option<Cow<'static, str>> {
        if self.kind != ErrorKind::Ok {
            self.read.set(true);
        }
        match self.kind {
            ErrorKind::Internal => {
                let detail = self.detail.as_deref().unwrap_or("unknown location");
                let full = format!("Internal error was found at {detail}");
                Some(Cow::Owned(bounded(&full, INTERNAL_DETAIL_LIMIT).into_owned()))
            }
            kind => kind.message().map(Cow::Borrowed),
        }
    }

    pub fn clear(&mut self) {
        self.kind = ErrorKind::Ok;
        self.detail = None;
        self.read.set(false);
    }
}

fn bounded(text: &str, limit: usize) -> Cow<'_, str> {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => Cow::Owned(text[..cut].to_owned()),
        None => Cow::Borrowed(text),
    }
}
