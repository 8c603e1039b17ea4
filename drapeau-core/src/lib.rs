//! Core types and functionality for the drapeau flag parser.
//!
//! This crate provides the registry that command-line programs declare their
//! flags, subcommands and positional arguments on, the single-pass parser that
//! fills them in, and the help text renderer.

mod error;
mod config;
mod value;
mod list;
mod name_index;
mod flag;
mod scope;
mod handle;
mod help;
mod registry;
pub mod args_processor;

// Re-export core types
pub use error::{DrapeauError, ErrorKind, ErrorReporter, Result};
pub use config::ParserConfig;
pub use value::{is_truthy, parse_integer, FlagType, FlagValue, ValueKind};
pub use list::TypedList;
pub use name_index::{bucket_of, fnv1a, NameIndex};
pub use flag::Flag;
pub use scope::{MainArg, Scope, ScopeId, Subcommand};
pub use handle::{FlagHandle, ListHandle, MainArgHandle, SubcommandHandle};
pub use help::HelpFormatter;
pub use registry::{Drapeau, HELP_FLAG, NO_LONG, NO_SHORT, NO_SUBCMD, UNNAMED_PROGRAM};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
