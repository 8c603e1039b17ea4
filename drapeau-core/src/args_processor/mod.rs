//! Command argument processing.
//!
//! `parser` classifies individual tokens; `processor` drives the parse state
//! machine over a registry.

mod parser;
mod processor;

pub use parser::{classify, list_run_len, looks_like_flag, Token};
pub(crate) use processor::Dispatcher;
