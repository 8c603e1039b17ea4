//! Token classification.
//!
//! Turns a single raw argument into the shape the dispatcher routes on:
//! - the `--` separator
//! - long flags: `--name`
//! - short flags: `-c`
//! - positional values: anything not starting with `-`

/// Shape of one raw argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// `--`, skipped without ending flag parsing
    Separator,

    /// Anything not starting with `-`
    Positional(&'a str),

    /// `--name`, holding `name`
    Long(&'a str),

    /// `-c`
    Short(char),

    /// A single dash followed by more than one character, like `-ab`
    ShortCluster(&'a str),

    /// A lone `-`
    Dash,
}

/// Classify a raw argument.
pub fn classify(arg: &str) -> Token<'_> {
    if arg == "--" {
        return Token::Separator;
    }

    if let Some(name) = arg.strip_prefix("--") {
        return Token::Long(name);
    }

    let Some(rest) = arg.strip_prefix('-') else {
        return Token::Positional(arg);
    };

    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Token::Dash,
        (Some(short), None) => Token::Short(short),
        (Some(_), Some(_)) => Token::ShortCluster(arg),
    }
}

/// Whether `arg` ends a greedy list run.
///
/// Numeric lists keep consuming `-` tokens followed by a digit so negative
/// numbers make it in; bool and string lists stop at any `-` token.
pub fn looks_like_flag(arg: &str, numeric: bool) -> bool {
    let Some(rest) = arg.strip_prefix('-') else {
        return false;
    };

    if numeric {
        !rest.starts_with(|c: char| c.is_ascii_digit())
    } else {
        true
    }
}

/// Length of the run starting at `tokens[0]` that a list flag consumes.
pub fn list_run_len(tokens: &[String], numeric: bool) -> usize {
    tokens
        .iter()
        .position(|arg| looks_like_flag(arg, numeric))
        .unwrap_or(tokens.len())
}
