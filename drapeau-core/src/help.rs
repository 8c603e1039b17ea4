//! Help text rendering.
//!
//! Columns are padded to the longest name seen so far plus four spaces. The
//! positional line is padded before flag names are measured, and subcommand
//! names only widen the subcommand listing.

use std::io::{self, Write};

use crate::flag::Flag;
use crate::registry::Drapeau;
use crate::scope::Scope;

const COLUMN_GAP: usize = 4;

/// Writes the help text for the active scope of a registry.
pub struct HelpFormatter<'a> {
    drapeau: &'a Drapeau,
}

impl<'a> HelpFormatter<'a> {
    pub fn new(drapeau: &'a Drapeau) -> Self {
        Self { drapeau }
    }

    pub fn write<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let program = self.drapeau.name();

        if let Some(description) = self.drapeau.description() {
            write!(out, "{description}\n\n")?;
        }

        match self.drapeau.active_subcommand() {
            Some(subcommand) => {
                write!(out, "Usage: {program} {} [ARGS] [FLAGS]\n\n", subcommand.name())?;
                self.write_scope(out, subcommand.scope())?;
            }
            None => {
                let subcommands = self.drapeau.subcommands();
                if subcommands.is_empty() {
                    write!(out, "Usage: {program} [ARGS] [FLAGS]\n\n")?;
                } else {
                    write!(out, "Usage: {program} [SUBCOMMANDS] [ARGS] [FLAGS]\n\n")?;
                }

                let mut width = self.write_scope(out, self.drapeau.global_scope())?;

                if !subcommands.is_empty() {
                    writeln!(out, "\nSubcommands:")?;
                    for subcommand in subcommands {
                        width = width.max(text_width(subcommand.name()));
                    }
                    for subcommand in subcommands {
                        writeln!(
                            out,
                            "    {:<pad$}{}",
                            subcommand.name(),
                            subcommand.description(),
                            pad = width + COLUMN_GAP
                        )?;
                    }
                }
            }
        }

        out.flush()
    }

    /// Writes the `Args:` and `Options:` sections and returns the name width.
    fn write_scope<W: Write>(&self, out: &mut W, scope: &Scope) -> io::Result<usize> {
        let mut width = 0;

        let main_arg = scope.main_arg();
        if let Some(name) = main_arg.name() {
            width = text_width(name);
            writeln!(out, "Args:")?;
            writeln!(
                out,
                "     {:<pad$}{}",
                name,
                main_arg.description(),
                pad = width + COLUMN_GAP
            )?;
        }

        writeln!(out, "Options:")?;
        for flag in scope.flags() {
            width = width.max(flag.long_name().map_or(0, text_width));
        }
        for flag in scope.flags() {
            write_flag(out, flag, width + COLUMN_GAP)?;
        }

        Ok(width)
    }
}

fn write_flag<W: Write>(out: &mut W, flag: &Flag, pad: usize) -> io::Result<()> {
    match (flag.long_name(), flag.short_name()) {
        (Some(long), _) => writeln!(out, "    --{long:<pad$}{}", flag.description()),
        (None, Some(short)) => writeln!(out, "    -{short:<pad$}{}", flag.description()),
        (None, None) => Ok(()),
    }
}

fn text_width(text: &str) -> usize {
    text.chars().count()
}
