//! Parse-time dispatcher.
//!
//! Walks the argument vector once, first choosing the active scope and then
//! routing every token to positional collection or to the matching flag.

use tracing::{debug, trace};

use super::parser::{classify, list_run_len, Token};
use crate::error::{DrapeauError, Result};
use crate::registry::Drapeau;
use crate::scope::ScopeId;
use crate::value::FlagValue;

#[derive(Debug)]
enum State {
    ScopeSelection,
    TokenLoop(ScopeId),
    Done,
    Failed(DrapeauError),
}

pub(crate) struct Dispatcher<'a> {
    registry: &'a mut Drapeau,
    args: &'a [String],
    cursor: usize,
}

impl<'a> Dispatcher<'a> {
    pub(crate) fn new(registry: &'a mut Drapeau, args: &'a [String]) -> Self {
        Self {
            registry,
            args,
            cursor: 0,
        }
    }

    pub(crate) fn run(mut self) -> Result<()> {
        let mut state = State::ScopeSelection;
        loop {
            state = match state {
                State::ScopeSelection => match self.select_scope() {
                    Ok(scope) => State::TokenLoop(scope),
                    Err(err) => State::Failed(err),
                },
                State::TokenLoop(scope) => match self.step(scope) {
                    Ok(true) => State::TokenLoop(scope),
                    Ok(false) => State::Done,
                    Err(err) => State::Failed(err),
                },
                State::Done => {
                    debug!(consumed = self.cursor, "parse finished");
                    return Ok(());
                }
                State::Failed(err) => {
                    debug!(at = self.cursor, error = %err, "parse failed");
                    return Err(err);
                }
            };
        }
    }

    /// Global scope unless subcommands exist and the first token is not a flag.
    fn select_scope(&mut self) -> Result<ScopeId> {
        let Some(first) = self.args.first() else {
            return Ok(ScopeId::Global);
        };

        if self.registry.subcommands.is_empty() || first.starts_with('-') {
            return Ok(ScopeId::Global);
        }

        let slot = self
            .registry
            .index
            .find(first)
            .ok_or_else(|| DrapeauError::SubcommandFind(first.clone()))?;
        let subcommand = self
            .registry
            .subcommands
            .get_mut(slot)
            .ok_or_else(|| DrapeauError::Internal(format!("subcommand slot {slot}")))?;

        subcommand.activate();
        self.registry.active = Some(slot);
        self.cursor = 1;
        debug!(subcommand = %first, slot, "subcommand selected");

        Ok(ScopeId::Subcommand(slot))
    }

    /// Handle the token under the cursor. Returns false once input is exhausted.
    fn step(&mut self, scope: ScopeId) -> Result<bool> {
        let args = self.args;
        let Some(arg) = args.get(self.cursor) else {
            return Ok(false);
        };

        match classify(arg) {
            Token::Separator => {
                trace!("skipping separator");
                self.cursor += 1;
            }
            Token::Positional(value) => {
                let capacity = self.registry.config.max_main_args;
                self.registry
                    .scope_mut(scope)?
                    .main_arg_mut()
                    .push(value, capacity)?;
                trace!(value, "positional value");
                self.cursor += 1;
            }
            Token::Long(name) => {
                let index = self
                    .registry
                    .scope(scope)?
                    .find_long(name)
                    .ok_or_else(|| DrapeauError::FlagFind(arg.clone()))?;
                self.cursor += 1;
                self.consume(scope, index)?;
            }
            Token::Short(short) => {
                let index = self
                    .registry
                    .scope(scope)?
                    .find_short(short)
                    .ok_or_else(|| DrapeauError::FlagFind(arg.clone()))?;
                self.cursor += 1;
                self.consume(scope, index)?;
            }
            Token::ShortCluster(cluster) => {
                return Err(DrapeauError::LongFlagWithShortFlag(cluster.to_owned()));
            }
            Token::Dash => {
                return Err(DrapeauError::FlagFind(arg.clone()));
            }
        }

        Ok(true)
    }

    /// Consume the value tokens of the flag at `index`.
    fn consume(&mut self, scope: ScopeId, index: usize) -> Result<()> {
        let args = self.args;
        let rest = &args[self.cursor..];
        let flag = self
            .registry
            .scope_mut(scope)?
            .flag_mut(index)
            .ok_or_else(|| DrapeauError::Internal(format!("flag index {index}")))?;
        let name = flag.display_name();

        match flag.value_mut() {
            FlagValue::Bool(value) => {
                *value = true;
                trace!(flag = %name, "switch set");
            }
            FlagValue::String(value) => {
                let token = rest
                    .first()
                    .ok_or_else(|| DrapeauError::MissingValue(name.clone()))?;
                value.clone_from(token);
                self.cursor += 1;
                trace!(flag = %name, value = %token, "string set");
            }
            FlagValue::List(list) => {
                let run = list_run_len(rest, list.kind().is_numeric());
                list.append_tokens(&rest[..run])
                    .map_err(DrapeauError::InvalidNumber)?;
                self.cursor += run;
                trace!(flag = %name, appended = run, total = list.len(), "list extended");
            }
            value => {
                let token = rest
                    .first()
                    .ok_or_else(|| DrapeauError::MissingValue(name.clone()))?;
                if !value.assign_integer(token) {
                    return Err(DrapeauError::InvalidNumber(token.clone()));
                }
                self.cursor += 1;
                trace!(flag = %name, value = %token, "integer set");
            }
        }

        Ok(())
    }
}
