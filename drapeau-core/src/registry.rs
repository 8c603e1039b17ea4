//! The registry context: declarations, parsing and value lookup.

use std::borrow::Cow;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use crate::args_processor::Dispatcher;
use crate::config::ParserConfig;
use crate::error::{DrapeauError, ErrorKind, ErrorReporter, Result};
use crate::flag::Flag;
use crate::handle::{FlagHandle, ListHandle, MainArgHandle, SubcommandHandle};
use crate::help::HelpFormatter;
use crate::name_index::NameIndex;
use crate::scope::{Scope, ScopeId, Subcommand};
use crate::value::{FlagType, FlagValue};

/// No short name for a flag.
pub const NO_SHORT: Option<char> = None;
/// No long name for a flag.
pub const NO_LONG: &str = "";
/// Declare in the global scope.
pub const NO_SUBCMD: Option<&str> = None;

/// Program name used by help when none was given.
pub const UNNAMED_PROGRAM: &str = "(*.*)";

pub const HELP_FLAG: &str = "help";
const HELP_DESCRIPTION: &str = "Print this help message";

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Owns every declared flag, subcommand and positional slot.
///
/// Declare everything first, call [`Drapeau::parse`] once, then read values
/// back through the handles the declarations returned.
///
/// ```
/// use drapeau_core::{Drapeau, NO_SUBCMD};
///
/// let mut drapeau = Drapeau::start("vesti", "A preprocessor for LaTeX");
/// let count = drapeau.declare_flag("count", 'c', 0_i32, "how many", NO_SUBCMD).unwrap();
/// drapeau.parse(["--count", "42"]).unwrap();
/// assert_eq!(*drapeau.get(&count).unwrap(), 42);
/// ```
#[derive(Debug)]
pub struct Drapeau {
    id: u64,
    name: Option<String>,
    description: Option<String>,
    pub(crate) config: ParserConfig,
    pub(crate) global: Scope,
    pub(crate) subcommands: Vec<Subcommand>,
    pub(crate) index: NameIndex,
    pub(crate) active: Option<usize>,
    help_flags: Vec<FlagHandle<bool>>,
    reporter: ErrorReporter,
    parsed: bool,
}

impl Drapeau {
    /// Create a registry with the default configuration.
    pub fn start(name: &str, description: &str) -> Self {
        Self::with_config(name, description, ParserConfig::default())
    }

    /// Create a registry and declare the global `help` flag.
    pub fn with_config(name: &str, description: &str, config: ParserConfig) -> Self {
        let mut drapeau = Self {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            name: non_empty(name),
            description: non_empty(description),
            index: NameIndex::new(config.hash_buckets),
            config,
            global: Scope::default(),
            subcommands: Vec::new(),
            active: None,
            help_flags: Vec::new(),
            reporter: ErrorReporter::new(),
            parsed: false,
        };
        drapeau.declare_help(None);
        debug!(program = drapeau.name(), "registry started");
        drapeau
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED_PROGRAM)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Declare a scalar flag. `long` may be [`NO_LONG`] and `short` may be
    /// [`NO_SHORT`], but not both.
    pub fn declare_flag<T: FlagType>(
        &mut self,
        long: &str,
        short: impl Into<Option<char>>,
        default: T,
        description: &str,
        subcmd: Option<&str>,
    ) -> Result<FlagHandle<T>> {
        let flag = Flag::scalar(non_empty(long), short.into(), default, description);
        let result = self
            .add_flag(subcmd, flag)
            .map(|(scope, index)| FlagHandle::new(self.id, scope, index));
        self.declaration(result)
    }

    /// Declare a list flag whose elements are of type `T`.
    pub fn declare_list_flag<T: FlagType>(
        &mut self,
        long: &str,
        short: impl Into<Option<char>>,
        description: &str,
        subcmd: Option<&str>,
    ) -> Result<ListHandle<T>> {
        let flag = Flag::list(non_empty(long), short.into(), T::KIND, description);
        let result = self
            .add_flag(subcmd, flag)
            .map(|(scope, index)| ListHandle::new(self.id, scope, index));
        self.declaration(result)
    }

    /// Declare a subcommand together with its own `help` flag.
    pub fn declare_subcommand(
        &mut self,
        name: &str,
        description: &str,
    ) -> Result<SubcommandHandle> {
        let result = self.add_subcommand(name, description);
        self.declaration(result)
    }

    /// Declare the positional argument of a scope.
    pub fn declare_main_arg(
        &mut self,
        name: &str,
        description: &str,
        subcmd: Option<&str>,
    ) -> Result<MainArgHandle> {
        let result = self.add_main_arg(name, description, subcmd);
        self.declaration(result)
    }

    /// Parse `args`, which must not include the program name.
    ///
    /// A registry parses once; later calls fail without touching any value.
    pub fn parse<I, S>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.parsed {
            warn!("registry parsed more than once");
            return self.fail(DrapeauError::Internal("registry already parsed".into()));
        }
        self.parsed = true;

        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        debug!(count = args.len(), "parsing arguments");

        if args.is_empty() && !self.config.allow_empty_arguments {
            if let Err(err) = self.print_help() {
                warn!(error = %err, "failed to render help");
            }
            return self.fail(DrapeauError::EmptyArguments);
        }

        let result = Dispatcher::new(self, &args).run();
        result.or_else(|err| self.fail(err))
    }

    /// Parse the arguments of the current process.
    pub fn parse_env(&mut self) -> Result<()> {
        let args: Vec<String> = std::env::args_os()
            .skip(1)
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        self.parse(args)
    }

    /// Current value of a scalar flag.
    pub fn get<T: FlagType>(&self, handle: &FlagHandle<T>) -> Result<&T> {
        let flag = self.flag_for(handle.registry, handle.scope, handle.index)?;
        T::from_value(flag.value()).ok_or_else(|| {
            DrapeauError::Internal(format!("{} does not hold a {}", flag.display_name(), T::KIND))
        })
    }

    /// Default value of a scalar flag.
    pub fn default_of<T: FlagType>(&self, handle: &FlagHandle<T>) -> Result<&T> {
        let flag = self.flag_for(handle.registry, handle.scope, handle.index)?;
        T::from_value(flag.default_value()).ok_or_else(|| {
            DrapeauError::Internal(format!("{} does not hold a {}", flag.display_name(), T::KIND))
        })
    }

    /// Accumulated values of a list flag.
    pub fn list<T: FlagType>(&self, handle: &ListHandle<T>) -> Result<&[T]> {
        let flag = self.flag_for(handle.registry, handle.scope, handle.index)?;
        match flag.value() {
            FlagValue::List(list) => T::from_list(list),
            _ => None,
        }
        .ok_or_else(|| {
            DrapeauError::Internal(format!("{} is not a list of {}", flag.display_name(), T::KIND))
        })
    }

    /// Whether the subcommand was selected by the last parse.
    pub fn is_active(&self, handle: &SubcommandHandle) -> bool {
        handle.registry == self.id
            && self
                .subcommands
                .get(handle.slot)
                .is_some_and(Subcommand::is_active)
    }

    /// Positional values collected for a scope.
    pub fn main_args(&self, handle: &MainArgHandle) -> Result<&[String]> {
        self.check_owner(handle.registry)?;
        Ok(self.scope(handle.scope)?.main_arg().values())
    }

    pub fn global_scope(&self) -> &Scope {
        &self.global
    }

    pub fn subcommands(&self) -> &[Subcommand] {
        &self.subcommands
    }

    /// Slot of a subcommand in the name index.
    pub fn subcommand_slot(&self, name: &str) -> Option<usize> {
        self.index.find(name)
    }

    pub fn active_subcommand(&self) -> Option<&Subcommand> {
        self.active.and_then(|slot| self.subcommands.get(slot))
    }

    /// Scope selected by the last parse, global when none was.
    pub fn active_scope(&self) -> &Scope {
        self.active_subcommand()
            .map_or(&self.global, Subcommand::scope)
    }

    /// True when the global or any subcommand `help` flag was set.
    pub fn is_help_requested(&self) -> bool {
        self.help_flags
            .iter()
            .any(|handle| self.get(handle).is_ok_and(|set| *set))
    }

    pub fn write_help<W: Write>(&self, out: &mut W) -> io::Result<()> {
        HelpFormatter::new(self).write(out)
    }

    /// Render help for the active scope to stderr.
    pub fn print_help(&self) -> io::Result<()> {
        let stderr = io::stderr();
        let mut out = stderr.lock();
        self.write_help(&mut out)
    }

    /// Message of the most recent failure.
    pub fn last_error(&self) -> Option<Cow<'static, str>> {
        self.reporter.message()
    }

    pub fn last_error_kind(&self) -> ErrorKind {
        self.reporter.kind()
    }

    pub fn clear_error(&mut self) {
        self.reporter.clear();
    }

    /// Release every list buffer and unchain the name index.
    pub fn close(mut self) {
        self.index.clear();
        self.global.release();
        for subcommand in &mut self.subcommands {
            subcommand.scope_mut().release();
        }
        debug!(program = self.name(), "registry closed");
    }

    pub(crate) fn scope(&self, id: ScopeId) -> Result<&Scope> {
        match id {
            ScopeId::Global => Ok(&self.global),
            ScopeId::Subcommand(slot) => self
                .subcommands
                .get(slot)
                .map(Subcommand::scope)
                .ok_or_else(|| DrapeauError::Internal(format!("subcommand slot {slot}"))),
        }
    }

    pub(crate) fn scope_mut(&mut self, id: ScopeId) -> Result<&mut Scope> {
        match id {
            ScopeId::Global => Ok(&mut self.global),
            ScopeId::Subcommand(slot) => self
                .subcommands
                .get_mut(slot)
                .map(Subcommand::scope_mut)
                .ok_or_else(|| DrapeauError::Internal(format!("subcommand slot {slot}"))),
        }
    }

    fn scope_of(&self, subcmd: Option<&str>) -> Result<ScopeId> {
        match subcmd {
            None => Ok(ScopeId::Global),
            Some(name) => self
                .index
                .find(name)
                .map(ScopeId::Subcommand)
                .ok_or_else(|| DrapeauError::SubcommandFind(name.to_owned())),
        }
    }

    fn add_flag(&mut self, subcmd: Option<&str>, flag: Flag) -> Result<(ScopeId, usize)> {
        if flag.long_name().is_none() && flag.short_name().is_none() {
            return Err(DrapeauError::Internal("flag declared without a name".into()));
        }

        let scope = self.scope_of(subcmd)?;
        let limit = self.config.max_flags;
        let name = flag.display_name();
        let index = self.scope_mut(scope)?.push_flag(flag, limit)?;
        debug!(flag = %name, ?scope, index, "flag declared");

        Ok((scope, index))
    }

    fn add_subcommand(&mut self, name: &str, description: &str) -> Result<SubcommandHandle> {
        let limit = self.config.max_subcommands;
        if self.subcommands.len() >= limit {
            return Err(DrapeauError::CapacityExceeded { what: "subcommands", limit });
        }

        let slot = self
            .index
            .insert(name)
            .ok_or_else(|| DrapeauError::DuplicateSubcommand(name.to_owned()))?;
        if slot != self.subcommands.len() {
            return Err(DrapeauError::Internal(format!("name index slot {slot} out of step")));
        }
        self.subcommands.push(Subcommand::new(name, description));
        debug!(subcommand = name, slot, "subcommand declared");

        self.declare_help(Some(name));

        Ok(SubcommandHandle {
            registry: self.id,
            slot,
        })
    }

    fn add_main_arg(
        &mut self,
        name: &str,
        description: &str,
        subcmd: Option<&str>,
    ) -> Result<MainArgHandle> {
        let scope = self.scope_of(subcmd)?;
        let capacity = self.config.max_main_args;
        self.scope_mut(scope)?
            .main_arg_mut()
            .declare(name, description, capacity);
        debug!(main_arg = name, ?scope, "main argument declared");

        Ok(MainArgHandle {
            registry: self.id,
            scope,
        })
    }

    fn declare_help(&mut self, subcmd: Option<&str>) {
        match self.declare_flag(HELP_FLAG, NO_SHORT, false, HELP_DESCRIPTION, subcmd) {
            Ok(handle) => self.help_flags.push(handle),
            Err(err) => warn!(error = %err, "help flag not declared"),
        }
    }

    fn flag_for(&self, registry: u64, scope: ScopeId, index: usize) -> Result<&Flag> {
        self.check_owner(registry)?;
        self.scope(scope)?
            .flag(index)
            .ok_or_else(|| DrapeauError::Internal(format!("flag index {index}")))
    }

    fn check_owner(&self, registry: u64) -> Result<()> {
        if registry == self.id {
            Ok(())
        } else {
            Err(DrapeauError::Internal("handle from another registry".into()))
        }
    }

    /// Declaration failures keep the first pending error.
    fn declaration<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            warn!(error = %err, "declaration failed");
            self.reporter.record_first(err);
        }
        result
    }

    fn fail<T>(&mut self, err: DrapeauError) -> Result<T> {
        self.reporter.record(&err);
        Err(err)
    }
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_owned())
}
