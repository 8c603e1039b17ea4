mod declare;
mod logging;
mod manifest;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use drapeau_core::{Drapeau, ErrorKind};
use tracing::debug;

use crate::logging::LogLevel;
use crate::manifest::Manifest;
use crate::output::ParseReport;

/// Exit status for a rejected argument vector.
const PARSE_FAILURE: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Parse arguments against a drapeau manifest and print the values"
)]
struct Cli {
    /// Manifest declaring the program's flags, subcommands and main arguments
    #[arg(env = "DRAPEAU_MANIFEST")]
    manifest: PathBuf,

    /// Arguments handed to the parser, after `--`
    #[arg(last = true)]
    args: Vec<String>,

    /// Output compact JSON
    #[arg(long, env = "DRAPEAU_RAW")]
    raw: bool,

    /// Log verbosity
    #[arg(long, value_enum, default_value_t = LogLevel::Normal)]
    log_level: LogLevel,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.log_level);

    let manifest = Manifest::load(&cli.manifest)?;
    debug!(path = %cli.manifest.display(), "manifest loaded");

    let mut drapeau = declare::build(&manifest)?;
    let status = run(&mut drapeau, &cli.args, cli.raw);
    drapeau.close();

    status
}

fn run(drapeau: &mut Drapeau, args: &[String], raw: bool) -> Result<ExitCode> {
    if drapeau.parse(args.iter().cloned()).is_err() {
        let message = drapeau.last_error().unwrap_or_default();
        eprintln!("{} {}", "error:".red().bold(), message);
        // Empty-argument failures have already shown help.
        if drapeau.last_error_kind() != ErrorKind::EmptyArguments {
            drapeau.print_help().context("Failed to render help")?;
        }
        return Ok(ExitCode::from(PARSE_FAILURE));
    }

    if drapeau.is_help_requested() {
        drapeau.print_help().context("Failed to render help")?;
        return Ok(ExitCode::SUCCESS);
    }

    let report = ParseReport::collect(drapeau)?;
    println!("{}", report.render(raw)?);

    Ok(ExitCode::SUCCESS)
}
