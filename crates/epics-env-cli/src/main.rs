// crates/epics-env-cli/src/main.rs
// ============================================================================
// Module: EPICS Environment CLI Entry Point
// Description: Command dispatcher for parameter lookup and reporting.
// Purpose: Resolve, print, and apply EPICS environment parameters from a shell.
// Dependencies: clap, epics-env, thiserror, tracing, tracing-subscriber.
// ============================================================================

//! ## Overview
//! The `epics-env` CLI resolves EPICS configuration parameters against the
//! process environment. Writes (`--define`, `site`) land in an in-memory
//! overlay so the real process environment is never mutated; the overlay is
//! visible to every lookup performed by the same invocation.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use epics_env::ConfigParam;
use epics_env::ConfigParamAccessor;
use epics_env::EnvSource;
use epics_env::OverlayEnv;
use epics_env::ParamCatalog;
use epics_env::ParamError;
use epics_env::ProcessEnv;
use epics_env::TYPED_VALUE_CAPACITY;
use thiserror::Error;
use tracing::Level;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "epics-env", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Parameter catalog file (overrides `EPICS_ENV_CATALOG`).
    #[arg(long, value_name = "PATH", global = true)]
    catalog: Option<PathBuf>,
    /// Set a parameter for this invocation (repeatable).
    #[arg(long = "define", value_name = "NAME=VALUE", value_parser = parse_define, global = true)]
    defines: Vec<Define>,
    /// Increase log verbosity (`-v` warn, `-vv` info, `-vvv` debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a single parameter and print its value.
    Get(GetCommand),
    /// Print parameters as `NAME: VALUE` (all catalog parameters by default).
    Print(PrintCommand),
    /// Apply the catalog's site assignments, then print every parameter.
    Site,
    /// List catalog parameters with their defaults.
    List,
}

/// Arguments for `get`.
#[derive(Args, Debug)]
struct GetCommand {
    /// Parameter name.
    name: String,
    /// Interpretation of the value.
    #[arg(long = "as", value_enum, default_value_t = ValueAs::String)]
    value_as: ValueAs,
    /// Buffer capacity for string lookups (value is truncated to capacity - 1).
    #[arg(long, value_name = "N", default_value_t = TYPED_VALUE_CAPACITY)]
    capacity: usize,
}

/// Arguments for `print`.
#[derive(Args, Debug)]
struct PrintCommand {
    /// Parameter names to print.
    names: Vec<String>,
}

/// Value interpretations supported by `get`.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum ValueAs {
    /// Raw text.
    String,
    /// Base-10 signed integer.
    Long,
    /// Floating-point number.
    Double,
    /// Dotted-quad IPv4 address.
    Inet,
}

/// `NAME=VALUE` pair supplied with `--define`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Define {
    /// Parameter name.
    name: String,
    /// Value to set.
    value: String,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

impl From<ParamError> for CliError {
    fn from(error: ParamError) -> Self {
        Self::new(error.to_string())
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("epics-env {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let catalog = ParamCatalog::load(cli.catalog.as_deref(), &ProcessEnv)
        .map_err(|err| CliError::new(err.to_string()))?;
    let accessor = ConfigParamAccessor::new(OverlayEnv::new(ProcessEnv));
    apply_defines(&accessor, &catalog, &cli.defines)?;

    let Some(command) = cli.command else {
        return command_print_all(&accessor, &catalog, &mut std::io::stdout().lock());
    };

    let mut stdout = std::io::stdout().lock();
    match command {
        Commands::Get(command) => command_get(&accessor, &catalog, &command, &mut stdout),
        Commands::Print(command) => command_print(&accessor, &catalog, &command, &mut stdout),
        Commands::Site => command_site(&accessor, &catalog, &mut stdout),
        Commands::List => command_list(&catalog, &mut stdout),
    }
}

/// Installs the stderr log subscriber.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        _ => Level::DEBUG,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes `get`.
fn command_get<S: EnvSource, W: Write>(
    accessor: &ConfigParamAccessor<S>,
    catalog: &ParamCatalog,
    command: &GetCommand,
    out: &mut W,
) -> CliResult<ExitCode> {
    let param = resolve_param(catalog, &command.name)?;
    let rendered = match command.value_as {
        ValueAs::String => {
            accessor.get_string(&param, command.capacity).ok_or_else(|| ParamError::Absent {
                name: param.name().to_string(),
            })?
        }
        ValueAs::Long => accessor.get_long(&param)?.to_string(),
        ValueAs::Double => accessor.get_double(&param)?.to_string(),
        ValueAs::Inet => accessor.get_inet_addr(&param)?.to_string(),
    };
    writeln!(out, "{rendered}").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `print`.
fn command_print<S: EnvSource, W: Write>(
    accessor: &ConfigParamAccessor<S>,
    catalog: &ParamCatalog,
    command: &PrintCommand,
    out: &mut W,
) -> CliResult<ExitCode> {
    if command.names.is_empty() {
        return command_print_all(accessor, catalog, out);
    }
    for name in &command.names {
        let param = resolve_param(catalog, name)?;
        accessor.print(&param, out).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Prints every catalog parameter.
fn command_print_all<S: EnvSource, W: Write>(
    accessor: &ConfigParamAccessor<S>,
    catalog: &ParamCatalog,
    out: &mut W,
) -> CliResult<ExitCode> {
    accessor
        .print_all(catalog.params(), out)
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `site`.
fn command_site<S: EnvSource, W: Write>(
    accessor: &ConfigParamAccessor<S>,
    catalog: &ParamCatalog,
    out: &mut W,
) -> CliResult<ExitCode> {
    accessor.apply_site(catalog.site())?;
    command_print_all(accessor, catalog, out)
}

/// Executes `list`.
fn command_list<W: Write>(catalog: &ParamCatalog, out: &mut W) -> CliResult<ExitCode> {
    for param in catalog.params() {
        writeln!(out, "{}={}", param.name(), param.default_value().unwrap_or(""))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Applies `--define` values through the accessor.
fn apply_defines<S: EnvSource>(
    accessor: &ConfigParamAccessor<S>,
    catalog: &ParamCatalog,
    defines: &[Define],
) -> CliResult<()> {
    for define in defines {
        let param = resolve_param(catalog, &define.name)?;
        accessor.set(&param, &define.value)?;
    }
    Ok(())
}

/// Returns the catalog parameter named `name`, or an ad-hoc one without a
/// default.
fn resolve_param(catalog: &ParamCatalog, name: &str) -> CliResult<ConfigParam> {
    if let Some(param) = catalog.find(name) {
        return Ok(param.clone());
    }
    Ok(ConfigParam::try_new(name, "")?)
}

/// Parses a `NAME=VALUE` argument.
fn parse_define(raw: &str) -> Result<Define, String> {
    let (name, value) =
        raw.split_once('=').ok_or_else(|| format!("expected NAME=VALUE, got \"{raw}\""))?;
    if name.trim().is_empty() {
        return Err("define name must be non-empty".to_string());
    }
    Ok(Define {
        name: name.trim().to_string(),
        value: value.to_string(),
    })
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
