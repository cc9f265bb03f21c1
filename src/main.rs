//! Purpose: `portable-json` CLI entry point and composition root.
//! Role: Binary crate root; resolves engine config, installs bindings, runs one command.
//! Invariants: stdout carries only JSON; diagnostics and logs go to stderr.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
//! Invariants: Commands only reach an engine through the installed bindings.
//! Notes: Colored `fmt --pretty` output uses the native writer's styled walk for layout.
use std::ffi::OsString;
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind};
use std::error::Error as StdError;
use tracing_subscriber::EnvFilter;

mod color_json;

use color_json::colorize_json;
use portable_json::api::{
    self, Bindings, EngineConfig, EngineKind, Error, ErrorKind, JsonValue, Map, NonFinitePolicy,
    to_exit_code,
};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    init_tracing();
    let exit_code = match run(std::env::args_os()) {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run<I>(args: I) -> Result<RunOutcome, (Error, ColorMode)>
where
    I: IntoIterator<Item = OsString>,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(clap_error_summary(&err))
                        .with_hint("Try `portable-json --help`."),
                    ColorMode::Auto,
                ));
            }
        },
    };

    let color_mode = cli.color;
    dispatch(cli).map_err(|err| (err, color_mode))
}

fn dispatch(cli: Cli) -> Result<RunOutcome, Error> {
    let config = resolve_config(&cli)?;
    let bindings = api::install(Bindings::from_config(&config))?;
    tracing::debug!(engine = %config.engine, command = cli.command.name(), "dispatching");

    match cli.command {
        Command::Fmt { input, .. } => {
            let value = read_value(bindings, input.as_deref())?;
            let use_color = cli.color.use_color(io::stdout().is_terminal());
            let text = if config.pretty && use_color {
                colorize_json(&value, config.serialize_options())?
            } else {
                bindings.serialize(&value)?
            };
            println!("{text}");
            Ok(RunOutcome::ok())
        }
        Command::Check { input } => {
            let value = read_value(bindings, input.as_deref())?;
            let mut report = Map::new();
            report.insert("valid", JsonValue::Bool(true));
            report.insert("kind", JsonValue::from(value.kind().as_str()));
            println!("{}", bindings.serialize(&JsonValue::Object(report))?);
            Ok(RunOutcome::ok())
        }
        Command::Eq { left, right } => {
            if left == "-" && right == "-" {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message("stdin can only be read once")
                    .with_hint("Pass at most one of LEFT and RIGHT as `-`."));
            }
            let left = read_value(bindings, Some(left.as_str()))?;
            let right = read_value(bindings, Some(right.as_str()))?;
            let equal = left == right;
            let mut report = Map::new();
            report.insert("equal", JsonValue::Bool(equal));
            println!("{}", bindings.serialize(&JsonValue::Object(report))?);
            Ok(if equal {
                RunOutcome::ok()
            } else {
                RunOutcome::with_code(1)
            })
        }
    }
}

#[derive(Parser)]
#[command(
    name = "portable-json",
    version,
    about = "Parse, check, and re-serialize JSON through a pluggable engine",
    long_about = None,
    after_help = r#"EXAMPLES
  $ echo '{"b":1,"a":[true,null]}' | portable-json fmt --pretty
  $ portable-json --engine serde-json check data.json
  $ portable-json eq left.json right.json

CONFIG
  --config takes a JSON object with optional keys
  engine, max_depth, pretty, non_finite. Flags override it."#,
    arg_required_else_help = true
)]
struct Cli {
    #[arg(long, value_enum, help = "JSON engine to install")]
    engine: Option<EngineArg>,
    #[arg(long, help = "Engine config file (JSON)", value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,
    #[arg(long, help = "Maximum array/object nesting depth (default: 1000)")]
    max_depth: Option<usize>,
    #[arg(long, value_enum, help = "How NaN and infinities serialize")]
    non_finite: Option<NonFiniteArg>,
    #[arg(
        long,
        default_value = "auto",
        value_enum,
        help = "Colorize stderr diagnostics and pretty JSON output: auto|always|never"
    )]
    color: ColorMode,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum EngineArg {
    Native,
    SerdeJson,
}

impl From<EngineArg> for EngineKind {
    fn from(value: EngineArg) -> Self {
        match value {
            EngineArg::Native => EngineKind::Native,
            EngineArg::SerdeJson => EngineKind::SerdeJson,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum NonFiniteArg {
    Reject,
    Null,
}

impl From<NonFiniteArg> for NonFinitePolicy {
    fn from(value: NonFiniteArg) -> Self {
        match value {
            NonFiniteArg::Reject => NonFinitePolicy::Reject,
            NonFiniteArg::Null => NonFinitePolicy::Null,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Parse input and print it re-serialized.
    Fmt {
        #[arg(
            help = "Input file (default: stdin; `-` also reads stdin)",
            value_hint = ValueHint::FilePath
        )]
        input: Option<String>,
        #[arg(long, help = "Pretty-print with two-space indentation")]
        pretty: bool,
    },
    /// Parse input and report the kind of its top-level value.
    Check {
        #[arg(
            help = "Input file (default: stdin; `-` also reads stdin)",
            value_hint = ValueHint::FilePath
        )]
        input: Option<String>,
    },
    /// Compare two documents structurally; exits 1 when they differ.
    Eq {
        #[arg(help = "Left input file (`-` for stdin)", value_hint = ValueHint::FilePath)]
        left: String,
        #[arg(help = "Right input file (`-` for stdin)", value_hint = ValueHint::FilePath)]
        right: String,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Fmt { .. } => "fmt",
            Command::Check { .. } => "check",
            Command::Eq { .. } => "eq",
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<EngineConfig, Error> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };
    if let Some(engine) = cli.engine {
        config.engine = engine.into();
    }
    if let Some(max_depth) = cli.max_depth {
        config.max_depth = max_depth;
    }
    if let Some(non_finite) = cli.non_finite {
        config.non_finite = non_finite.into();
    }
    if let Command::Fmt { pretty: true, .. } = cli.command {
        config.pretty = true;
    }
    Ok(config)
}

fn load_config(path: &Path) -> Result<EngineConfig, Error> {
    let text = fs::read_to_string(path).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to read config file")
            .with_path(path)
            .with_source(err)
    })?;
    EngineConfig::from_json(&text).map_err(|err| err.with_path(path))
}

fn read_value(bindings: &Bindings, input: Option<&str>) -> Result<JsonValue, Error> {
    match input {
        None | Some("-") => {
            let mut bytes = Vec::new();
            io::stdin().lock().read_to_end(&mut bytes).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("failed to read stdin")
                    .with_source(err)
            })?;
            bindings.parse_slice(&bytes)
        }
        Some(path) => {
            let bytes = fs::read(path).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("failed to read input file")
                    .with_path(path)
                    .with_source(err)
            })?;
            bindings
                .parse_slice(&bytes)
                .map_err(|err| err.with_path(path))
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum AnsiColor {
    Red,
    Yellow,
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", error_text(err, color_mode.use_color(is_tty)));
        return;
    }

    let json = serde_json::to_string(&error_json(err)).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
        ErrorKind::Syntax => "invalid json syntax".to_string(),
        ErrorKind::Encoding => "input is not valid utf-8".to_string(),
        ErrorKind::DepthExceeded => "nesting depth exceeded".to_string(),
        ErrorKind::TrailingData => "trailing data after json value".to_string(),
        ErrorKind::InvalidNumericValue => "non-finite number".to_string(),
        ErrorKind::Access => "value access failed".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> JsonValue {
    let mut inner = Map::new();
    inner.insert("kind", JsonValue::from(format!("{:?}", err.kind())));
    inner.insert("message", JsonValue::from(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint", JsonValue::from(hint));
    }
    if let Some(expected) = err.expected() {
        inner.insert("expected", JsonValue::from(expected));
    }
    if let Some(location) = err.location() {
        inner.insert("location", JsonValue::from(location));
    }
    if let Some(path) = err.path() {
        inner.insert("path", JsonValue::from(path.display().to_string()));
    }
    if let Some(offset) = err.offset() {
        inner.insert("offset", JsonValue::from(offset as f64));
    }
    if let Some(limit) = err.limit() {
        inner.insert("limit", JsonValue::from(limit as f64));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert(
            "causes",
            causes.into_iter().map(JsonValue::from).collect::<JsonValue>(),
        );
    }

    let mut outer = Map::new();
    outer.insert("error", JsonValue::Object(inner));
    JsonValue::Object(outer)
}

fn error_text(err: &Error, use_color: bool) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        error_message(err)
    ));

    if let Some(hint) = err.hint() {
        lines.push(format!(
            "{} {hint}",
            colorize_label("hint:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(path) = err.path() {
        lines.push(format!(
            "{} {}",
            colorize_label("path:", use_color, AnsiColor::Yellow),
            path.display()
        ));
    }
    if let Some(offset) = err.offset() {
        lines.push(format!(
            "{} {offset}",
            colorize_label("offset:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(expected) = err.expected() {
        lines.push(format!(
            "{} {expected}",
            colorize_label("expected:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(location) = err.location() {
        lines.push(format!(
            "{} {location}",
            colorize_label("at:", use_color, AnsiColor::Yellow)
        ));
    }

    let causes = error_causes(err);
    if let Some(cause) = causes.first() {
        lines.push(format!(
            "{} {cause}",
            colorize_label("caused by:", use_color, AnsiColor::Yellow)
        ));
    }

    lines.join("\n")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}
