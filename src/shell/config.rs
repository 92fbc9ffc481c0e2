/*!
 * Simulator Configuration
 *
 * Sources, lowest to highest precedence:
 * - built-in defaults
 * - environment variables (MEMSIM_SIZE, MEMSIM_STRATEGY, MEMSIM_FILE, MEMSIM_OUTPUT)
 * - command-line flags
 */

use crate::core::limits::DEFAULT_MEMORY_SIZE;
use crate::core::types::Size;
use crate::memory::FitStrategy;
use miette::Diagnostic;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const ENV_SIZE: &str = "MEMSIM_SIZE";
pub const ENV_STRATEGY: &str = "MEMSIM_STRATEGY";
pub const ENV_FILE: &str = "MEMSIM_FILE";
pub const ENV_OUTPUT: &str = "MEMSIM_OUTPUT";

pub const USAGE: &str = "\
Usage: memsim [OPTIONS]

Options:
  -s, --size <UNITS>        Size of the simulated memory (default 100)
  -a, --strategy <NAME>     first | best | worst (default first)
  -f, --file <PATH>         Read commands from PATH instead of the prompt
  -c, --compact             Compact output: [P1: 10][Free: 90]
  -j, --json                JSON output for M and S
  -h, --help                Print this help

Environment:
  MEMSIM_SIZE, MEMSIM_STRATEGY, MEMSIM_FILE, MEMSIM_OUTPUT (table|compact|json)
  RUST_LOG, MEMSIM_TRACE_JSON

Commands:
  A <proc> <size> [used]    Allocate
  L <proc>                  Release
  M                         Show memory
  S                         Show statistics
  Q                         Quit (interactive only)
";

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ConfigError {
    #[error("Invalid memory size '{0}'")]
    #[diagnostic(
        code(config::invalid_size),
        help("The memory size must be a positive integer.")
    )]
    InvalidSize(String),

    #[error("Invalid strategy '{0}'")]
    #[diagnostic(
        code(config::invalid_strategy),
        help("Use first, best or worst (or 1, 2, 3).")
    )]
    InvalidStrategy(String),

    #[error("Invalid output mode '{0}'")]
    #[diagnostic(code(config::invalid_output), help("Use table, compact or json."))]
    InvalidOutput(String),

    #[error("Missing value for {0}")]
    #[diagnostic(code(config::missing_value))]
    MissingValue(String),

    #[error("Unknown option '{0}'")]
    #[diagnostic(code(config::unknown_option), help("Run with --help for usage."))]
    UnknownOption(String),
}

/// Where commands come from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputSource {
    #[default]
    Interactive,
    File(PathBuf),
}

/// How `M` and `S` are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Table,
    Compact,
    Json,
}

impl FromStr for OutputMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(OutputMode::Table),
            "compact" => Ok(OutputMode::Compact),
            "json" => Ok(OutputMode::Json),
            _ => Err(ConfigError::InvalidOutput(s.to_string())),
        }
    }
}

/// Simulator configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub memory_size: Size,
    pub strategy: FitStrategy,
    pub input: InputSource,
    pub output: OutputMode,
    /// Size or strategy came from a flag or the environment
    pub explicit: bool,
    pub show_help: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_SIZE,
            strategy: FitStrategy::FirstFit,
            input: InputSource::Interactive,
            output: OutputMode::Table,
            explicit: false,
            show_help: false,
        }
    }
}

impl SimConfig {
    /// Build from the process arguments and environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_sources(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    /// Build from explicit arguments (without the program name) and an
    /// environment lookup
    pub fn from_sources<I, E>(args: I, env: E) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
        E: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(size) = env(ENV_SIZE) {
            config.memory_size = parse_memory_size(&size)?;
            config.explicit = true;
        }
        if let Some(strategy) = env(ENV_STRATEGY) {
            config.strategy = parse_strategy(&strategy)?;
            config.explicit = true;
        }
        if let Some(path) = env(ENV_FILE).filter(|p| !p.trim().is_empty()) {
            config.input = InputSource::File(PathBuf::from(path));
        }
        if let Some(output) = env(ENV_OUTPUT) {
            config.output = output.parse()?;
        }

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            // Accept both `--size 64` and `--size=64`
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => {
                    (flag.to_string(), Some(value.to_string()))
                }
                _ => (arg.clone(), None),
            };
            let mut value = |name: &str| {
                inline
                    .clone()
                    .or_else(|| args.next())
                    .ok_or_else(|| ConfigError::MissingValue(name.to_string()))
            };

            match flag.as_str() {
                "-s" | "--size" => {
                    config.memory_size = parse_memory_size(&value("--size")?)?;
                    config.explicit = true;
                }
                "-a" | "--strategy" => {
                    config.strategy = parse_strategy(&value("--strategy")?)?;
                    config.explicit = true;
                }
                "-f" | "--file" => {
                    config.input = InputSource::File(PathBuf::from(value("--file")?));
                }
                "-o" | "--output" => config.output = value("--output")?.parse()?,
                "-c" | "--compact" => config.output = OutputMode::Compact,
                "-j" | "--json" => config.output = OutputMode::Json,
                "-h" | "--help" => config.show_help = true,
                _ => return Err(ConfigError::UnknownOption(arg)),
            }
        }

        Ok(config)
    }
}

pub fn parse_memory_size(value: &str) -> Result<Size, ConfigError> {
    match value.trim().parse::<Size>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(ConfigError::InvalidSize(value.to_string())),
    }
}

fn parse_strategy(value: &str) -> Result<FitStrategy, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidStrategy(value.to_string()))
}
