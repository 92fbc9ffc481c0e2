/*!
 * Command Parsing
 * Line grammar for allocation scripts and the interactive prompt
 */

use crate::core::types::Size;
use crate::core::OwnerName;
use miette::Diagnostic;
use std::str::FromStr;
use thiserror::Error;

/// Parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `A <owner> <size> [<used>]`
    Allocate {
        owner: OwnerName,
        size: Size,
        used: Option<Size>,
    },
    /// `L <owner>`
    Deallocate { owner: OwnerName },
    /// `M`
    Display,
    /// `S`
    Stats,
    /// `Q`
    Quit,
}

/// Command parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum CommandError {
    #[error("Unknown command '{0}'")]
    #[diagnostic(
        code(command::unknown),
        help("Commands: A <proc> <size> [used], L <proc>, M, S, Q")
    )]
    Unknown(char),

    #[error("Missing argument: {0}")]
    #[diagnostic(code(command::missing_argument))]
    MissingArgument(&'static str),

    #[error("Invalid number: '{0}'")]
    #[diagnostic(
        code(command::invalid_number),
        help("Sizes are non-negative integers in address units.")
    )]
    InvalidNumber(String),

    #[error("Unexpected trailing input: '{0}'")]
    #[diagnostic(code(command::trailing_input))]
    TrailingInput(String),
}

impl Command {
    /// Parse one line, returning `None` for blank lines and `#` comments
    pub fn parse_line(line: &str) -> Option<Result<Command, CommandError>> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }
        Some(trimmed.parse())
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let keyword = tokens
            .next()
            .ok_or(CommandError::MissingArgument("command"))?;

        let mut letters = keyword.chars();
        let letter = letters
            .next()
            .ok_or(CommandError::MissingArgument("command"))?;
        if letters.next().is_some() {
            return Err(CommandError::Unknown(letter));
        }

        let command = match letter.to_ascii_uppercase() {
            'A' => {
                let owner = tokens
                    .next()
                    .ok_or(CommandError::MissingArgument("process name"))?;
                let size = parse_size(tokens.next().ok_or(CommandError::MissingArgument("size"))?)?;
                let used = tokens.next().map(parse_size).transpose()?;
                Command::Allocate {
                    owner: owner.into(),
                    size,
                    used,
                }
            }
            'L' => {
                let owner = tokens
                    .next()
                    .ok_or(CommandError::MissingArgument("process name"))?;
                Command::Deallocate {
                    owner: owner.into(),
                }
            }
            'M' => Command::Display,
            'S' => Command::Stats,
            'Q' => Command::Quit,
            other => return Err(CommandError::Unknown(other)),
        };

        let rest: Vec<&str> = tokens.collect();
        if !rest.is_empty() {
            return Err(CommandError::TrailingInput(rest.join(" ")));
        }

        Ok(command)
    }
}

fn parse_size(token: &str) -> Result<Size, CommandError> {
    token
        .parse()
        .map_err(|_| CommandError::InvalidNumber(token.to_string()))
}
