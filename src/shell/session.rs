/*!
 * Command Sessions
 * Batch and interactive drivers over a memory manager
 */

use super::command::Command;
use super::config::{parse_memory_size, InputSource, OutputMode, SimConfig};
use super::render::{CompactView, JsonReport, MemoryReport, StatsReport};
use crate::core::limits::PROMPT;
use crate::core::types::SimResult;
use crate::memory::{FitStrategy, MemoryManager};
use log::{info, warn};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::debug_span;

/// Counters for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub commands: usize,
    pub allocations: usize,
    pub failed_allocations: usize,
    pub deallocations: usize,
    pub failed_deallocations: usize,
    pub warnings: usize,
}

/// Whether the driver should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Executes commands against one manager, writing results to `out` and
/// warnings about malformed input to `err`
pub struct Session<W: Write, E: Write> {
    manager: MemoryManager,
    output: OutputMode,
    out: W,
    err: E,
    summary: SessionSummary,
}

impl<W: Write, E: Write> Session<W, E> {
    pub fn new(manager: MemoryManager, output: OutputMode, out: W, err: E) -> Self {
        Self {
            manager,
            output,
            out,
            err,
            summary: SessionSummary::default(),
        }
    }

    #[inline]
    pub fn manager(&self) -> &MemoryManager {
        &self.manager
    }

    #[inline]
    pub fn summary(&self) -> SessionSummary {
        self.summary
    }

    /// Consume the session, returning the manager and both writers
    pub fn into_parts(self) -> (MemoryManager, W, E) {
        (self.manager, self.out, self.err)
    }

    /// Process every line of a command script
    ///
    /// Blank lines and `#` comments are skipped. Malformed lines produce a
    /// warning naming the line number and the script carries on.
    pub fn run_batch<R: BufRead>(&mut self, input: R) -> SimResult<SessionSummary> {
        info!("Running batch session ({})", self.manager.strategy_name());

        for (index, line) in input.lines().enumerate() {
            let line = line?;
            let line_number = index + 1;

            let command = match Command::parse_line(&line) {
                None => continue,
                Some(Ok(command)) => command,
                Some(Err(e)) => {
                    self.warn(format_args!("warning (line {}): {}", line_number, e))?;
                    continue;
                }
            };

            if command == Command::Quit {
                self.warn(format_args!(
                    "warning (line {}): Q is only available interactively",
                    line_number
                ))?;
                continue;
            }

            if self.output != OutputMode::Compact {
                writeln!(self.out, "{}{}", PROMPT, line.trim())?;
            }
            self.execute(command)?;
        }

        self.out.flush()?;
        Ok(self.summary)
    }

    /// Prompt for commands until `Q` or end of input
    pub fn run_interactive<R: BufRead>(&mut self, mut input: R) -> SimResult<SessionSummary> {
        writeln!(self.out, "\n=== INTERACTIVE MODE ===")?;
        writeln!(self.out, "Commands: A <proc> <size> [used], L <proc>, M, S, Q")?;

        let mut line = String::new();
        loop {
            write!(self.out, "{}", PROMPT)?;
            self.out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }

            let command = match Command::parse_line(&line) {
                None => continue,
                Some(Ok(command)) => command,
                Some(Err(e)) => {
                    self.warn(format_args!("{}", e))?;
                    continue;
                }
            };

            if self.execute(command)? == Flow::Quit {
                writeln!(self.out, "Exiting...")?;
                break;
            }
        }

        self.out.flush()?;
        Ok(self.summary)
    }

    fn execute(&mut self, command: Command) -> SimResult<Flow> {
        self.summary.commands += 1;
        let _span = debug_span!("command", ?command).entered();

        match command {
            Command::Allocate { owner, size, used } => {
                match self.manager.allocate(&owner, size, used) {
                    Ok(_) => {
                        self.summary.allocations += 1;
                        if self.output != OutputMode::Compact {
                            writeln!(self.out, "Allocation succeeded")?;
                        }
                    }
                    Err(e) => {
                        self.summary.failed_allocations += 1;
                        writeln!(self.out, "Error: {}", e)?;
                    }
                }
            }
            Command::Deallocate { owner } => match self.manager.deallocate(&owner) {
                Ok(_) => {
                    self.summary.deallocations += 1;
                    if self.output != OutputMode::Compact {
                        writeln!(self.out, "Memory released")?;
                    }
                }
                Err(e) => {
                    self.summary.failed_deallocations += 1;
                    writeln!(self.out, "Error: {}", e)?;
                }
            },
            Command::Display => self.display()?,
            Command::Stats => self.display_stats()?,
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn display(&mut self) -> SimResult<()> {
        match self.output {
            OutputMode::Table => write!(self.out, "\n{}", MemoryReport(&self.manager))?,
            OutputMode::Compact => writeln!(self.out, "{}", CompactView(&self.manager))?,
            OutputMode::Json => writeln!(self.out, "{}", JsonReport::new(&self.manager).to_json()?)?,
        }
        Ok(())
    }

    fn display_stats(&mut self) -> SimResult<()> {
        let stats = self.manager.stats();
        match self.output {
            OutputMode::Json => writeln!(self.out, "{}", serde_json::to_string(&stats)?)?,
            _ => write!(self.out, "{}", StatsReport(&stats))?,
        }
        Ok(())
    }

    fn warn(&mut self, message: std::fmt::Arguments<'_>) -> SimResult<()> {
        self.summary.warnings += 1;
        warn!("{}", message);
        writeln!(self.err, "{}", message)?;
        Ok(())
    }
}

/// Ask for memory size, strategy and command source when none was configured
///
/// A blank or invalid size keeps the current value; an unknown menu option
/// falls back to first fit. Anything but option 1 for the source keeps the
/// console.
pub fn prompt_setup<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    config: &mut SimConfig,
) -> SimResult<()> {
    writeln!(out, "=== MEMORY MANAGEMENT SIMULATOR ===")?;
    write!(out, "Memory size (default {}): ", config.memory_size)?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    if !line.trim().is_empty() {
        match parse_memory_size(line.trim()) {
            Ok(size) => config.memory_size = size,
            Err(e) => {
                warn!("{}; keeping {} units", e, config.memory_size);
                writeln!(out, "{}; keeping {} units", e, config.memory_size)?;
            }
        }
    }

    writeln!(out, "\nSelect the allocation strategy:")?;
    for (index, strategy) in FitStrategy::ALL.iter().enumerate() {
        writeln!(out, "{}. {}", index + 1, strategy)?;
    }
    write!(out, "Option (1-3): ")?;
    out.flush()?;

    line.clear();
    input.read_line(&mut line)?;
    config.strategy = line
        .trim()
        .parse::<u32>()
        .ok()
        .and_then(FitStrategy::from_menu)
        .unwrap_or(FitStrategy::FirstFit);

    writeln!(out, "\nRead commands from:")?;
    writeln!(out, "1. File")?;
    writeln!(out, "2. Console")?;
    write!(out, "Option (1-2): ")?;
    out.flush()?;

    line.clear();
    input.read_line(&mut line)?;
    if line.trim() == "1" {
        write!(out, "File name: ")?;
        out.flush()?;

        line.clear();
        input.read_line(&mut line)?;
        let path = line.trim();
        if path.is_empty() {
            writeln!(out, "No file name given; reading from the console")?;
        } else {
            config.input = InputSource::File(PathBuf::from(path));
        }
    }

    Ok(())
}

/// Build the manager for `config` and run the matching driver
pub fn run<R: BufRead, W: Write, E: Write>(
    config: &SimConfig,
    input: R,
    out: W,
    err: E,
    interactive: bool,
) -> SimResult<SessionSummary> {
    let manager = MemoryManager::new(config.memory_size, config.strategy)?;
    let mut session = Session::new(manager, config.output, out, err);
    if interactive {
        session.run_interactive(input)
    } else {
        session.run_batch(input)
    }
}

