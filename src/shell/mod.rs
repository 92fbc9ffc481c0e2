/*!
 * Shell Module
 * Configuration, command parsing, rendering and session drivers
 */

pub mod command;
pub mod config;
pub mod render;
pub mod session;

// Re-export for convenience
pub use command::{Command, CommandError};
pub use config::{ConfigError, InputSource, OutputMode, SimConfig};
pub use render::{BlockTable, CompactView, JsonReport, MemoryMap, MemoryReport, StatsReport};
pub use session::{prompt_setup, run, Session, SessionSummary};
