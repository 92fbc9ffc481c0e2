/*!
 * Memory Simulator Library
 * Fit-strategy allocation over a flat, simulated address space
 */

pub mod core;
pub mod memory;
pub mod monitoring;
pub mod shell;

// Re-exports
pub use crate::core::errors::SimError;
pub use crate::core::types::{Address, SimResult, Size};
pub use crate::core::OwnerName;
pub use memory::{
    BlockRegistry, BlockView, FitStrategy, MemoryBlock, MemoryError, MemoryManager,
    MemoryResult, MemoryStats, PlacementStrategy, SharedMemoryManager,
};
pub use monitoring::init_tracing;
pub use shell::{Command, InputSource, OutputMode, Session, SessionSummary, SimConfig};
