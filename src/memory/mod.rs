/*!
 * Memory Module
 * Simulated address space, placement strategies and allocation
 */

pub mod manager;
pub mod registry;
pub mod strategy;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use manager::{MemoryManager, SharedMemoryManager};
pub use registry::{BlockRegistry, InvariantViolation};
pub use strategy::{FitStrategy, ParseStrategyError};
pub use traits::*;
pub use types::*;
