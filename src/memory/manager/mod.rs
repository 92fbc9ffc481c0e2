/*!
 * Memory Management
 *
 * Simulated allocator over a fixed, flat address space.
 *
 * ## Features
 *
 * - **Pluggable placement**: first-fit, best-fit or worst-fit, chosen at construction
 * - **Block splitting**: a larger hole is split into the owned prefix and a free remainder
 * - **Coalescing**: a freed block is merged with free neighbours on both sides immediately
 * - **Fragmentation reporting**: internal (over-reservation) and external (scattered holes)
 * - **Memory pressure tracking**: reports at 60%, warns at 80%, critical at 95%
 */

mod allocator;
mod shared;
mod stats;

pub use shared::SharedMemoryManager;

use super::registry::BlockRegistry;
use super::strategy::FitStrategy;
use super::traits::{Allocator, MemoryInfo, PlacementStrategy};
use super::types::{BlockView, MemoryError, MemoryResult, MemoryStats};
use crate::core::limits::DEFAULT_MEMORY_SIZE;
use crate::core::types::Size;
use log::info;

/// Memory manager
///
/// Exclusively owns the block registry; every mutation goes through
/// [`MemoryManager::allocate`] or [`MemoryManager::deallocate`].
#[derive(Debug, Clone)]
pub struct MemoryManager {
    registry: BlockRegistry,
    strategy: FitStrategy,
}

impl MemoryManager {
    /// Create a manager over `total_memory` units using `strategy`
    pub fn new(total_memory: Size, strategy: FitStrategy) -> MemoryResult<Self> {
        if total_memory == 0 {
            return Err(MemoryError::InvalidSize(total_memory));
        }
        Ok(Self::build(total_memory, strategy))
    }

    /// `total_memory` must be non-zero
    fn build(total_memory: Size, strategy: FitStrategy) -> Self {
        info!(
            "Memory manager initialized with {} units using {}",
            total_memory,
            strategy.name()
        );
        Self {
            registry: BlockRegistry::new(total_memory),
            strategy,
        }
    }

    /// Create a first-fit manager with custom capacity (useful for testing)
    pub fn with_capacity(total_memory: Size) -> MemoryResult<Self> {
        Self::new(total_memory, FitStrategy::FirstFit)
    }

    #[inline]
    pub fn total_memory(&self) -> Size {
        self.registry.total_memory()
    }

    #[inline]
    pub fn strategy(&self) -> FitStrategy {
        self.strategy
    }

    /// Name of the active placement strategy, for display
    #[inline]
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Read-only access to the ordered blocks
    #[inline]
    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// Release every allocation at once
    pub fn reset(&mut self) {
        self.registry.reset();
        info!("Memory reset to a single free block of {} units", self.total_memory());
    }
}

impl Default for MemoryManager {
    fn default() -> Self {
        Self::build(DEFAULT_MEMORY_SIZE, FitStrategy::default())
    }
}

// Implement trait interfaces
impl Allocator for MemoryManager {
    fn allocate(&mut self, owner: &str, size: Size, used: Option<Size>) -> MemoryResult<BlockView> {
        MemoryManager::allocate(self, owner, size, used)
    }

    fn deallocate(&mut self, owner: &str) -> MemoryResult<BlockView> {
        MemoryManager::deallocate(self, owner)
    }

    fn contains(&self, owner: &str) -> bool {
        MemoryManager::contains(self, owner)
    }
}

impl MemoryInfo for MemoryManager {
    fn stats(&self) -> MemoryStats {
        MemoryManager::stats(self)
    }

    fn snapshot(&self) -> Vec<BlockView> {
        MemoryManager::snapshot(self)
    }
}
