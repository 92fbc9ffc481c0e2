/*!
 * Memory Traits
 * Memory management abstractions
 */

use super::types::*;
use crate::core::types::Size;

/// Placement policy over the ordered block list
///
/// Implementations look at the blocks read-only, in ascending address order,
/// and return the index of the free block that should satisfy a request of
/// `size` units, or `None` when no free block is large enough.
pub trait PlacementStrategy {
    /// Pick a free block in a single pass over `blocks`
    fn select(&self, blocks: &[MemoryBlock], size: Size) -> Option<usize>;

    /// Human-readable name for display
    fn name(&self) -> &'static str;
}

/// Memory allocator interface
pub trait Allocator {
    /// Reserve `size` units for `owner`, of which `used` are actually consumed
    /// (`None` means the whole reservation is used)
    fn allocate(&mut self, owner: &str, size: Size, used: Option<Size>) -> MemoryResult<BlockView>;

    /// Release the allocation held by `owner`
    fn deallocate(&mut self, owner: &str) -> MemoryResult<BlockView>;

    /// Check if `owner` currently holds an allocation
    fn contains(&self, owner: &str) -> bool;
}

/// Memory statistics provider
pub trait MemoryInfo {
    /// Get overall memory statistics
    fn stats(&self) -> MemoryStats;

    /// Ordered copy of every block
    fn snapshot(&self) -> Vec<BlockView>;

    /// Get memory info as (total, reserved, free)
    fn info(&self) -> (Size, Size, Size) {
        let stats = self.stats();
        (stats.total_memory, stats.reserved_used, stats.total_free)
    }

    /// Get memory pressure level
    fn pressure(&self) -> MemoryPressure {
        self.stats().memory_pressure()
    }
}
