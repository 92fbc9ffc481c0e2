/*!
 * Memory Statistics
 * Read-only reporting over the current block list
 */

use super::super::types::{BlockView, MemoryStats};
use super::MemoryManager;

impl MemoryManager {
    /// Get memory statistics in a single pass over the blocks
    pub fn stats(&self) -> MemoryStats {
        let mut stats = MemoryStats {
            total_memory: self.total_memory(),
            block_count: self.registry.len(),
            ..Default::default()
        };

        for block in &self.registry {
            if block.is_free() {
                stats.total_free += block.size();
                stats.largest_free = stats.largest_free.max(block.size());
                stats.free_block_count += 1;
            } else {
                stats.reserved_used += block.size();
                stats.actual_used += block.used();
                stats.internal_fragmentation += block.internal_fragmentation();
                stats.allocated_blocks += 1;
            }
        }

        stats.external_fragmentation = stats.total_free.saturating_sub(stats.largest_free);
        stats
    }

    /// Ordered copy of every block, for display
    pub fn snapshot(&self) -> Vec<BlockView> {
        self.registry.iter().map(|b| b.view()).collect()
    }
}
