/*!
 * Memory Allocator Implementation
 * Allocation and deallocation logic
 */

use super::super::traits::PlacementStrategy;
use super::super::types::{BlockView, MemoryError, MemoryPressure, MemoryResult};
use super::MemoryManager;
use crate::core::types::Size;
use log::{error, info, warn};

impl MemoryManager {
    /// Reserve `size` units for `owner` using the active placement strategy
    ///
    /// `used` is the part of the reservation the owner actually consumes and
    /// defaults to `size`. On any error the block list is left untouched.
    pub fn allocate(
        &mut self,
        owner: &str,
        size: Size,
        used: Option<Size>,
    ) -> MemoryResult<BlockView> {
        let used = used.unwrap_or(size);

        if owner.is_empty() {
            return Err(MemoryError::EmptyOwner);
        }
        if size == 0 {
            return Err(MemoryError::InvalidSize(size));
        }
        if used > size {
            return Err(MemoryError::UsedExceedsSize { used, size });
        }
        if self.contains(owner) {
            warn!("Rejected allocation for {}: process already holds a block", owner);
            return Err(MemoryError::DuplicateOwner(owner.into()));
        }

        let Some(index) = self.strategy.select(self.registry.blocks(), size) else {
            let (largest_free, total_free) = self.free_extent_summary();
            error!(
                "OOM: {} requested {} units, largest free block is {} ({} free / {} total, {})",
                owner,
                size,
                largest_free,
                total_free,
                self.total_memory(),
                self.strategy_name()
            );
            return Err(MemoryError::OutOfMemory {
                requested: size,
                largest_free,
                total_free,
            });
        };

        self.registry
            .split_allocated(index, size, used, owner.into())?;
        debug_assert!(self.registry.check_invariants().is_ok());

        let block = self.registry.blocks()[index].view();
        self.log_allocation(&block);
        Ok(block)
    }

    /// Release the block held by `owner` and coalesce it with free neighbours
    ///
    /// Returns the block as it was just before being released.
    pub fn deallocate(&mut self, owner: &str) -> MemoryResult<BlockView> {
        let Some(index) = self.registry.find_owner(owner) else {
            warn!("Attempted to deallocate unknown process: {}", owner);
            return Err(MemoryError::OwnerNotFound(owner.into()));
        };

        let released = self.registry.blocks()[index].view();
        let merged = self.registry.free_and_coalesce(index)?;
        debug_assert!(self.registry.check_invariants().is_ok());

        info!(
            "Deallocated {} units at {} from {}, free extent is now {} units at {}",
            released.size,
            released.start,
            owner,
            self.registry.blocks()[merged].size(),
            self.registry.blocks()[merged].start()
        );
        Ok(released)
    }

    /// Check if `owner` currently holds a block
    pub fn contains(&self, owner: &str) -> bool {
        self.registry.find_owner(owner).is_some()
    }

    /// Copy of the block held by `owner`
    pub fn owner_block(&self, owner: &str) -> Option<BlockView> {
        self.registry
            .find_owner(owner)
            .map(|index| self.registry.blocks()[index].view())
    }

    /// (largest free block, total free)
    fn free_extent_summary(&self) -> (Size, Size) {
        self.registry
            .iter()
            .filter(|b| b.is_free())
            .fold((0, 0), |(largest, total), b| {
                (largest.max(b.size()), total + b.size())
            })
    }

    /// Check memory pressure level
    pub(super) fn check_memory_pressure(&self, reserved: Size) -> Option<MemoryPressure> {
        match MemoryPressure::from_ratio(reserved as f64 / self.total_memory() as f64) {
            MemoryPressure::Low => None,
            level => Some(level),
        }
    }

    fn log_allocation(&self, block: &BlockView) {
        let reserved: Size = self
            .registry
            .iter()
            .filter(|b| !b.is_free())
            .map(|b| b.size())
            .sum();
        let owner = block.owner.as_ref().map(|o| o.as_str()).unwrap_or("-");

        if let Some(level) = self.check_memory_pressure(reserved) {
            warn!(
                "Memory pressure {}: Allocated {} units at {} for {} ({:.1}% reserved: {} / {})",
                level,
                block.size,
                block.start,
                owner,
                (reserved as f64 / self.total_memory() as f64) * 100.0,
                reserved,
                self.total_memory()
            );
        } else {
            info!(
                "Allocated {} units at {} for {} ({} used)",
                block.size, block.start, owner, block.used
            );
        }
    }
}
