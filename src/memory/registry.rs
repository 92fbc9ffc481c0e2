/*!
 * Block Registry
 * Ordered partition of the simulated address space
 */

use super::types::{MemoryBlock, MemoryError, MemoryResult};
use crate::core::types::{Address, Size};
use crate::core::OwnerName;
use log::debug;
use std::collections::HashSet;
use thiserror::Error;

/// Broken registry invariant, reported by [`BlockRegistry::check_invariants`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("registry is empty")]
    Empty,

    #[error("block {index} starts at {found}, expected {expected}")]
    Gap {
        index: usize,
        expected: Address,
        found: Address,
    },

    #[error("block {0} has zero size")]
    ZeroSize(usize),

    #[error("blocks end at {end}, total memory is {total}")]
    Coverage { end: Address, total: Size },

    #[error("block {0} and its successor are both free")]
    AdjacentFree(usize),

    #[error("block {index} uses {used} of {size} units")]
    UsedOverflow { index: usize, used: Size, size: Size },

    #[error("owner {0} holds more than one block")]
    DuplicateOwner(OwnerName),
}

/// Ordered collection of blocks covering `[0, total_memory)`
///
/// Blocks live in a single `Vec` arena in ascending address order and are
/// only handed out by shared reference or by index. Between public calls:
/// - every block starts where the previous one ends, the first at 0 and the
///   last ending at `total_memory`
/// - no two neighbouring blocks are both free
/// - no owner appears on more than one block
///
/// ```text
///  0        30       50   60                         100
///  +--------+--------+----+---------------------------+
///  |  A(30) | free   |C(10)|          free            |
///  +--------+--------+----+---------------------------+
/// ```
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    blocks: Vec<MemoryBlock>,
    total_memory: Size,
}

impl BlockRegistry {
    /// Create a registry holding one free block that spans the whole space
    pub fn new(total_memory: Size) -> Self {
        Self {
            blocks: vec![MemoryBlock::free(0, total_memory)],
            total_memory,
        }
    }

    #[inline]
    pub fn total_memory(&self) -> Size {
        self.total_memory
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false for a registry built with a non-zero size
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks in ascending address order
    pub fn iter(&self) -> std::slice::Iter<'_, MemoryBlock> {
        self.blocks.iter()
    }

    #[inline]
    pub fn blocks(&self) -> &[MemoryBlock] {
        &self.blocks
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&MemoryBlock> {
        self.blocks.get(index)
    }

    /// Index of the first block owned by `owner`
    pub fn find_owner(&self, owner: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.is_owned_by(owner))
    }

    /// Hand the free block at `index` to `owner`
    ///
    /// An exact fit converts the block in place. A larger block is truncated
    /// to `size` and a free block covering the remainder is inserted right
    /// after it.
    pub fn split_allocated(
        &mut self,
        index: usize,
        size: Size,
        used: Size,
        owner: OwnerName,
    ) -> MemoryResult<()> {
        let block = self
            .blocks
            .get_mut(index)
            .ok_or(MemoryError::InvalidBlock(index))?;

        if !block.is_free() || block.size() < size || size == 0 || used > size {
            return Err(MemoryError::InvalidBlock(index));
        }

        if block.size() == size {
            block.assign(owner, used);
            return Ok(());
        }

        let remainder_start = block.start() + size;
        let remainder_size = block.size() - size;
        block.truncate(size);
        block.assign(owner, used);
        self.blocks
            .insert(index + 1, MemoryBlock::free(remainder_start, remainder_size));

        debug!(
            "Split block {}: kept {} units, {} units at {} returned as free",
            index, size, remainder_size, remainder_start
        );
        Ok(())
    }

    /// Free the block at `index` and absorb free neighbours on both sides
    ///
    /// Returns the index of the resulting free block, which moves one slot
    /// left when it merges into its predecessor.
    pub fn free_and_coalesce(&mut self, index: usize) -> MemoryResult<usize> {
        let block = self
            .blocks
            .get_mut(index)
            .ok_or(MemoryError::InvalidBlock(index))?;
        block.release();

        let mut index = index;

        if self.blocks.get(index + 1).is_some_and(MemoryBlock::is_free) {
            self.merge_with_next(index);
        }

        if index > 0 && self.blocks[index - 1].is_free() {
            index -= 1;
            self.merge_with_next(index);
        }

        Ok(index)
    }

    /// Fold the block after `index` into the block at `index`
    fn merge_with_next(&mut self, index: usize) {
        let next = self.blocks.remove(index + 1);
        let block = &mut self.blocks[index];
        block.grow(next.size());
        debug!(
            "Coalesced free blocks at {} and {} into {} units",
            block.start(),
            next.start(),
            block.size()
        );
    }

    /// Return to a single free block spanning the whole space
    pub fn reset(&mut self) {
        self.blocks.clear();
        self.blocks.push(MemoryBlock::free(0, self.total_memory));
    }

    /// Verify the partition, coalescing and single-owner invariants
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.blocks.is_empty() {
            return Err(InvariantViolation::Empty);
        }

        let mut expected = 0;
        let mut owners = HashSet::new();

        for (index, block) in self.blocks.iter().enumerate() {
            if block.start() != expected {
                return Err(InvariantViolation::Gap {
                    index,
                    expected,
                    found: block.start(),
                });
            }
            if block.size() == 0 {
                return Err(InvariantViolation::ZeroSize(index));
            }
            if block.used() > block.size() {
                return Err(InvariantViolation::UsedOverflow {
                    index,
                    used: block.used(),
                    size: block.size(),
                });
            }
            if let Some(owner) = block.owner() {
                if !owners.insert(owner.as_str()) {
                    return Err(InvariantViolation::DuplicateOwner(owner.clone()));
                }
            }
            if block.is_free() && self.blocks.get(index + 1).is_some_and(MemoryBlock::is_free) {
                return Err(InvariantViolation::AdjacentFree(index));
            }
            expected = block.end();
        }

        if expected != self.total_memory {
            return Err(InvariantViolation::Coverage {
                end: expected,
                total: self.total_memory,
            });
        }

        Ok(())
    }

    /// Build a registry from explicit blocks, renumbering starts
    #[cfg(test)]
    pub(crate) fn from_blocks(blocks: Vec<MemoryBlock>) -> Self {
        let mut start = 0;
        let mut blocks = blocks;
        for block in &mut blocks {
            block.set_start(start);
            start += block.size();
        }
        Self {
            blocks,
            total_memory: start,
        }
    }
}

impl<'a> IntoIterator for &'a BlockRegistry {
    type Item = &'a MemoryBlock;
    type IntoIter = std::slice::Iter<'a, MemoryBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
