/*!
 * Memory Types
 * Common types for the simulated address space
 */

use crate::core::limits::{
    PRESSURE_CRITICAL_THRESHOLD, PRESSURE_HIGH_THRESHOLD, PRESSURE_MEDIUM_THRESHOLD,
};
use crate::core::types::{Address, Size};
use crate::core::OwnerName;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
///
/// `OutOfMemory` and `OwnerNotFound` are ordinary failures reported back to
/// whoever issued the command. The remaining variants are contract
/// violations by the caller and should not be retried.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum MemoryError {
    #[error("Out of memory: requested {requested} units, largest free block is {largest_free} units ({total_free} free in total)")]
    #[diagnostic(
        code(memory::out_of_memory),
        help("No single free block is large enough. Free a neighbouring process or try another fit strategy.")
    )]
    OutOfMemory {
        requested: Size,
        largest_free: Size,
        total_free: Size,
    },

    #[error("Process {0} not found")]
    #[diagnostic(
        code(memory::owner_not_found),
        help("The process never allocated memory or has already released it.")
    )]
    OwnerNotFound(OwnerName),

    #[error("Process {0} already holds an allocation")]
    #[diagnostic(
        code(memory::duplicate_owner),
        help("Release the existing allocation before allocating again under the same name.")
    )]
    DuplicateOwner(OwnerName),

    #[error("Invalid size: {0} (must be greater than zero)")]
    #[diagnostic(code(memory::invalid_size))]
    InvalidSize(Size),

    #[error("Used amount {used} exceeds reserved size {size}")]
    #[diagnostic(code(memory::used_exceeds_size))]
    UsedExceedsSize { used: Size, size: Size },

    #[error("Process name must not be empty")]
    #[diagnostic(code(memory::empty_owner))]
    EmptyOwner,

    #[error("Block {0} cannot satisfy the requested operation")]
    #[diagnostic(
        code(memory::invalid_block),
        help("The block index is out of range, already owned, or too small.")
    )]
    InvalidBlock(usize),
}

impl MemoryError {
    /// Caller bugs, as opposed to capacity or lookup failures
    pub fn is_contract_violation(&self) -> bool {
        !matches!(
            self,
            MemoryError::OutOfMemory { .. } | MemoryError::OwnerNotFound(_)
        )
    }
}

/// One contiguous extent of the simulated address space
///
/// A block is free exactly when it has no owner. `used` only carries meaning
/// for owned blocks and is kept at zero for free ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryBlock {
    start: Address,
    size: Size,
    owner: Option<OwnerName>,
    used: Size,
}

impl MemoryBlock {
    pub(crate) fn free(start: Address, size: Size) -> Self {
        Self {
            start,
            size,
            owner: None,
            used: 0,
        }
    }

    #[cfg(test)]
    pub(crate) fn owned(start: Address, size: Size, owner: OwnerName, used: Size) -> Self {
        Self {
            start,
            size,
            owner: Some(owner),
            used,
        }
    }

    #[inline]
    pub fn start(&self) -> Address {
        self.start
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    /// One past the last address covered by this block
    #[inline]
    pub fn end(&self) -> Address {
        self.start + self.size
    }

    #[inline]
    pub fn owner(&self) -> Option<&OwnerName> {
        self.owner.as_ref()
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.owner.is_none()
    }

    #[inline]
    pub fn used(&self) -> Size {
        self.used
    }

    /// Reserved but unused space inside an owned block
    #[inline]
    pub fn internal_fragmentation(&self) -> Size {
        if self.is_free() {
            0
        } else {
            self.size - self.used
        }
    }

    pub(crate) fn is_owned_by(&self, owner: &str) -> bool {
        self.owner.as_ref().is_some_and(|o| o.as_str() == owner)
    }

    pub(crate) fn release(&mut self) {
        self.owner = None;
        self.used = 0;
    }

    pub(crate) fn assign(&mut self, owner: OwnerName, used: Size) {
        self.owner = Some(owner);
        self.used = used;
    }

    pub(crate) fn truncate(&mut self, size: Size) {
        self.size = size;
    }

    pub(crate) fn grow(&mut self, additional: Size) {
        self.size += additional;
    }

    #[cfg(test)]
    pub(crate) fn set_start(&mut self, start: Address) {
        self.start = start;
    }

    pub fn view(&self) -> BlockView {
        BlockView {
            start: self.start,
            size: self.size,
            owner: self.owner.clone(),
            is_free: self.is_free(),
            used: self.used,
        }
    }
}

/// Detached copy of a block for display and serialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockView {
    pub start: Address,
    pub size: Size,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerName>,
    pub is_free: bool,
    pub used: Size,
}

/// Memory statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_memory: Size,
    /// Sum of reserved sizes over owned blocks
    pub reserved_used: Size,
    /// Sum of consumed sizes over owned blocks
    pub actual_used: Size,
    pub internal_fragmentation: Size,
    pub total_free: Size,
    pub largest_free: Size,
    pub external_fragmentation: Size,
    pub block_count: usize,
    pub free_block_count: usize,
    pub allocated_blocks: usize,
}

impl MemoryStats {
    pub fn reserved_percentage(&self) -> f64 {
        percentage(self.reserved_used, self.total_memory)
    }

    pub fn actual_percentage(&self) -> f64 {
        percentage(self.actual_used, self.total_memory)
    }

    pub fn external_percentage(&self) -> f64 {
        percentage(self.external_fragmentation, self.total_memory)
    }

    /// Share of free space that lies outside the largest hole, in `[0, 1]`
    pub fn fragmentation_ratio(&self) -> f64 {
        if self.total_free == 0 {
            return 0.0;
        }
        let largest = self.largest_free.min(self.total_free) as f64;
        (1.0 - largest / self.total_free as f64).clamp(0.0, 1.0)
    }

    pub fn memory_pressure(&self) -> MemoryPressure {
        MemoryPressure::from_ratio(self.reserved_used as f64 / self.total_memory.max(1) as f64)
    }
}

fn percentage(part: Size, whole: Size) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl MemoryPressure {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= PRESSURE_CRITICAL_THRESHOLD {
            MemoryPressure::Critical
        } else if ratio >= PRESSURE_HIGH_THRESHOLD {
            MemoryPressure::High
        } else if ratio >= PRESSURE_MEDIUM_THRESHOLD {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

impl std::fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}
