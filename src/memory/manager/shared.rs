/*!
 * Shared Memory Manager
 * Lock-serialized handle for multiple clients of one address space
 */

use super::super::strategy::FitStrategy;
use super::super::types::{BlockView, MemoryResult, MemoryStats};
use super::MemoryManager;
use crate::core::types::Size;
use parking_lot::RwLock;
use std::sync::Arc;

/// Cloneable handle to a single [`MemoryManager`]
///
/// Allocation and deallocation take the write lock, so mutations are
/// serialized. Snapshots and statistics take the read lock and may run
/// alongside each other, never alongside a mutation.
#[derive(Debug, Clone)]
pub struct SharedMemoryManager {
    inner: Arc<RwLock<MemoryManager>>,
}

impl SharedMemoryManager {
    pub fn new(total_memory: Size, strategy: FitStrategy) -> MemoryResult<Self> {
        MemoryManager::new(total_memory, strategy).map(Self::from)
    }

    pub fn allocate(&self, owner: &str, size: Size, used: Option<Size>) -> MemoryResult<BlockView> {
        self.inner.write().allocate(owner, size, used)
    }

    pub fn deallocate(&self, owner: &str) -> MemoryResult<BlockView> {
        self.inner.write().deallocate(owner)
    }

    pub fn snapshot(&self) -> Vec<BlockView> {
        self.inner.read().snapshot()
    }

    pub fn stats(&self) -> MemoryStats {
        self.inner.read().stats()
    }

    pub fn strategy_name(&self) -> &'static str {
        self.inner.read().strategy_name()
    }

    /// Run `f` with shared access, e.g. to render a consistent view
    pub fn with_read<R>(&self, f: impl FnOnce(&MemoryManager) -> R) -> R {
        f(&self.inner.read())
    }
}

impl From<MemoryManager> for SharedMemoryManager {
    fn from(manager: MemoryManager) -> Self {
        Self {
            inner: Arc::new(RwLock::new(manager)),
        }
    }
}
