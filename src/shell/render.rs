/*!
 * Rendering
 * Tables, proportional maps, compact lists and JSON reports
 */

use crate::core::limits::{
    TABLE_NUMBER_WIDTH, TABLE_OWNER_WIDTH, TABLE_RULE_WIDTH, VISUAL_MAP_WIDTH,
};
use crate::core::types::Size;
use crate::memory::{BlockView, MemoryManager, MemoryStats};
use serde::Serialize;
use std::fmt;

/// Full report: block table, proportional map and statistics
pub struct MemoryReport<'a>(pub &'a MemoryManager);

/// Block table only
pub struct BlockTable<'a>(pub &'a MemoryManager);

/// `[####.....]` map, one cell per `total / VISUAL_MAP_WIDTH` units
pub struct MemoryMap<'a>(pub &'a MemoryManager);

/// Usage and fragmentation figures
pub struct StatsReport<'a>(pub &'a MemoryStats);

/// `[P1: 10][Free: 90]`
pub struct CompactView<'a>(pub &'a MemoryManager);

impl fmt::Display for MemoryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", BlockTable(self.0))?;
        writeln!(f)?;
        write!(f, "{}", MemoryMap(self.0))?;
        writeln!(f)?;
        write!(f, "{}", StatsReport(&self.0.stats()))?;
        writeln!(f, "{}", "=".repeat(TABLE_RULE_WIDTH))
    }
}

impl fmt::Display for BlockTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let manager = self.0;
        writeln!(f, "=== MEMORY STATE ===")?;
        writeln!(
            f,
            "Total memory: {} units ({})",
            manager.total_memory(),
            manager.strategy_name()
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<nw$}{:<nw$}{:<ow$}{:<nw$}{}",
            "Start",
            "Size",
            "Process",
            "Used",
            "State",
            nw = TABLE_NUMBER_WIDTH,
            ow = TABLE_OWNER_WIDTH
        )?;
        writeln!(f, "{}", "-".repeat(TABLE_RULE_WIDTH))?;

        for block in manager.registry() {
            let owner = block.owner().map(|o| o.as_str()).unwrap_or("-");
            let (used, state) = if block.is_free() {
                ("-".to_string(), "FREE")
            } else {
                (block.used().to_string(), "USED")
            };
            writeln!(
                f,
                "{:<nw$}{:<nw$}{:<ow$}{:<nw$}{}",
                block.start(),
                block.size(),
                owner,
                used,
                state,
                nw = TABLE_NUMBER_WIDTH,
                ow = TABLE_OWNER_WIDTH
            )?;
        }
        Ok(())
    }
}

/// Cells drawn for a block; every block gets at least one
pub fn map_cells(size: Size, total: Size) -> usize {
    // Widened so sizes near usize::MAX cannot overflow
    let cells = size as u128 * VISUAL_MAP_WIDTH as u128 / total.max(1) as u128;
    (cells as usize).max(1)
}

impl fmt::Display for MemoryMap<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0.total_memory();
        writeln!(f, "Memory map:")?;
        f.write_str("[")?;
        for block in self.0.registry() {
            let symbol = if block.is_free() { "." } else { "#" };
            f.write_str(&symbol.repeat(map_cells(block.size(), total)))?;
        }
        writeln!(f, "]")?;
        writeln!(f, "Legend: # = used, . = free")
    }
}

impl fmt::Display for StatsReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.0;
        writeln!(
            f,
            "Reserved memory (held by processes): {} / {} ({:.1}%)",
            stats.reserved_used,
            stats.total_memory,
            stats.reserved_percentage()
        )?;
        writeln!(
            f,
            "Actual usage (data inside processes): {} / {} ({:.1}%)",
            stats.actual_used,
            stats.total_memory,
            stats.actual_percentage()
        )?;
        writeln!(
            f,
            "Internal fragmentation: {} units",
            stats.internal_fragmentation
        )?;
        writeln!(
            f,
            "External fragmentation: {} units (largest free block: {})",
            stats.external_fragmentation, stats.largest_free
        )?;
        writeln!(f, "Memory pressure: {}", stats.memory_pressure())
    }
}

impl fmt::Display for CompactView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in self.0.registry() {
            match block.owner() {
                Some(owner) => write!(f, "[{}: {}]", owner, block.size())?,
                None => write!(f, "[Free: {}]", block.size())?,
            }
        }
        Ok(())
    }
}

/// Machine-readable report
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub strategy: &'static str,
    pub total_memory: Size,
    pub blocks: Vec<BlockView>,
    pub stats: MemoryStats,
}

impl JsonReport {
    pub fn new(manager: &MemoryManager) -> Self {
        Self {
            strategy: manager.strategy_name(),
            total_memory: manager.total_memory(),
            blocks: manager.snapshot(),
            stats: manager.stats(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
