/*!
 * Simulator Limits and Constants
 *
 * Centralized location for defaults, thresholds and display widths.
 * Organized by domain for maintainability and discoverability.
 */

// =============================================================================
// MEMORY LIMITS
// =============================================================================

/// Default size of the simulated address space (100 units)
/// Used when neither a flag nor an environment variable provides one
pub const DEFAULT_MEMORY_SIZE: usize = 100;

/// Reserved usage ratio at which pressure is reported as MEDIUM
pub const PRESSURE_MEDIUM_THRESHOLD: f64 = 0.60;

/// Reserved usage ratio at which pressure is reported as HIGH
pub const PRESSURE_HIGH_THRESHOLD: f64 = 0.80;

/// Reserved usage ratio at which pressure is reported as CRITICAL
pub const PRESSURE_CRITICAL_THRESHOLD: f64 = 0.95;

// =============================================================================
// DISPLAY
// =============================================================================

/// Number of cells in the proportional memory map
/// Every block gets at least one cell, so the map can exceed this width
pub const VISUAL_MAP_WIDTH: usize = 50;

/// Column width for numeric table columns (start, size, used)
pub const TABLE_NUMBER_WIDTH: usize = 10;

/// Column width for the owner column
pub const TABLE_OWNER_WIDTH: usize = 15;

/// Width of the table separator lines
pub const TABLE_RULE_WIDTH: usize = 55;

/// Interactive prompt
pub const PROMPT: &str = "> ";
