/*!
 * Core Types
 * Common types used across the simulator
 */

/// Offset into the simulated address space
pub type Address = usize;

/// Extent length in address units
pub type Size = usize;

/// Common result type for simulator operations
pub type SimResult<T> = Result<T, super::errors::SimError>;
