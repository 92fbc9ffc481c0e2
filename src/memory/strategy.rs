/*!
 * Placement Strategies
 * First-fit, best-fit and worst-fit selection over the block list
 */

use super::traits::PlacementStrategy;
use super::types::MemoryBlock;
use crate::core::types::Size;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fit strategy chosen once when the manager is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitStrategy {
    /// Lowest-addressed free block that is large enough
    #[default]
    FirstFit,
    /// Smallest free block that is large enough
    BestFit,
    /// Largest free block
    WorstFit,
}

impl FitStrategy {
    pub const ALL: [FitStrategy; 3] = [
        FitStrategy::FirstFit,
        FitStrategy::BestFit,
        FitStrategy::WorstFit,
    ];

    /// Menu number used by the interactive prompt (1-3)
    pub fn from_menu(option: u32) -> Option<Self> {
        match option {
            1 => Some(FitStrategy::FirstFit),
            2 => Some(FitStrategy::BestFit),
            3 => Some(FitStrategy::WorstFit),
            _ => None,
        }
    }
}

impl PlacementStrategy for FitStrategy {
    fn select(&self, blocks: &[MemoryBlock], size: Size) -> Option<usize> {
        let mut candidates = blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_free() && b.size() >= size);

        // Strict comparisons keep the earliest block on ties
        match self {
            FitStrategy::FirstFit => candidates.next(),
            FitStrategy::BestFit => {
                candidates.fold(None::<(usize, &MemoryBlock)>, |best, (i, b)| match best {
                    Some((_, chosen)) if b.size() >= chosen.size() => best,
                    _ => Some((i, b)),
                })
            }
            FitStrategy::WorstFit => {
                candidates.fold(None::<(usize, &MemoryBlock)>, |worst, (i, b)| match worst {
                    Some((_, chosen)) if b.size() <= chosen.size() => worst,
                    _ => Some((i, b)),
                })
            }
        }
        .map(|(index, _)| index)
    }

    fn name(&self) -> &'static str {
        match self {
            FitStrategy::FirstFit => "First Fit",
            FitStrategy::BestFit => "Best Fit",
            FitStrategy::WorstFit => "Worst Fit",
        }
    }
}

impl fmt::Display for FitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognized strategy name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown fit strategy '{0}' (expected first, best or worst)")]
pub struct ParseStrategyError(pub String);

impl FromStr for FitStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "1" | "first" | "firstfit" => Ok(FitStrategy::FirstFit),
            "2" | "best" | "bestfit" => Ok(FitStrategy::BestFit),
            "3" | "worst" | "worstfit" => Ok(FitStrategy::WorstFit),
            _ => Err(ParseStrategyError(s.trim().to_string())),
        }
    }
}
