use num_bigint::BigInt;

use crate::models::{AccountSnapshot, EpochContext};

/// Reward movement since the previous epoch boundary. Measured deltas are
/// signed and never clamped; estimates come from the epoch-progress
/// heuristic and are approximate by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewardDelta {
    Measured(BigInt),
    Estimated(BigInt),
    Unavailable,
}

impl RewardDelta {
    pub fn is_measured(&self) -> bool {
        matches!(self, RewardDelta::Measured(_))
    }
}

#[derive(Debug, Clone)]
pub struct ComparisonResult {
    pub epoch: EpochContext,
    pub current: AccountSnapshot,
    pub previous: Option<AccountSnapshot>,
    pub delta: RewardDelta,
}
