use log::{info, warn};
use near_primitives::types::Balance;
use num_bigint::BigInt;

use crate::error::{RewardsError, RewardsResult};
use crate::models::{AccountSnapshot, ComparisonResult, EpochContext, RewardDelta};
use crate::services::provider::ChainProvider;

pub const EPOCH_BLOCKS: u64 = 43_200;

// Pinning exactly at the epoch boundary can land on a block the previous
// epoch never finalized; stepping back a few blocks avoids that.
const EPOCH_BOUNDARY_MARGIN: u64 = 6;
const ESTIMATE_MIN_BLOCKS: u64 = 100;
const ESTIMATE_DENOMINATOR: Balance = 100_000;

/// Funds held beyond the locked principal: delegation balances plus, for
/// lockup accounts, whatever of the native balance has vested free.
pub fn compute_reward(
    staked: Balance,
    unstaked: Balance,
    locked: Balance,
    native: Balance,
) -> Balance {
    let native_part = if locked > 0 { native } else { 0 };
    staked
        .saturating_add(unstaked)
        .saturating_add(native_part)
        .saturating_sub(locked)
}

pub fn reward_delta(current: Balance, previous: Balance) -> BigInt {
    BigInt::from(current) - BigInt::from(previous)
}

/// Rough projection of the reward accrued so far this epoch. Only defined
/// once the epoch is meaningfully underway and something is staked.
pub fn estimate_epoch_reward(staked: Balance, blocks_into_epoch: u64) -> Option<Balance> {
    if blocks_into_epoch <= ESTIMATE_MIN_BLOCKS || staked == 0 {
        return None;
    }
    let progress_tenths = (blocks_into_epoch as Balance * 10) / EPOCH_BLOCKS as Balance;
    Some(staked.saturating_mul(progress_tenths) / ESTIMATE_DENOMINATOR)
}

/// Assembles account snapshots and epoch-over-epoch comparisons out of the
/// read-only chain queries a `ChainProvider` offers.
pub struct RewardsAggregator<P: ChainProvider> {
    provider: P,
}

impl<P: ChainProvider> RewardsAggregator<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Builds a complete snapshot of the account's holdings, optionally
    /// pinned to a historical block. Only the native-balance fetch is fatal;
    /// every other sub-query degrades its own fields on failure.
    pub async fn collect_snapshot(
        &self,
        account_id: &str,
        pool_id: Option<&str>,
        block_height: Option<u64>,
    ) -> RewardsResult<AccountSnapshot> {
        let pool_account_id = match pool_id {
            Some(pool) => Some(pool.to_string()),
            None => match self.provider.get_staking_pool_account_id(account_id).await {
                Ok(pool) => pool,
                Err(err) => {
                    warn!("Could not resolve staking pool for {}: {}", account_id, err);
                    None
                }
            },
        };

        // Native balance and delegation record are independent reads.
        let (native_balance, pool_record) = futures::join!(
            self.provider.get_native_balance(account_id, block_height),
            self.fetch_pool_record(account_id, pool_account_id.as_deref(), block_height),
        );
        let native_balance = native_balance?;
        let (staked_balance, unstaked_balance, can_withdraw) = pool_record;

        // Lockup state is only probed for current-head queries; historical
        // lockup amounts are not comparable across snapshots.
        let (locked_amount, lockup_liquid) = match block_height {
            None => self.probe_lockup(account_id).await,
            Some(_) => (Some(0), None),
        };

        let reward = compute_reward(
            staked_balance.unwrap_or(0),
            unstaked_balance.unwrap_or(0),
            locked_amount.unwrap_or(0),
            native_balance,
        );

        let liquid_balance = match lockup_liquid {
            Some(liquid) if liquid > 0 => liquid,
            _ => native_balance,
        };

        Ok(AccountSnapshot {
            account_id: account_id.to_string(),
            pool_account_id,
            block_height,
            native_balance,
            liquid_balance,
            staked_balance,
            unstaked_balance,
            locked_amount,
            can_withdraw,
            reward,
        })
    }

    /// Current snapshot plus a best-effort look at the previous epoch.
    pub async fn get_rewards_comparison(
        &self,
        account_id: &str,
        pool_id: Option<&str>,
    ) -> RewardsResult<ComparisonResult> {
        let (epoch_info, head) = futures::join!(
            self.provider.get_validators(),
            self.provider.get_final_block(),
        );
        let epoch = EpochContext::new(head?, epoch_info?);
        info!(
            "Epoch {} started at block {}, head at {}",
            epoch.epoch_height, epoch.epoch_start_height, epoch.head.height
        );

        let current = self.collect_snapshot(account_id, pool_id, None).await?;

        let (previous, delta) = match current.pool_account_id.as_deref() {
            None => (None, RewardDelta::Unavailable),
            Some(pool) => {
                let previous_height = epoch.epoch_start_height.saturating_sub(EPOCH_BOUNDARY_MARGIN);
                match self
                    .collect_snapshot(account_id, Some(pool), Some(previous_height))
                    .await
                {
                    Ok(previous_snapshot) => {
                        let delta =
                            RewardDelta::Measured(reward_delta(current.reward, previous_snapshot.reward));
                        (Some(previous_snapshot), delta)
                    }
                    Err(err) => {
                        warn!(
                            "Historical snapshot at block {} failed for {}: {}",
                            previous_height, account_id, err
                        );
                        let estimate = estimate_epoch_reward(
                            current.staked_balance.unwrap_or(0),
                            epoch.blocks_into_epoch(),
                        );
                        let delta = match estimate {
                            Some(value) => RewardDelta::Estimated(BigInt::from(value)),
                            None => RewardDelta::Unavailable,
                        };
                        (None, delta)
                    }
                }
            }
        };

        Ok(ComparisonResult {
            epoch,
            current,
            previous,
            delta,
        })
    }

    async fn fetch_pool_record(
        &self,
        account_id: &str,
        pool_id: Option<&str>,
        block_height: Option<u64>,
    ) -> (Option<Balance>, Option<Balance>, bool) {
        let pool_id = match pool_id {
            Some(pool) => pool,
            // No pool means nothing is delegated, which is a known zero.
            None => return (Some(0), Some(0), false),
        };

        match self
            .provider
            .get_account_in_pool(account_id, pool_id, block_height)
            .await
        {
            Ok(Some(record)) => {
                let staked = parse_pool_balance(account_id, "staked_balance", &record.staked_balance);
                let unstaked =
                    parse_pool_balance(account_id, "unstaked_balance", &record.unstaked_balance);
                (staked, unstaked, record.can_withdraw)
            }
            Ok(None) => (Some(0), Some(0), false),
            Err(err) => {
                warn!(
                    "Delegation record lookup failed for {} in {}: {}",
                    account_id, pool_id, err
                );
                (None, None, false)
            }
        }
    }

    /// Contract-code presence gates the lockup view calls; the two views
    /// themselves are independent. Each failure is tolerated on its own.
    async fn probe_lockup(&self, account_id: &str) -> (Option<Balance>, Option<Balance>) {
        let has_contract = match self.provider.is_contract(account_id).await {
            Ok(flag) => flag,
            Err(err) => {
                warn!("Contract code probe failed for {}: {}", account_id, err);
                false
            }
        };
        if !has_contract {
            return (Some(0), None);
        }

        let (locked, liquid) = futures::join!(
            self.provider.get_locked_amount(account_id),
            self.provider.get_liquid_owners_balance(account_id),
        );

        let locked_amount = match locked {
            Ok(value) => Some(value),
            Err(RewardsError::NotALockupContract(_)) => Some(0),
            Err(err) => {
                warn!("Locked amount query failed for {}: {}", account_id, err);
                None
            }
        };
        let lockup_liquid = match liquid {
            Ok(value) => Some(value),
            Err(RewardsError::NotALockupContract(_)) => None,
            Err(err) => {
                warn!("Liquid balance query failed for {}: {}", account_id, err);
                None
            }
        };
        (locked_amount, lockup_liquid)
    }
}

fn parse_pool_balance(account_id: &str, field: &str, value: &str) -> Option<Balance> {
    match value.parse::<Balance>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(
                "Unparseable {} for {} in pool record: {}",
                field, account_id, value
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigInt;

    use super::*;

    #[test]
    fn reward_is_delegation_gain_for_plain_accounts() {
        assert_eq!(compute_reward(100, 50, 0, 1_000), 150);
        assert_eq!(compute_reward(0, 0, 0, 1_000), 0);
    }

    #[test]
    fn reward_counts_native_balance_only_against_a_locked_principal() {
        // Lockup account: staked 100, native 500 against principal 500.
        assert_eq!(compute_reward(100, 0, 500, 500), 100);
        // Fully locked, nothing vested or earned.
        assert_eq!(compute_reward(0, 0, 500, 500), 0);
    }

    #[test]
    fn reward_is_clamped_at_zero() {
        assert_eq!(compute_reward(0, 0, 1_000, 400), 0);
        assert_eq!(compute_reward(100, 0, 1_000, 400), 0);
    }

    #[test]
    fn delta_keeps_its_sign() {
        assert_eq!(reward_delta(150, 100), BigInt::from(50));
        assert_eq!(reward_delta(100, 150), BigInt::from(-50));
    }

    #[test]
    fn estimate_matches_epoch_progress() {
        // 21_600 blocks in: progress 0.5, so staked * 5 / 100_000.
        assert_eq!(estimate_epoch_reward(1_000_000, 21_600), Some(50));
        assert_eq!(estimate_epoch_reward(1_000_000, EPOCH_BLOCKS), Some(100));
    }

    #[test]
    fn estimate_requires_progress_and_stake() {
        assert_eq!(estimate_epoch_reward(1_000_000, 100), None);
        assert_eq!(estimate_epoch_reward(1_000_000, 0), None);
        assert_eq!(estimate_epoch_reward(0, 21_600), None);
        assert_eq!(estimate_epoch_reward(1_000_000, 101), Some(0));
    }
}
