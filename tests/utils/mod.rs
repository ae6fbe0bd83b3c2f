use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use near_primitives::types::Balance;

use near_rewards::error::{RewardsError, RewardsResult};
use near_rewards::models::{BlockInfo, EpochInfo, PoolAccount};
use near_rewards::services::provider::ChainProvider;

/// In-memory `ChainProvider` for driving the aggregator without a network.
/// `lockup_probe_calls` counts contract-code and lockup view traffic so
/// tests can assert on the calls actually issued.
#[derive(Default)]
pub struct ChainProviderStub {
    pub native_balance: Balance,
    pub historical_balances: HashMap<u64, Balance>,
    pub missing_account: bool,
    pub has_contract: bool,
    pub staking_pool: Option<String>,
    pub current_pool_record: Option<PoolAccount>,
    pub historical_pool_record: Option<PoolAccount>,
    pub pool_record_fails: bool,
    /// `None` makes the lockup views answer `NotALockupContract`.
    pub locked_amount: Option<Balance>,
    pub liquid_owners_balance: Option<Balance>,
    pub epoch_start_height: u64,
    pub head_height: u64,
    pub lockup_probe_calls: Arc<AtomicUsize>,
}

pub fn pool_account(staked: &str, unstaked: &str, can_withdraw: bool) -> PoolAccount {
    PoolAccount {
        account_id: "alice.near".to_string(),
        staked_balance: staked.to_string(),
        unstaked_balance: unstaked.to_string(),
        can_withdraw,
    }
}

#[async_trait]
impl ChainProvider for ChainProviderStub {
    async fn get_native_balance(
        &self,
        account_id: &str,
        block_height: Option<u64>,
    ) -> RewardsResult<Balance> {
        if self.missing_account {
            return Err(RewardsError::AccountNotFound(account_id.to_string()));
        }
        match block_height {
            None => Ok(self.native_balance),
            Some(height) => self
                .historical_balances
                .get(&height)
                .copied()
                .ok_or_else(|| {
                    RewardsError::RpcUnavailable(format!("no state for block {}", height))
                }),
        }
    }

    async fn is_contract(&self, _account_id: &str) -> RewardsResult<bool> {
        self.lockup_probe_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.has_contract)
    }

    async fn get_validators(&self) -> RewardsResult<EpochInfo> {
        Ok(EpochInfo {
            epoch_start_height: self.epoch_start_height,
            epoch_height: 1_234,
        })
    }

    async fn get_final_block(&self) -> RewardsResult<BlockInfo> {
        Ok(BlockInfo::from_header(
            self.head_height,
            1_700_000_000_000_000_000,
        ))
    }

    async fn get_account_in_pool(
        &self,
        _account_id: &str,
        _pool_id: &str,
        block_height: Option<u64>,
    ) -> RewardsResult<Option<PoolAccount>> {
        if self.pool_record_fails {
            return Err(RewardsError::RpcUnavailable("pool query failed".to_string()));
        }
        match block_height {
            None => Ok(self.current_pool_record.clone()),
            Some(_) => Ok(self.historical_pool_record.clone()),
        }
    }

    async fn get_staking_pool_account_id(
        &self,
        _account_id: &str,
    ) -> RewardsResult<Option<String>> {
        Ok(self.staking_pool.clone())
    }

    async fn get_locked_amount(&self, account_id: &str) -> RewardsResult<Balance> {
        self.lockup_probe_calls.fetch_add(1, Ordering::SeqCst);
        self.locked_amount
            .ok_or_else(|| RewardsError::NotALockupContract(account_id.to_string()))
    }

    async fn get_liquid_owners_balance(&self, account_id: &str) -> RewardsResult<Balance> {
        self.lockup_probe_calls.fetch_add(1, Ordering::SeqCst);
        self.liquid_owners_balance
            .ok_or_else(|| RewardsError::NotALockupContract(account_id.to_string()))
    }
}
