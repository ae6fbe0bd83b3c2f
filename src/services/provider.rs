use async_trait::async_trait;
use near_primitives::types::Balance;

use crate::error::RewardsResult;
use crate::models::{BlockInfo, EpochInfo, PoolAccount};

/// Read-only chain queries the aggregator is built on. `NearRpcClient` is
/// the production implementation; tests drive the aggregator through a stub.
#[async_trait]
pub trait ChainProvider {
    /// Native balance of the account, optionally pinned to a historical
    /// block. Fails with `AccountNotFound` if the account does not exist
    /// at that block.
    async fn get_native_balance(
        &self,
        account_id: &str,
        block_height: Option<u64>,
    ) -> RewardsResult<Balance>;

    /// Whether the account has contract code deployed. A plain account is
    /// `false`, not an error.
    async fn is_contract(&self, account_id: &str) -> RewardsResult<bool>;

    async fn get_validators(&self) -> RewardsResult<EpochInfo>;

    async fn get_final_block(&self) -> RewardsResult<BlockInfo>;

    /// Delegation record of `account_id` in the given staking pool. `None`
    /// means the account has no record there (or the pool is not callable),
    /// which is distinct from a transport failure.
    async fn get_account_in_pool(
        &self,
        account_id: &str,
        pool_id: &str,
        block_height: Option<u64>,
    ) -> RewardsResult<Option<PoolAccount>>;

    /// Delegation target configured on a lockup contract. `None` when the
    /// account is not a lockup or has no pool selected.
    async fn get_staking_pool_account_id(
        &self,
        account_id: &str,
    ) -> RewardsResult<Option<String>>;

    /// Lockup principal still vesting. Fails with `NotALockupContract` on a
    /// non-lockup account; callers catch that and treat it as zero.
    async fn get_locked_amount(&self, account_id: &str) -> RewardsResult<Balance>;

    /// Owner's liquid balance on a lockup contract. Same failure contract
    /// as `get_locked_amount`.
    async fn get_liquid_owners_balance(&self, account_id: &str) -> RewardsResult<Balance>;
}
