use near_primitives::types::Balance;
use serde::Serialize;

/// Holdings of one account at one block. `None` balances mean the sub-query
/// failed and the value is unknown; `Some(0)` is a definitive zero.
#[derive(Debug, Clone, Serialize)]
pub struct AccountSnapshot {
    pub account_id: String,
    pub pool_account_id: Option<String>,
    /// Block the snapshot was pinned to; `None` means the current head.
    pub block_height: Option<u64>,
    pub native_balance: Balance,
    pub liquid_balance: Balance,
    pub staked_balance: Option<Balance>,
    pub unstaked_balance: Option<Balance>,
    pub locked_amount: Option<Balance>,
    pub can_withdraw: bool,
    pub reward: Balance,
}
