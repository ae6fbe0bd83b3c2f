use serde::{Deserialize, Serialize};

/// Delegation record returned by a staking pool's `get_account` view method.
/// Balances are U128 values and arrive as JSON strings; they are parsed late
/// so a malformed field degrades on its own instead of failing the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolAccount {
    pub account_id: String,
    pub staked_balance: String,
    pub unstaked_balance: String,
    pub can_withdraw: bool,
}
