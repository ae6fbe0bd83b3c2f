mod account_snapshot;
mod comparison;
mod epoch_context;
mod pool_account;

pub use account_snapshot::AccountSnapshot;
pub use comparison::{ComparisonResult, RewardDelta};
pub use epoch_context::{BlockInfo, EpochContext, EpochInfo};
pub use pool_account::PoolAccount;
