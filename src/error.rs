use thiserror::Error;

pub type RewardsResult<T> = std::result::Result<T, RewardsError>;

#[derive(Error, Debug)]
pub enum RewardsError {
    #[error("account {0} does not exist at the queried block")]
    AccountNotFound(String),
    #[error("all configured RPC endpoints failed: {0}")]
    RpcUnavailable(String),
    #[error("{0} is not a lockup contract")]
    NotALockupContract(String),
    #[error("failed to parse {field}: {value}")]
    ParseFailure { field: String, value: String },
}
