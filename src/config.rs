use std::env;

pub struct Config {
    pub account_id: String,
    pub pool_id: Option<String>,
    pub rpc_endpoints: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            account_id: env::var("NEAR_ACCOUNT_ID").expect("NEAR_ACCOUNT_ID must be set"),
            pool_id: env::var("NEAR_POOL_ID").ok(),
            rpc_endpoints: env::var("NEAR_RPC_ENDPOINTS")
                .unwrap_or_else(|_| {
                    "https://rpc.mainnet.near.org,https://archival-rpc.mainnet.near.org".to_string()
                })
                .split(',')
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty())
                .collect(),
        }
    }
}
