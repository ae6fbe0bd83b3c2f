pub mod near_rpc;
pub mod price_feed;
pub mod provider;
pub mod rewards;
