use dotenv::dotenv;
use log::info;
use near_primitives::types::Balance;

use near_rewards::config::Config;
use near_rewards::models::{ComparisonResult, RewardDelta};
use near_rewards::services::near_rpc::NearRpcClient;
use near_rewards::services::price_feed;
use near_rewards::services::rewards::RewardsAggregator;
use near_rewards::utils::format;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    info!("Querying staking rewards for {}", config.account_id);

    let client = NearRpcClient::connect(&config.rpc_endpoints);
    let aggregator = RewardsAggregator::new(client);

    let comparison = aggregator
        .get_rewards_comparison(&config.account_id, config.pool_id.as_deref())
        .await?;
    let price = price_feed::fetch_near_price().await;

    print_report(&comparison, price);
    Ok(())
}

fn print_report(comparison: &ComparisonResult, price: Option<f64>) {
    let snapshot = &comparison.current;

    println!("Account:          {}", snapshot.account_id);
    match &snapshot.pool_account_id {
        Some(pool) => println!("Staking pool:     {}", pool),
        None => println!("Staking pool:     none"),
    }
    println!(
        "Block:            {} ({} blocks into epoch {})",
        comparison.epoch.head.height,
        comparison.epoch.blocks_into_epoch(),
        comparison.epoch.epoch_height
    );

    print_balance("Native balance", Some(snapshot.native_balance), price);
    print_balance("Liquid balance", Some(snapshot.liquid_balance), price);
    print_balance("Staked", snapshot.staked_balance, price);
    print_balance("Unstaked", snapshot.unstaked_balance, price);
    print_balance("Locked", snapshot.locked_amount, price);
    if snapshot.unstaked_balance.unwrap_or(0) > 0 {
        let status = if snapshot.can_withdraw {
            "available"
        } else {
            "pending"
        };
        println!("Withdrawal:       {}", status);
    }
    print_balance("Reward", Some(snapshot.reward), price);

    match &comparison.delta {
        RewardDelta::Measured(delta) => println!(
            "Epoch delta:      {} NEAR (measured)",
            format::format_signed_near(delta)
        ),
        RewardDelta::Estimated(delta) => println!(
            "Epoch delta:      {} NEAR (estimated)",
            format::format_signed_near(delta)
        ),
        RewardDelta::Unavailable => println!("Epoch delta:      unavailable"),
    }
}

fn print_balance(label: &str, amount: Option<Balance>, price: Option<f64>) {
    let label = format!("{}:", label);
    match amount {
        // A failed sub-query is reported as unknown, never as a zero.
        None => println!("{:<17} unknown", label),
        Some(yocto) => match price {
            Some(price) => println!(
                "{:<17} {} NEAR (${})",
                label,
                format::format_near(yocto),
                format::format_usd(format::to_near(yocto) * price)
            ),
            None => println!("{:<17} {} NEAR", label, format::format_near(yocto)),
        },
    }
}
