use log::{info, warn};
use serde::Deserialize;

const TICKER_URL: &str = "https://api.binance.com/api/v3/ticker/price?symbol=NEARUSDT";

#[derive(Debug, Deserialize)]
struct TickerResponse {
    price: String,
}

/// Current NEAR/USDT spot price. Any failure yields `None` and the caller
/// simply omits USD figures.
pub async fn fetch_near_price() -> Option<f64> {
    info!("Fetching NEAR price from {}", TICKER_URL);
    let client = reqwest::Client::new();
    let response = match client.get(TICKER_URL).send().await {
        Ok(response) => response,
        Err(err) => {
            warn!("Price request failed: {}", err);
            return None;
        }
    };

    let ticker: TickerResponse = match response.json().await {
        Ok(ticker) => ticker,
        Err(err) => {
            warn!("Unexpected price response: {}", err);
            return None;
        }
    };

    match ticker.price.parse::<f64>() {
        Ok(price) => Some(price),
        Err(_) => {
            warn!("Unparseable price: {}", ticker.price);
            None
        }
    }
}
