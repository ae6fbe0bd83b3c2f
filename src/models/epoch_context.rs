use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct BlockInfo {
    pub height: u64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl BlockInfo {
    pub fn from_header(height: u64, timestamp_nanos: u64) -> Self {
        let timestamp = DateTime::<Utc>::from_timestamp((timestamp_nanos / 1_000_000_000) as i64, 0)
            .unwrap_or_default();
        Self { height, timestamp }
    }
}

/// Active-epoch descriptor as reported by the validators endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct EpochInfo {
    pub epoch_start_height: u64,
    pub epoch_height: u64,
}

/// Chain head plus active epoch, fetched once per comparison and shared.
#[derive(Debug, Clone, Serialize)]
pub struct EpochContext {
    pub head: BlockInfo,
    pub epoch_start_height: u64,
    pub epoch_height: u64,
}

impl EpochContext {
    pub fn new(head: BlockInfo, epoch: EpochInfo) -> Self {
        Self {
            head,
            epoch_start_height: epoch.epoch_start_height,
            epoch_height: epoch.epoch_height,
        }
    }

    pub fn blocks_into_epoch(&self) -> u64 {
        self.head.height.saturating_sub(self.epoch_start_height)
    }
}
