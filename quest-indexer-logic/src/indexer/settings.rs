use alloy::primitives::Address;
use serde::Deserialize;
use serde_with::serde_as;
use std::time::Duration;

use crate::retry::RetryPolicy;

#[serde_as]
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct IndexerSettings {
    pub rpc_url: String,

    pub contract_address: Address,

    pub deployment_block: u64,

    /// Blocks per log-fetch batch; each batch is one retry/checkpoint unit.
    #[serde(default = "default_batch_size")]
    pub batch_size: u64,

    #[serde(default = "default_polling_interval")]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    pub polling_interval: Duration,

    #[serde(default)]
    pub retry: RetrySettings,
}

#[serde_as]
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_base_delay")]
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub base_delay: Duration,

    #[serde(default = "default_max_delay")]
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub max_delay: Duration,
}

impl RetrySettings {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: self.base_delay,
            max_delay: self.max_delay,
        }
    }
}

fn default_batch_size() -> u64 {
    100
}

fn default_polling_interval() -> Duration {
    Duration::from_secs(15)
}

fn default_max_attempts() -> u32 {
    5
}

fn default_base_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(30)
}

impl Default for IndexerSettings {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            contract_address: Address::ZERO,
            deployment_block: 0,
            batch_size: default_batch_size(),
            polling_interval: default_polling_interval(),
            retry: Default::default(),
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay: default_base_delay(),
            max_delay: default_max_delay(),
        }
    }
}
