use alloy::primitives::Address;
use blockscout_service_launcher::{
    database::{DatabaseConnectSettings, DatabaseSettings},
    launcher::ConfigSettings,
    tracing::{JaegerSettings, TracingSettings},
};
use quest_indexer_logic::indexer::settings::IndexerSettings;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub tracing: TracingSettings,
    #[serde(default)]
    pub jaeger: JaegerSettings,

    pub database: DatabaseSettings,

    pub indexer: IndexerSettings,
}

impl ConfigSettings for Settings {
    const SERVICE_NAME: &'static str = "QUEST_INDEXER";

    fn validate(&self) -> anyhow::Result<()> {
        if self.indexer.contract_address == Address::ZERO {
            anyhow::bail!("indexer contract address must be set");
        }
        if self.indexer.batch_size == 0 {
            anyhow::bail!("indexer batch size must be positive");
        }
        Ok(())
    }
}

impl Settings {
    pub fn default(database_url: String) -> Self {
        Self {
            tracing: Default::default(),
            jaeger: Default::default(),
            database: DatabaseSettings {
                connect: DatabaseConnectSettings::Url(database_url),
                connect_options: Default::default(),
                create_database: false,
                run_migrations: false,
            },
            indexer: Default::default(),
        }
    }
}
