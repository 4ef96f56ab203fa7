use std::sync::Arc;

use quest_indexer_logic::{client::ChainClient, indexer::QuestIndexer};
use sea_orm::DatabaseConnection;

use crate::settings::Settings;

pub fn build(
    settings: &Settings,
    db_connection: DatabaseConnection,
) -> Result<Arc<QuestIndexer>, anyhow::Error> {
    let client = ChainClient::new(
        &settings.indexer.rpc_url,
        settings.indexer.contract_address,
    )?;

    Ok(Arc::new(QuestIndexer::new(
        client,
        Arc::new(db_connection),
        settings.indexer.clone(),
    )))
}
