mod indexer;
mod settings;

pub use settings::Settings;

use blockscout_service_launcher::database;
use migration::Migrator;

pub async fn run(settings: Settings) -> Result<(), anyhow::Error> {
    let db_connection = database::initialize_postgres::<Migrator>(&settings.database).await?;

    let quest_indexer = indexer::build(&settings, db_connection)?;
    quest_indexer.initialize().await?;

    // one synchronous pass from the cursor to the head before polling takes over
    quest_indexer.catch_up().await?;
    quest_indexer.clone().start_polling();

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown requested, stopping polling");
    quest_indexer.stop_polling();

    Ok(())
}
