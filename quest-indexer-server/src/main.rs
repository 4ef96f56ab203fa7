use blockscout_service_launcher::launcher::ConfigSettings;
use quest_indexer_server::{run, Settings};

const SERVICE_NAME: &str = "quest_indexer";

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let settings = Settings::build().expect("failed to read config");

    blockscout_service_launcher::tracing::init_logs(
        SERVICE_NAME,
        &settings.tracing,
        &settings.jaeger,
    )?;

    run(settings).await
}
