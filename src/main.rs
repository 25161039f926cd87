use anyhow::Result;
use driven::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; variables may come from the environment
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "driven=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    let addr = config.listen_addr()?;

    tracing::info!(
        database = %config.database.name,
        collection = %config.database.collection,
        "Starting driven"
    );

    let store = MongoToyStore::connect(&config.database).await?;
    if !bootstrap_store(&store).await {
        tracing::warn!("Storage not ready, serving anyway");
    }

    ServerBuilder::new()
        .with_store(store)
        .serve(&addr.to_string())
        .await
}
