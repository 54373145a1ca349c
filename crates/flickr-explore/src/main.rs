//! flickr-explore - refresh the local folder of Flickr Explore featured images

use clap::Parser;
use flickr_api::FlickrClient;
use flickr_explore::{Config, RefreshPipeline, Result};
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; a malformed one is not
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e.into());
        }
    }

    // Initialize logging
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let env_filter = EnvFilter::from_default_env()
        .add_directive(format!("flickr_explore={}", level).parse()?)
        .add_directive(format!("flickr_api={}", level).parse()?)
        .add_directive(format!("explore_store={}", level).parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    let config = Config::parse();

    info!("Starting Flickr Explore refresh...");
    info!("Output dir: {:?}", config.out_dir);
    info!("Image size: {}", config.image_size);

    let client = FlickrClient::new(&config.api_key)?;
    let pipeline = RefreshPipeline::new(client, config.refresh_config());
    let report = match config.date {
        Some(date) => pipeline.run(date).await?,
        None => pipeline.run_latest().await?,
    };

    info!(
        persisted = report.persisted,
        evicted = report.evicted_items,
        "Refresh complete"
    );
    if let Ok(json) = serde_json::to_string(&report) {
        info!(report = %json, "Refresh report");
    }

    Ok(())
}
