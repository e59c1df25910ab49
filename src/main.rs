// CodeTrack CLI
// Fetches a user's cross-platform practice profile and prints the
// aggregated overview alongside the contest board

use std::env;

use anyhow::Context as _;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codetrack::api::client::ResilientClient;
use codetrack::api::contests::ContestService;
use codetrack::api::profiles::ProfileService;
use codetrack::features::overview::aggregate;
use codetrack::utils::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "codetrack=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    let user_id = env::var("CODETRACK_USER_ID").context("CODETRACK_USER_ID must be set")?;

    info!("Fetching profile for {} from {}", user_id, config.api_base_url);

    let client = ResilientClient::from_config(&config).context("Failed to create HTTP client")?;
    let profiles = ProfileService::new(client.clone(), &config.api_base_url);
    let contests = ContestService::new(client, &config.api_base_url);

    let bundle = match profiles.get_profile(&user_id, None, None).await {
        Ok(bundle) => bundle,
        Err(fetch_error) => {
            error!("{}", fetch_error.user_message());
            return Err(fetch_error.into());
        }
    };

    let overview = aggregate(&bundle);
    println!("{}", serde_json::to_string_pretty(&overview)?);

    let board = contests.board().await;
    info!(
        "{} upcoming and {} active contest(s)",
        board.upcoming.len(),
        board.active.len()
    );
    println!("{}", serde_json::to_string_pretty(&board)?);

    Ok(())
}
