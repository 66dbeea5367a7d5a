use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use railway::infrastructure::AppState;
use railway::{config, db, server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "railway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    // Check for --profile CLI argument
    let args: Vec<String> = std::env::args().collect();
    let profile = args
        .iter()
        .position(|arg| arg == "--profile")
        .and_then(|pos| args.get(pos + 1))
        .cloned();

    let config = config::Config::from_env_with_profile(profile);
    tracing::info!(
        "Starting railway API (profile={}, time comparison={})",
        config.profile,
        config.time_comparison
    );

    // Initialize database
    let db = db::init_db(&config.database_url).await.map_err(|e| {
        tracing::error!("Failed to initialize database: {}", e);
        e
    })?;

    let state = AppState::new(db, config.time_comparison);
    let app = server::build_router(state, &config.cors_allowed_origins);

    server::serve(app, config.port).await?;
    Ok(())
}
