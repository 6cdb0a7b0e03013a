use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod routes;
mod store;
mod weather;

use config::Config;
use routes::{cors_layer, create_router, AppState};
use store::RecordStore;
use weather::{weatherstack::WeatherstackClient, WeatherService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_lookup_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Records live only as long as this process
    let client = WeatherstackClient::new(&config)?;
    let weather = Arc::new(WeatherService::new(client, RecordStore::new()));

    let state = AppState { weather };

    let app = create_router(state)
        .layer(cors_layer(&config)?)
        .layer(TraceLayer::new_for_http());

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server starting on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
