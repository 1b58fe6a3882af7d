use std::sync::Arc;
use tracing::info;
use weather_tool_service::{
    api::{start_server, ApiState},
    context::HistoryContextProvider,
    history::HistoryStore,
    provider::{OpenMeteoClient, WeatherProvider},
    tools::create_default_registry,
    widget::HistoryWidgetProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let api_port: u16 = std::env::var("PORT")
        .or_else(|_| std::env::var("API_PORT"))
        .unwrap_or_else(|_| "8080".to_string())
        .parse()?;

    info!("Weather Tool Service - API Server");
    info!("Port: {}", api_port);

    // Create components
    let provider: Arc<dyn WeatherProvider> = Arc::new(OpenMeteoClient::from_env());
    let history = HistoryStore::new();

    let state = ApiState {
        registry: Arc::new(create_default_registry(provider, history.clone())),
        context_provider: Arc::new(HistoryContextProvider::new(history.clone())),
        widget_provider: Arc::new(HistoryWidgetProvider::new(history)),
    };

    info!("Tool registry, context provider, and widget provider initialized");

    // Start API server
    start_server(state, api_port).await?;

    Ok(())
}
