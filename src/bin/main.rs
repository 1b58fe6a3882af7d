use serde_json::json;
use std::sync::Arc;
use tracing::info;
use weather_tool_service::{
    context::HistoryContextProvider,
    history::HistoryStore,
    models::ToolInput,
    provider::{OpenMeteoClient, WeatherProvider},
    tools::create_default_registry,
    widget::HistoryWidgetProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    dotenv::dotenv().ok();

    info!("Weather Tool Service demo starting");

    // Create components
    let provider: Arc<dyn WeatherProvider> = Arc::new(OpenMeteoClient::from_env());
    let history = HistoryStore::new();
    let registry = create_default_registry(provider, history.clone());
    let context_provider = HistoryContextProvider::new(history.clone());
    let widget_provider = HistoryWidgetProvider::new(history);

    let agent_id = "demo-user";
    let input = ToolInput {
        // Berlin
        parameters: json!({"latitude": 52.52, "longitude": 13.41}),
    };

    let weather_tool = registry
        .get("weather_lookup")
        .expect("weather_lookup registered");

    match weather_tool.execute(agent_id, &input).await {
        Ok(output) => {
            println!("\n=== WEATHER LOOKUP ===");
            println!("{}", output.summary);
            println!("Data: {}", output.data);
        }
        Err(e) => {
            eprintln!("Weather lookup failed: {}", e);
            return Err(Box::new(e) as Box<dyn std::error::Error>);
        }
    }

    let forecast_tool = registry
        .get("forecast_lookup")
        .expect("forecast_lookup registered");

    match forecast_tool.execute(agent_id, &input).await {
        Ok(output) => {
            println!("\n=== HOURLY FORECAST ===");
            println!("{}", output.summary);
        }
        Err(e) => eprintln!("Forecast lookup failed: {}", e),
    }

    println!("\n=== AGENT CONTEXT ===");
    println!("{}", context_provider.render(agent_id).await);

    println!("=== WIDGET PAYLOAD ===");
    let content = widget_provider.render(agent_id).await;
    println!("{}", serde_json::to_string_pretty(&content)?);

    Ok(())
}
