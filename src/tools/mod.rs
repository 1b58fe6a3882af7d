//! Tool trait and registry
//!
//! Tools are schema-declared operations exposed to the hosting agent
//! platform. Both weather tools call the external forecast provider; only
//! the current-conditions tool records the lookup in the agent's history.

use crate::error::WeatherServiceError;
use crate::history::HistoryStore;
use crate::models::{HistoryEntry, ToolInput, ToolOutput, ToolRegistration};
use crate::provider::WeatherProvider;
use crate::Result;
use chrono::Utc;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Trait for a single platform-callable tool
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn input_schema(&self) -> Value;
    fn output_schema(&self) -> Value;
    /// Per-call price charged to the platform. Every tool here is free.
    fn price(&self) -> f64 {
        0.0
    }
    /// Execute on behalf of the agent identified by `agent_id`.
    async fn execute(&self, agent_id: &str, input: &ToolInput) -> Result<ToolOutput>;
}

/// Tool registry for looking up and executing tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn list(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Declarations for platform registration.
    pub fn registrations(&self) -> Vec<ToolRegistration> {
        self.tools
            .values()
            .map(|tool| ToolRegistration {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.input_schema(),
                output_schema: tool.output_schema(),
                price: tool.price(),
            })
            .collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Both tools take the same coordinate pair. Required, numeric, no bounds
/// validation: out-of-range coordinates are the provider's to reject.
fn require_coordinate(input: &ToolInput, key: &str) -> Result<f64> {
    input
        .parameters
        .get(key)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| {
            WeatherServiceError::InvalidToolInput(format!(
                "Expected numeric '{}' in tool input",
                key
            ))
        })
}

fn coordinate_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "latitude": {
                "type": "number",
                "description": "Latitude in decimal degrees"
            },
            "longitude": {
                "type": "number",
                "description": "Longitude in decimal degrees"
            }
        },
        "required": ["latitude", "longitude"]
    })
}

/// Fetches current conditions and records the lookup in the agent's history.
pub struct WeatherLookupTool {
    provider: Arc<dyn WeatherProvider>,
    history: HistoryStore,
}

impl WeatherLookupTool {
    pub fn new(provider: Arc<dyn WeatherProvider>, history: HistoryStore) -> Self {
        Self { provider, history }
    }
}

#[async_trait::async_trait]
impl Tool for WeatherLookupTool {
    fn name(&self) -> &'static str {
        "weather_lookup"
    }

    fn description(&self) -> &'static str {
        "Get current temperature and wind speed for a coordinate pair"
    }

    fn input_schema(&self) -> Value {
        coordinate_schema()
    }

    fn output_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "temperature": {
                    "type": "number",
                    "description": "Current temperature in Celsius"
                },
                "windSpeed": {
                    "type": "number",
                    "description": "Current wind speed in km/h"
                }
            }
        })
    }

    async fn execute(&self, agent_id: &str, input: &ToolInput) -> Result<ToolOutput> {
        let latitude = require_coordinate(input, "latitude")?;
        let longitude = require_coordinate(input, "longitude")?;

        // The fetch completes (or fails) before the store is touched, so the
        // history lock is never held across provider I/O. On failure nothing
        // is written.
        let conditions = self.provider.current_conditions(latitude, longitude).await?;

        let entry = HistoryEntry {
            timestamp_ms: Utc::now().timestamp_millis(),
            latitude,
            longitude,
            temperature: conditions.temperature,
            wind_speed: conditions.wind_speed,
        };
        self.history.append(agent_id, entry).await;

        info!(agent_id, latitude, longitude, "Recorded weather lookup");

        Ok(ToolOutput {
            success: true,
            summary: format!(
                "Current weather at {}, {}: {}°C, wind {} km/h",
                latitude, longitude, conditions.temperature, conditions.wind_speed
            ),
            data: json!({
                "temperature": conditions.temperature,
                "windSpeed": conditions.wind_speed,
            }),
        })
    }
}

/// Fetches the hourly forecast series. Read-only with respect to history.
pub struct ForecastLookupTool {
    provider: Arc<dyn WeatherProvider>,
}

impl ForecastLookupTool {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait::async_trait]
impl Tool for ForecastLookupTool {
    fn name(&self) -> &'static str {
        "forecast_lookup"
    }

    fn description(&self) -> &'static str {
        "Get the hourly forecast (temperature, wind speed, humidity) for a coordinate pair"
    }

    fn input_schema(&self) -> Value {
        coordinate_schema()
    }

    fn output_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "time": {
                    "type": "array",
                    "items": {"type": "string"}
                },
                "temperature_2m": {
                    "type": "array",
                    "items": {"type": "number"}
                },
                "wind_speed_10m": {
                    "type": "array",
                    "items": {"type": "number"}
                },
                "relative_humidity_2m": {
                    "type": "array",
                    "items": {"type": "number"}
                }
            }
        })
    }

    async fn execute(&self, _agent_id: &str, input: &ToolInput) -> Result<ToolOutput> {
        let latitude = require_coordinate(input, "latitude")?;
        let longitude = require_coordinate(input, "longitude")?;

        let forecast = self.provider.hourly_forecast(latitude, longitude).await?;

        Ok(ToolOutput {
            success: true,
            summary: format!(
                "{} hourly forecast points available for {}, {}",
                forecast.time.len(),
                latitude,
                longitude
            ),
            data: json!({
                "time": forecast.time,
                "temperature_2m": forecast.temperature_2m,
                "wind_speed_10m": forecast.wind_speed_10m,
                "relative_humidity_2m": forecast.relative_humidity_2m,
            }),
        })
    }
}

/// Create the default registry with both weather tools.
pub fn create_default_registry(
    provider: Arc<dyn WeatherProvider>,
    history: HistoryStore,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(Arc::new(WeatherLookupTool::new(
        provider.clone(),
        history,
    )));
    registry.register(Arc::new(ForecastLookupTool::new(provider)));

    registry
}
