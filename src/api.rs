//! REST API server for the weather tool service
//!
//! Exposes the tool, context, and widget surface to the hosting agent
//! platform over HTTP. Every invocation carries the opaque agent identifier
//! used as the history key.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::context::HistoryContextProvider;
use crate::error::WeatherServiceError;
use crate::models::{Registration, ToolInput};
use crate::tools::ToolRegistry;
use crate::widget::HistoryWidgetProvider;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Deserialize)]
pub struct InvokeRequest {
    pub agent_id: Option<String>,
    #[serde(default)]
    pub input: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    pub agent_id: Option<String>,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub registry: Arc<ToolRegistry>,
    pub context_provider: Arc<HistoryContextProvider>,
    pub widget_provider: Arc<HistoryWidgetProvider>,
}

/// All declarations this service registers with the platform.
pub fn declared_registrations(state: &ApiState) -> Vec<Registration> {
    let mut registrations: Vec<Registration> = state
        .registry
        .registrations()
        .into_iter()
        .map(Registration::Tool)
        .collect();

    registrations.push(Registration::ContextProvider(
        state.context_provider.registration(),
    ));
    registrations.push(Registration::PinnableWidget(
        state.widget_provider.registration(),
    ));

    registrations
}

fn error_status(error: &WeatherServiceError) -> StatusCode {
    match error {
        WeatherServiceError::ProviderUnavailable(_) => StatusCode::BAD_GATEWAY,
        WeatherServiceError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
        WeatherServiceError::ToolNotFound(_) => StatusCode::NOT_FOUND,
        WeatherServiceError::ViewNotFound(_) => StatusCode::NOT_FOUND,
        WeatherServiceError::InvalidToolInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn require_agent_id(agent_id: Option<String>) -> Result<String, (StatusCode, Json<ApiResponse>)> {
    match agent_id {
        Some(id) if !id.trim().is_empty() => Ok(id),
        _ => Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Missing agent_id".to_string())),
        )),
    }
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Registration Listing
/// =============================

async fn list_registrations(State(state): State<ApiState>) -> Json<ApiResponse> {
    Json(ApiResponse::success(declared_registrations(&state)))
}

/// =============================
/// Tool Invocation Endpoint
/// =============================

async fn invoke_tool(
    State(state): State<ApiState>,
    Path(name): Path<String>,
    Json(req): Json<InvokeRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    info!(tool = %name, "Received tool invocation");

    let agent_id = match require_agent_id(req.agent_id) {
        Ok(id) => id,
        Err(rejection) => return rejection,
    };

    let Some(tool) = state.registry.get(&name) else {
        let error = WeatherServiceError::ToolNotFound(name);
        return (error_status(&error), Json(ApiResponse::error(error.to_string())));
    };

    let input = ToolInput { parameters: req.input };

    match tool.execute(&agent_id, &input).await {
        Ok(output) => (StatusCode::OK, Json(ApiResponse::success(output))),
        Err(e) => (error_status(&e), Json(ApiResponse::error(e.to_string()))),
    }
}

/// =============================
/// View Endpoints
/// =============================

async fn render_context(
    State(state): State<ApiState>,
    Path(name): Path<String>,
    Query(query): Query<ViewQuery>,
) -> (StatusCode, Json<ApiResponse>) {
    if name != state.context_provider.name() {
        let error = WeatherServiceError::ViewNotFound(name);
        return (error_status(&error), Json(ApiResponse::error(error.to_string())));
    }

    let agent_id = match require_agent_id(query.agent_id) {
        Ok(id) => id,
        Err(rejection) => return rejection,
    };

    let context = state.context_provider.render(&agent_id).await;
    (
        StatusCode::OK,
        Json(ApiResponse::success(serde_json::json!({ "context": context }))),
    )
}

async fn render_widget(
    State(state): State<ApiState>,
    Path(name): Path<String>,
    Query(query): Query<ViewQuery>,
) -> (StatusCode, Json<ApiResponse>) {
    if name != state.widget_provider.name() {
        let error = WeatherServiceError::ViewNotFound(name);
        return (error_status(&error), Json(ApiResponse::error(error.to_string())));
    }

    let agent_id = match require_agent_id(query.agent_id) {
        Ok(id) => id,
        Err(rejection) => return rejection,
    };

    let content = state.widget_provider.render(&agent_id).await;
    (StatusCode::OK, Json(ApiResponse::success(content)))
}

/// =============================
/// Router
/// =============================

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/registrations", get(list_registrations))
        .route("/api/tools/:name", post(invoke_tool))
        .route("/api/context/:name", get(render_context))
        .route("/api/widgets/:name", get(render_widget))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    state: ApiState,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryStore;
    use crate::provider::{CurrentConditions, HourlyForecast, WeatherProvider};
    use crate::tools::create_default_registry;
    use crate::Result;

    struct MockProvider;

    #[async_trait::async_trait]
    impl WeatherProvider for MockProvider {
        async fn current_conditions(
            &self,
            _latitude: f64,
            _longitude: f64,
        ) -> Result<CurrentConditions> {
            Ok(CurrentConditions {
                temperature: 18.3,
                wind_speed: 9.1,
                time: "2024-05-01T12:00".to_string(),
            })
        }

        async fn hourly_forecast(
            &self,
            _latitude: f64,
            _longitude: f64,
        ) -> Result<HourlyForecast> {
            Ok(HourlyForecast {
                time: vec!["2024-05-01T12:00".to_string()],
                temperature_2m: vec![18.3],
                wind_speed_10m: vec![9.1],
                relative_humidity_2m: vec![60.0],
            })
        }
    }

    fn test_state() -> ApiState {
        let history = HistoryStore::new();
        let provider: Arc<dyn WeatherProvider> = Arc::new(MockProvider);
        ApiState {
            registry: Arc::new(create_default_registry(provider, history.clone())),
            context_provider: Arc::new(HistoryContextProvider::new(history.clone())),
            widget_provider: Arc::new(HistoryWidgetProvider::new(history)),
        }
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            error_status(&WeatherServiceError::ProviderUnavailable("down".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            error_status(&WeatherServiceError::MalformedResponse("bad".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            error_status(&WeatherServiceError::ToolNotFound("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&WeatherServiceError::InvalidToolInput("x".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_declared_registrations_cover_all_kinds() {
        let state = test_state();

        let registrations = declared_registrations(&state);
        assert_eq!(registrations.len(), 4);

        let tools = registrations
            .iter()
            .filter(|r| matches!(r, Registration::Tool(_)))
            .count();
        assert_eq!(tools, 2);
        assert!(registrations
            .iter()
            .any(|r| matches!(r, Registration::ContextProvider(_))));
        assert!(registrations
            .iter()
            .any(|r| matches!(r, Registration::PinnableWidget(_))));
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool_is_not_found() {
        let state = test_state();

        let (status, Json(response)) = invoke_tool(
            State(state),
            Path("nonexistent".to_string()),
            Json(InvokeRequest {
                agent_id: Some("a1".to_string()),
                input: serde_json::json!({"latitude": 52.52, "longitude": 13.41}),
            }),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!response.success);
    }

    #[tokio::test]
    async fn test_invoke_requires_agent_id() {
        let state = test_state();

        let (status, Json(response)) = invoke_tool(
            State(state),
            Path("weather_lookup".to_string()),
            Json(InvokeRequest {
                agent_id: None,
                input: serde_json::json!({"latitude": 52.52, "longitude": 13.41}),
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!response.success);
    }

    #[tokio::test]
    async fn test_invoke_then_render_views() {
        let state = test_state();

        let (status, Json(response)) = invoke_tool(
            State(state.clone()),
            Path("weather_lookup".to_string()),
            Json(InvokeRequest {
                agent_id: Some("a1".to_string()),
                input: serde_json::json!({"latitude": 52.52, "longitude": 13.41}),
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(response.success);

        let (status, Json(response)) = render_context(
            State(state.clone()),
            Path("weather_history".to_string()),
            Query(ViewQuery {
                agent_id: Some("a1".to_string()),
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let context = response.data.unwrap()["context"].as_str().unwrap().to_string();
        assert!(context.contains("18.3"));

        let (status, Json(response)) = render_widget(
            State(state),
            Path("weather_history_table".to_string()),
            Query(ViewQuery {
                agent_id: Some("a1".to_string()),
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let data = response.data.unwrap();
        assert_eq!(data["type"], "table");
        assert_eq!(data["rows"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_view_name_is_not_found() {
        let state = test_state();

        let (status, _) = render_widget(
            State(state),
            Path("other_widget".to_string()),
            Query(ViewQuery {
                agent_id: Some("a1".to_string()),
            }),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
