//! Weather Tool Service
//!
//! Exposes callable weather tools to a hosting agent platform:
//! - Fetches current conditions and hourly forecasts from the Open-Meteo API
//! - Records each agent's lookups in a per-agent append-only history
//! - Surfaces that history as reasoning context and as a pinnable UI widget
//!
//! FLOW:
//! AGENT → TOOL → PROVIDER FETCH → HISTORY APPEND → RESULT

pub mod api;
pub mod context;
pub mod error;
pub mod history;
pub mod models;
pub mod provider;
pub mod tools;
pub mod widget;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use provider::{CurrentConditions, HourlyForecast, WeatherProvider};
