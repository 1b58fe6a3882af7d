//! Core data models for the weather tool service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

//
// ================= History =================
//

/// One recorded weather lookup.
///
/// Entries are append-only: once written they are never mutated or deleted
/// for the lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Milliseconds since epoch, captured at write time.
    pub timestamp_ms: i64,
    /// Caller-supplied degrees, range unvalidated.
    pub latitude: f64,
    pub longitude: f64,
    /// Provider-reported, Celsius.
    pub temperature: f64,
    /// Provider-reported, km/h.
    pub wind_speed: f64,
}

/// Render a millisecond epoch timestamp for display.
pub fn format_timestamp(timestamp_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

//
// ================= Tool I/O =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInput {
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    pub success: bool,
    /// Human-readable summary of the result.
    pub summary: String,
    /// Structured result data.
    pub data: serde_json::Value,
}

//
// ================= Widget Payload =================
//

/// Renderable payload returned by a pinnable widget: plain text or a
/// structured table description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WidgetContent {
    Text {
        message: String,
    },
    Table {
        columns: Vec<TableColumn>,
        rows: Vec<HashMap<String, String>>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableColumn {
    /// Row-map key this column reads from.
    pub key: String,
    pub header: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub width: u32,
}

impl TableColumn {
    pub fn text(key: &str, header: &str, width: u32) -> Self {
        Self {
            key: key.to_string(),
            header: header.to_string(),
            kind: "text".to_string(),
            width,
        }
    }
}

//
// ================= Registrations =================
//

/// Closed set of declarations this service registers with the hosting agent
/// platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Registration {
    Tool(ToolRegistration),
    ContextProvider(ContextRegistration),
    PinnableWidget(WidgetRegistration),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRegistration {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
    pub output_schema: serde_json::Value,
    /// Per-call price charged to the platform.
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextRegistration {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetRegistration {
    pub name: String,
    pub label: String,
    pub icon: String,
    pub description: String,
}
