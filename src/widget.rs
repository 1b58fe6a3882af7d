//! History widget provider
//!
//! Pinnable UI element rendering an agent's full lookup history as a table,
//! oldest entry first.

use crate::history::HistoryStore;
use crate::models::{format_timestamp, TableColumn, WidgetContent, WidgetRegistration};
use std::collections::HashMap;

pub struct HistoryWidgetProvider {
    history: HistoryStore,
}

impl HistoryWidgetProvider {
    pub fn new(history: HistoryStore) -> Self {
        Self { history }
    }

    pub fn name(&self) -> &'static str {
        "weather_history_table"
    }

    pub fn registration(&self) -> WidgetRegistration {
        WidgetRegistration {
            name: self.name().to_string(),
            label: "Weather Searches".to_string(),
            icon: "cloud".to_string(),
            description: "Table of this user's weather searches".to_string(),
        }
    }

    /// Render the widget payload for one agent. No side effects.
    pub async fn render(&self, agent_id: &str) -> WidgetContent {
        let entries = self.history.all(agent_id).await;
        if entries.is_empty() {
            return WidgetContent::Text {
                message: "No weather searches yet.".to_string(),
            };
        }

        let columns = vec![
            TableColumn::text("time", "Time", 160),
            TableColumn::text("location", "Location", 140),
            TableColumn::text("temperature", "Temperature", 100),
            TableColumn::text("wind_speed", "Wind Speed", 100),
        ];

        let rows = entries
            .iter()
            .map(|entry| {
                HashMap::from([
                    (
                        "time".to_string(),
                        format_timestamp(entry.timestamp_ms),
                    ),
                    (
                        "location".to_string(),
                        format!("{:.2}, {:.2}", entry.latitude, entry.longitude),
                    ),
                    (
                        "temperature".to_string(),
                        format!("{}°C", entry.temperature),
                    ),
                    (
                        "wind_speed".to_string(),
                        format!("{} km/h", entry.wind_speed),
                    ),
                ])
            })
            .collect();

        WidgetContent::Table { columns, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HistoryEntry;

    fn entry(timestamp_ms: i64, temperature: f64) -> HistoryEntry {
        HistoryEntry {
            timestamp_ms,
            latitude: 52.52,
            longitude: 13.41,
            temperature,
            wind_speed: 9.1,
        }
    }

    #[tokio::test]
    async fn test_empty_history_renders_message_without_rows() {
        let provider = HistoryWidgetProvider::new(HistoryStore::new());

        let content = provider.render("a1").await;

        match content {
            WidgetContent::Text { message } => {
                assert!(message.to_lowercase().contains("no weather searches"));
            }
            WidgetContent::Table { .. } => panic!("empty history must not render a table"),
        }
    }

    #[tokio::test]
    async fn test_single_lookup_renders_one_formatted_row() {
        let history = HistoryStore::new();
        history.append("a1", entry(1_700_000_000_000, 18.3)).await;
        let provider = HistoryWidgetProvider::new(history);

        let content = provider.render("a1").await;

        let WidgetContent::Table { columns, rows } = content else {
            panic!("expected a table");
        };
        let headers: Vec<&str> = columns.iter().map(|c| c.header.as_str()).collect();
        assert_eq!(headers, vec!["Time", "Location", "Temperature", "Wind Speed"]);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["location"], "52.52, 13.41");
        assert_eq!(rows[0]["temperature"], "18.3°C");
        assert_eq!(rows[0]["wind_speed"], "9.1 km/h");
        assert_eq!(rows[0]["time"], "2023-11-14 22:13:20");
    }

    #[tokio::test]
    async fn test_rows_are_oldest_first() {
        let history = HistoryStore::new();
        for i in 0..6 {
            history
                .append("a1", entry(1_700_000_000_000 + i, i as f64))
                .await;
        }
        let provider = HistoryWidgetProvider::new(history);

        let WidgetContent::Table { rows, .. } = provider.render("a1").await else {
            panic!("expected a table");
        };

        // Full history, not truncated to recent
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0]["temperature"], "0°C");
        assert_eq!(rows[5]["temperature"], "5°C");
    }

    #[tokio::test]
    async fn test_location_rounds_to_two_decimals() {
        let history = HistoryStore::new();
        history
            .append(
                "a1",
                HistoryEntry {
                    timestamp_ms: 1_700_000_000_000,
                    latitude: 52.5244,
                    longitude: 13.4105,
                    temperature: 18.3,
                    wind_speed: 9.1,
                },
            )
            .await;
        let provider = HistoryWidgetProvider::new(history);

        let WidgetContent::Table { rows, .. } = provider.render("a1").await else {
            panic!("expected a table");
        };

        assert_eq!(rows[0]["location"], "52.52, 13.41");
    }
}
