//! History context provider
//!
//! Read-only projection of an agent's lookup history, rendered as short
//! natural-language text for injection into the agent's reasoning context.

use crate::history::HistoryStore;
use crate::models::{format_timestamp, ContextRegistration};

/// Returned verbatim when the agent has no recorded searches.
pub const EMPTY_HISTORY_MESSAGE: &str = "No previous weather searches found for this user.";

/// How many recent entries the context text shows.
const RECENT_COUNT: usize = 5;

pub struct HistoryContextProvider {
    history: HistoryStore,
}

impl HistoryContextProvider {
    pub fn new(history: HistoryStore) -> Self {
        Self { history }
    }

    pub fn name(&self) -> &'static str {
        "weather_history"
    }

    pub fn description(&self) -> &'static str {
        "Recent weather searches made by this user"
    }

    pub fn registration(&self) -> ContextRegistration {
        ContextRegistration {
            name: self.name().to_string(),
            description: self.description().to_string(),
        }
    }

    /// Render the context text for one agent. No side effects.
    pub async fn render(&self, agent_id: &str) -> String {
        let recent = self.history.recent(agent_id, RECENT_COUNT).await;
        if recent.is_empty() {
            return EMPTY_HISTORY_MESSAGE.to_string();
        }

        // Total is over the full log, not just the entries shown.
        let total = self.history.all(agent_id).await.len();

        let mut context = format!(
            "The user has made {} weather search(es). Most recent:\n",
            total
        );
        for entry in &recent {
            context.push_str(&format!(
                "- {} at {:.2}, {:.2}: {}°C, wind {} km/h\n",
                format_timestamp(entry.timestamp_ms),
                entry.latitude,
                entry.longitude,
                entry.temperature,
                entry.wind_speed
            ));
        }

        context
    }
}
