use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, AppResult};

const DEFAULT_LEDGER_FILE: &str = "completed_tickets.txt";
const DEFAULT_ESTIMATED_FIELD: &str = "customfield_11728";
// The field option was created with a trailing space; the update payload has
// to match it exactly or Jira rejects the value.
const DEFAULT_ESTIMATED_VALUE: &str = "AI Estimated ";
const DEFAULT_ESTIMATE_DELAY_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jira_base_url: String,
    pub jira_email: String,
    pub jira_token: String,
    pub jira_sprint: String,
    pub estimated_field: String,
    pub estimated_value: String,
    pub glean_instance: String,
    pub glean_agent_id: String,
    pub glean_token: String,
    pub ledger_path: PathBuf,
    pub estimate_delay: Duration,
}

impl AppConfig {
    /// Reads the configuration from the process environment. Callers are
    /// expected to have loaded any `.env` file beforehand.
    pub fn load() -> AppResult<Self> {
        Ok(Self {
            jira_base_url: required_var("JIRA_BASE_URL")?,
            jira_email: required_var("JIRA_EMAIL")?,
            jira_token: required_var("JIRA_TOKEN")?,
            jira_sprint: required_var("JIRA_SPRINT")?,
            estimated_field: var_or("JIRA_ESTIMATED_FIELD", DEFAULT_ESTIMATED_FIELD),
            estimated_value: var_or("JIRA_ESTIMATED_VALUE", DEFAULT_ESTIMATED_VALUE),
            glean_instance: required_var("GLEAN_INSTANCE")?,
            glean_agent_id: required_var("GLEAN_AGENT_ID")?,
            glean_token: required_var("GLEAN_TOKEN")?,
            ledger_path: PathBuf::from(var_or("COMPLETED_TICKETS_FILE", DEFAULT_LEDGER_FILE)),
            estimate_delay: Duration::from_secs(delay_secs()?),
        })
    }

    /// JQL filter selecting the tickets eligible for estimation: still to do,
    /// in the configured sprint, and not flagged.
    pub fn backlog_query(&self) -> String {
        format!(
            "status = 'To Do' AND Sprint = '{}' AND Flagged is EMPTY",
            self.jira_sprint
        )
    }

    pub fn ticket_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.jira_base_url.trim_end_matches('/'), key)
    }
}

fn required_var(name: &str) -> AppResult<String> {
    env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Configuration(format!("{name} environment variable is not set")))
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn delay_secs() -> AppResult<u64> {
    match env::var("ESTIMATE_DELAY_SECS") {
        Ok(value) if !value.is_empty() => value.parse().map_err(|_| {
            AppError::Configuration(format!(
                "ESTIMATE_DELAY_SECS must be a whole number of seconds, got '{value}'"
            ))
        }),
        _ => Ok(DEFAULT_ESTIMATE_DELAY_SECS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> AppConfig {
        AppConfig {
            jira_base_url: "https://example.atlassian.net/".to_string(),
            jira_email: "bot@example.com".to_string(),
            jira_token: "jira-token".to_string(),
            jira_sprint: "Board 12 - On Deck".to_string(),
            estimated_field: DEFAULT_ESTIMATED_FIELD.to_string(),
            estimated_value: DEFAULT_ESTIMATED_VALUE.to_string(),
            glean_instance: "example".to_string(),
            glean_agent_id: "agent-1".to_string(),
            glean_token: "glean-token".to_string(),
            ledger_path: PathBuf::from(DEFAULT_LEDGER_FILE),
            estimate_delay: Duration::from_secs(DEFAULT_ESTIMATE_DELAY_SECS),
        }
    }

    #[test]
    fn renders_backlog_query_around_the_sprint() {
        let config = sample_config();
        assert_eq!(
            config.backlog_query(),
            "status = 'To Do' AND Sprint = 'Board 12 - On Deck' AND Flagged is EMPTY"
        );
    }

    #[test]
    fn ticket_url_tolerates_trailing_slash() {
        let config = sample_config();
        assert_eq!(
            config.ticket_url("CF-42"),
            "https://example.atlassian.net/browse/CF-42"
        );
    }
}
