use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::domain::estimate::Estimate;
use crate::error::{AppError, AppResult};
use crate::services::EstimationService;

/// Role tag Glean puts on the agent's own messages in a run transcript.
const ASSISTANT_ROLE: &str = "GLEAN_AI";

/// Agent runs are slow; the synchronous wait endpoint can take minutes.
const RUN_TIMEOUT: Duration = Duration::from_secs(900);

pub struct GleanClient {
    http: Client,
    instance: String,
    agent_id: String,
    token: String,
}

impl GleanClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: Client::new(),
            instance: config.glean_instance.clone(),
            agent_id: config.glean_agent_id.clone(),
            token: config.glean_token.clone(),
        }
    }

    fn run_endpoint(&self) -> String {
        format!(
            "https://{}-be.glean.com/rest/api/v1/agents/runs/wait",
            self.instance
        )
    }
}

#[async_trait]
impl EstimationService for GleanClient {
    async fn estimate_ticket(&self, ticket_url: &str) -> AppResult<Estimate> {
        let request_body = AgentRunRequest {
            agent_id: &self.agent_id,
            input: AgentRunInput { ticket: ticket_url },
        };

        let response = self
            .http
            .post(self.run_endpoint())
            .timeout(RUN_TIMEOUT)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|err| AppError::Estimation(format!("failed to call Glean: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::Estimation(format!(
                "Glean responded with {status}: {body}"
            )));
        }

        let payload: AgentRunResponse = response.json().await.map_err(|err| {
            AppError::Estimation(format!("failed to parse Glean response: {err}"))
        })?;

        extract_estimate(payload)
    }
}

/// Pulls the comment texts out of a finished run. The first assistant-role
/// message must exist and carry at least one non-blank text fragment;
/// anything less means the agent produced nothing worth posting.
fn extract_estimate(response: AgentRunResponse) -> AppResult<Estimate> {
    let message = response
        .messages
        .into_iter()
        .find(|message| message.role.as_deref() == Some(ASSISTANT_ROLE))
        .ok_or_else(|| {
            AppError::Estimation("agent run returned no assistant message".to_string())
        })?;

    if message.content.is_empty() {
        return Err(AppError::Estimation(
            "assistant message has no content".to_string(),
        ));
    }

    let comments: Vec<String> = message
        .content
        .into_iter()
        .filter(|fragment| fragment.kind.as_deref() == Some("text"))
        .filter_map(|fragment| fragment.text)
        .filter(|text| !text.trim().is_empty())
        .collect();

    if comments.is_empty() {
        return Err(AppError::Estimation(
            "assistant message contained no text".to_string(),
        ));
    }

    Ok(Estimate { comments })
}

#[derive(Serialize)]
struct AgentRunRequest<'a> {
    agent_id: &'a str,
    input: AgentRunInput<'a>,
}

#[derive(Serialize)]
struct AgentRunInput<'a> {
    #[serde(rename = "Ticket")]
    ticket: &'a str,
}

#[derive(Deserialize)]
struct AgentRunResponse {
    #[serde(default)]
    messages: Vec<AgentMessage>,
}

#[derive(Deserialize)]
struct AgentMessage {
    role: Option<String>,
    #[serde(default)]
    content: Vec<MessageFragment>,
}

#[derive(Deserialize)]
struct MessageFragment {
    #[serde(rename = "type")]
    kind: Option<String>,
    text: Option<String>,
}
