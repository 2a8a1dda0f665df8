use async_trait::async_trait;
use base64::prelude::{BASE64_STANDARD, Engine as _};
use reqwest::{
    Client, Response,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::AppConfig;
use crate::domain::ticket::Ticket;
use crate::error::{AppError, AppResult};
use crate::services::IssueTrackerService;

pub struct JiraClient {
    http: Client,
    base_url: String,
    email: String,
    token: String,
    estimated_field: String,
    estimated_value: String,
}

impl JiraClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.jira_base_url.clone(),
            email: config.jira_email.clone(),
            token: config.jira_token.clone(),
            estimated_field: config.estimated_field.clone(),
            estimated_value: config.estimated_value.clone(),
        }
    }

    fn auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.email, self.token);
        let encoded = BASE64_STANDARD.encode(credentials);
        format!("Basic {encoded}")
    }

    fn search_endpoint(&self) -> String {
        format!("{}/rest/api/3/search", self.base_url.trim_end_matches('/'))
    }

    fn comment_endpoint(&self, ticket_id: &str) -> String {
        format!(
            "{}/rest/api/3/issue/{}/comment",
            self.base_url.trim_end_matches('/'),
            ticket_id
        )
    }

    fn issue_endpoint(&self, ticket_key: &str) -> String {
        format!(
            "{}/rest/api/3/issue/{}",
            self.base_url.trim_end_matches('/'),
            ticket_key
        )
    }

    async fn ensure_success(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unable to read response>".to_string());
        Err(AppError::IssueTracker(format!(
            "Jira responded with {status}: {body}"
        )))
    }
}

#[async_trait]
impl IssueTrackerService for JiraClient {
    async fn search_backlog(&self, jql: &str) -> AppResult<Vec<Ticket>> {
        let response = self
            .http
            .get(self.search_endpoint())
            .query(&[("jql", jql), ("fields", "summary")])
            .header(AUTHORIZATION, self.auth_header())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call Jira: {err}")))?;

        let response = Self::ensure_success(response).await?;
        let payload: JiraSearchResponse = response.json().await.map_err(|err| {
            AppError::IssueTracker(format!("failed to parse Jira response: {err}"))
        })?;

        Ok(payload
            .issues
            .into_iter()
            .map(|issue| Ticket {
                key: issue.key,
                id: issue.id,
                summary: issue.fields.summary,
            })
            .collect())
    }

    async fn add_comment(&self, ticket_id: &str, body: &str) -> AppResult<()> {
        let request_body = JiraAddCommentRequest::new(body);

        let response = self
            .http
            .post(self.comment_endpoint(ticket_id))
            .header(AUTHORIZATION, self.auth_header())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call Jira: {err}")))?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn mark_estimated(&self, ticket_key: &str) -> AppResult<()> {
        // The field id is configuration, so the payload is assembled as a
        // dynamic map rather than a typed struct.
        let mut fields = serde_json::Map::new();
        fields.insert(
            self.estimated_field.clone(),
            json!({ "value": self.estimated_value }),
        );
        let request_body = json!({ "fields": fields });

        let response = self
            .http
            .put(self.issue_endpoint(ticket_key))
            .header(AUTHORIZATION, self.auth_header())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|err| AppError::IssueTracker(format!("failed to call Jira: {err}")))?;

        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[derive(Serialize)]
struct JiraAddCommentRequest {
    body: JiraCommentBody,
}

impl JiraAddCommentRequest {
    fn new(text: &str) -> Self {
        Self {
            body: JiraCommentBody::from_text(text),
        }
    }
}

#[derive(Serialize)]
struct JiraCommentBody {
    #[serde(rename = "type")]
    doc_type: &'static str,
    version: u8,
    content: Vec<JiraDocNode>,
}

impl JiraCommentBody {
    /// Renders plain assistant text as an Atlassian Document Format doc,
    /// one paragraph per blank-line-separated section.
    fn from_text(text: &str) -> Self {
        let cleaned = text.replace('\r', "");
        let content = cleaned
            .split("\n\n")
            .map(str::trim)
            .filter(|section| !section.is_empty())
            .map(|section| {
                let paragraph_text = section.replace('\n', " ").trim().to_string();
                JiraDocNode::paragraph(paragraph_text)
            })
            .collect();

        Self {
            doc_type: "doc",
            version: 1,
            content,
        }
    }
}

#[derive(Serialize)]
struct JiraDocNode {
    #[serde(rename = "type")]
    node_type: &'static str,
    content: Vec<JiraDocText>,
}

impl JiraDocNode {
    fn paragraph(text: String) -> Self {
        Self {
            node_type: "paragraph",
            content: vec![JiraDocText::text(text)],
        }
    }
}

#[derive(Serialize)]
struct JiraDocText {
    #[serde(rename = "type")]
    text_type: &'static str,
    text: String,
}

impl JiraDocText {
    fn text(text: String) -> Self {
        Self {
            text_type: "text",
            text,
        }
    }
}

#[derive(Deserialize)]
struct JiraSearchResponse {
    #[serde(default)]
    issues: Vec<JiraIssue>,
}

#[derive(Deserialize)]
struct JiraIssue {
    id: String,
    key: String,
    #[serde(default)]
    fields: JiraIssueFields,
}

#[derive(Default, Deserialize)]
struct JiraIssueFields {
    summary: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_body_splits_paragraphs_on_blank_lines() {
        let request =
            JiraAddCommentRequest::new("Estimate: 3 points\r\n\r\nRationale:\nsmall change");

        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["body"]["type"], "doc");
        assert_eq!(value["body"]["version"], 1);
        let content = value["body"]["content"].as_array().unwrap();
        assert_eq!(content.len(), 2);
        assert_eq!(content[0]["type"], "paragraph");
        assert_eq!(content[0]["content"][0]["type"], "text");
        assert_eq!(content[0]["content"][0]["text"], "Estimate: 3 points");
        assert_eq!(content[1]["content"][0]["text"], "Rationale: small change");
    }

    #[test]
    fn search_response_parses_issue_snapshots() {
        let payload = r#"{
            "issues": [
                {"id": "10001", "key": "CF-1", "fields": {"summary": "Fix login"}},
                {"id": "10002", "key": "CF-2", "fields": {}}
            ]
        }"#;

        let parsed: JiraSearchResponse = serde_json::from_str(payload).unwrap();

        assert_eq!(parsed.issues.len(), 2);
        assert_eq!(parsed.issues[0].key, "CF-1");
        assert_eq!(parsed.issues[0].id, "10001");
        assert_eq!(parsed.issues[0].fields.summary.as_deref(), Some("Fix login"));
        assert!(parsed.issues[1].fields.summary.is_none());
    }
}
