use async_trait::async_trait;

use crate::domain::ticket::Ticket;
use crate::error::AppResult;

#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    /// Runs one search and returns the matching tickets in tracker order.
    async fn search_backlog(&self, jql: &str) -> AppResult<Vec<Ticket>>;

    /// Posts a single comment on the ticket with the given internal id.
    async fn add_comment(&self, ticket_id: &str, body: &str) -> AppResult<()>;

    /// Sets the custom field that marks the ticket as AI-estimated.
    async fn mark_estimated(&self, ticket_key: &str) -> AppResult<()>;
}
