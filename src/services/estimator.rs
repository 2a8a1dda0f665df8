use async_trait::async_trait;

use crate::domain::estimate::Estimate;
use crate::error::AppResult;

#[async_trait]
pub trait EstimationService: Send + Sync {
    /// Asks the assistant to size the ticket behind `ticket_url`, blocking
    /// until the run finishes.
    async fn estimate_ticket(&self, ticket_url: &str) -> AppResult<Estimate>;
}
