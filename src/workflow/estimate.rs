use tokio::time::sleep;
use tracing::{info, warn};

use crate::context::AppContext;
use crate::error::AppResult;
use crate::ledger::CompletedTicketLedger;

#[derive(Debug, Default)]
pub struct EstimateRunReport {
    pub examined: usize,
    pub skipped: usize,
    pub estimated: usize,
    pub comments_posted: usize,
}

/// Walks the eligible backlog once: every ticket not yet in the ledger gets
/// an agent estimate posted as comments, the estimated flag set, and its key
/// recorded. Search and estimation failures abort the run; everything after
/// a successful estimate is logged and skipped past, so one bad Jira write
/// never strands the rest of the batch.
pub async fn estimate_backlog(
    ctx: &AppContext,
    ledger: &mut CompletedTicketLedger,
) -> AppResult<EstimateRunReport> {
    let jql = ctx.config.backlog_query();
    let tickets = ctx.issue_tracker.search_backlog(&jql).await?;
    info!(count = tickets.len(), "fetched eligible tickets");

    let mut report = EstimateRunReport {
        examined: tickets.len(),
        ..Default::default()
    };

    for ticket in &tickets {
        if ledger.contains(&ticket.key) {
            info!(key = %ticket.key, "skipping already-estimated ticket");
            report.skipped += 1;
            continue;
        }

        let url = ctx.config.ticket_url(&ticket.key);
        info!(
            key = %ticket.key,
            url = %url,
            summary = ticket.summary.as_deref().unwrap_or(""),
            "estimating ticket"
        );

        // Spacing between agent runs; the estimation service rate-limits
        // agent usage.
        sleep(ctx.config.estimate_delay).await;

        let estimate = ctx.estimator.estimate_ticket(&url).await?;

        for comment in &estimate.comments {
            match ctx.issue_tracker.add_comment(&ticket.id, comment).await {
                Ok(()) => report.comments_posted += 1,
                Err(err) => warn!(key = %ticket.key, "failed to post comment: {err}"),
            }
        }

        if let Err(err) = ctx.issue_tracker.mark_estimated(&ticket.key).await {
            warn!(key = %ticket.key, "failed to mark ticket as estimated: {err}");
        }

        if let Err(err) = ledger.record(&ticket.key) {
            // Not recorded means the next run estimates this ticket again.
            warn!(key = %ticket.key, "failed to record completed ticket: {err}");
        }

        report.estimated += 1;
    }

    Ok(report)
}
