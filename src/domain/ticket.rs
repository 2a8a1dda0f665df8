/// Read-only snapshot of a tracker work item, fetched once per run.
#[derive(Debug, Clone)]
pub struct Ticket {
    /// Human-facing key, e.g. `CF-123`. Ledger entries and the estimated
    /// flag use this.
    pub key: String,
    /// Tracker-internal id; the comment endpoint wants this, not the key.
    pub id: String,
    pub summary: Option<String>,
}
