pub mod estimator;
pub mod issue_tracker;

pub use estimator::EstimationService;
pub use issue_tracker::IssueTrackerService;
