use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{EstimationService, IssueTrackerService};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub issue_tracker: Arc<dyn IssueTrackerService>,
    pub estimator: Arc<dyn EstimationService>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        issue_tracker: Arc<dyn IssueTrackerService>,
        estimator: Arc<dyn EstimationService>,
    ) -> Self {
        Self {
            config,
            issue_tracker,
            estimator,
        }
    }
}
