pub mod glean;
pub mod jira;
