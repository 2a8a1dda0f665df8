mod config;
mod context;
mod domain;
mod error;
mod infra;
mod ledger;
mod services;
mod workflow;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::glean::GleanClient;
use crate::infra::jira::JiraClient;
use crate::ledger::CompletedTicketLedger;

#[derive(Parser)]
#[command(
    name = "sizeup",
    author,
    version,
    about = "Posts AI size estimates on unestimated sprint tickets"
)]
struct Cli {
    /// Override the sprint named by the JIRA_SPRINT environment variable.
    #[arg(short, long)]
    sprint: Option<String>,
    /// Override the completed-tickets ledger path.
    #[arg(short, long)]
    ledger: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(error) = run().await {
        error!("{error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    dotenv::dotenv().ok();
    let mut config = AppConfig::load()?;
    if let Some(sprint) = cli.sprint {
        config.jira_sprint = sprint;
    }
    if let Some(path) = cli.ledger {
        config.ledger_path = path;
    }

    let mut ledger = CompletedTicketLedger::load(&config.ledger_path)?;
    info!(completed = ledger.len(), "loaded completed-ticket ledger");

    let issue_tracker = Arc::new(JiraClient::new(&config));
    let estimator = Arc::new(GleanClient::new(&config));
    let context = AppContext::new(config, issue_tracker, estimator);

    let report = workflow::estimate::estimate_backlog(&context, &mut ledger).await?;
    info!(
        examined = report.examined,
        skipped = report.skipped,
        estimated = report.estimated,
        comments = report.comments_posted,
        "estimation run complete"
    );

    Ok(())
}
