//! Clear workflow run history and repositories from the issue-ops organization.
//!
//! Deletes every workflow run of the issue-ops repository, then deletes every
//! repository in the organization except the exempt one. Both operations are
//! irreversible.
//!
//! Usage:
//!   issue-ops-cleanup [--org <ORG>] [--repo <REPO>] [--exempt <NAME>] [all|workflow-runs|repositories]
//!
//! Environment variables:
//! - GITHUB_TOKEN: token used as the bearer credential (required)
//! - CLEANUP_ORG, CLEANUP_REPO, CLEANUP_EXEMPT_REPO: defaults for the flags
//! - GITHUB_API_URL: API root for GitHub Enterprise Server
//! - RUST_LOG: log filter, logs are written to stderr

use anyhow::Context;
use clap::{Parser, Subcommand};
use issue_ops_cleanup::{CleanupConfig, CleanupRunner, Sweep};

/// Delete workflow runs and organization repositories left behind by migration runs
#[derive(Parser)]
#[command(name = "issue-ops-cleanup")]
#[command(about = "Delete workflow runs and organization repositories", long_about = None)]
struct Cli {
    /// Organization to clean (overrides CLEANUP_ORG)
    #[arg(long)]
    org: Option<String>,

    /// Repository whose workflow runs are deleted (overrides CLEANUP_REPO)
    #[arg(long)]
    repo: Option<String>,

    /// Repository that is never deleted (overrides CLEANUP_EXEMPT_REPO)
    #[arg(long)]
    exempt: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Delete workflow runs, then repositories (default)
    All,

    /// Only delete the workflow runs of the target repository
    WorkflowRuns,

    /// Only delete the organization's repositories
    Repositories,
}

impl From<Commands> for Sweep {
    fn from(command: Commands) -> Self {
        match command {
            Commands::All => Sweep::All,
            Commands::WorkflowRuns => Sweep::WorkflowRuns,
            Commands::Repositories => Sweep::Repositories,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    issue_ops_cleanup::init_logging();

    let cli = Cli::parse();

    // Load configuration from environment, then apply flags
    let config = CleanupConfig::from_env()?.with_overrides(cli.org, cli.repo, cli.exempt);
    let sweep = cli.command.map(Sweep::from).unwrap_or_default();

    let octocrab = github_client::create_token_client(&config.token, config.api_url.as_ref())
        .context("Failed to create GitHub client")?;
    let client = github_client::GitHubClient::new(octocrab);

    let target = config.target();
    eprintln!(
        "Cleaning {} (runs: {}, keeping: {})",
        target.organization, target.repository, target.exempt_repository
    );

    let runner = CleanupRunner::new(client, target);
    let summary = runner.run(sweep).await?;

    eprintln!(
        "Deleted {} workflow runs and {} repositories",
        summary.deleted_runs.len(),
        summary.deleted_repositories.len()
    );

    Ok(())
}
