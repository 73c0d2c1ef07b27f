//! Issue-ops cleanup utilities.
//!
//! This crate clears out a migration test organization: it deletes the workflow
//! run history of the issue-ops repository and then deletes every other
//! repository in the organization. It can be used programmatically or through
//! the `issue-ops-cleanup` binary.

use anyhow::{Context, Result};
use github_client::{models, RepositoryClient, WorkflowRunClient};
use tracing::{debug, info, warn};

pub mod config;
pub use config::{CleanupConfig, CleanupTarget};

/// Which sweeps a cleanup run performs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sweep {
    /// Workflow runs first, then repositories.
    #[default]
    All,
    /// Only delete workflow runs.
    WorkflowRuns,
    /// Only delete repositories.
    Repositories,
}

/// What a cleanup run deleted, in deletion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupSummary {
    pub deleted_runs: Vec<u64>,
    pub deleted_repositories: Vec<String>,
}

/// Deletes workflow runs and organization repositories.
///
/// Both sweeps poll: they list, delete everything the listing returned, and
/// list again until there is nothing left to delete. Requests are issued one
/// at a time and the first failure ends the sweep.
pub struct CleanupRunner<C> {
    client: C,
    target: CleanupTarget,
}

impl<C> CleanupRunner<C>
where
    C: WorkflowRunClient + RepositoryClient,
{
    /// Create a new cleanup runner.
    ///
    /// # Arguments
    ///
    /// * `client` - Authenticated GitHub client
    /// * `target` - Organization, run repository and exempt repository
    pub fn new(client: C, target: CleanupTarget) -> Self {
        Self { client, target }
    }

    #[cfg(test)]
    pub(crate) fn client(&self) -> &C {
        &self.client
    }

    /// Run the selected sweeps, workflow runs before repositories.
    pub async fn run(&self, sweep: Sweep) -> Result<CleanupSummary> {
        let mut summary = CleanupSummary::default();

        if matches!(sweep, Sweep::All | Sweep::WorkflowRuns) {
            summary.deleted_runs = self.delete_workflow_runs().await?;
        }

        if matches!(sweep, Sweep::All | Sweep::Repositories) {
            summary.deleted_repositories = self.delete_repositories().await?;
        }

        info!(
            org = self.target.organization,
            deleted_runs = summary.deleted_runs.len(),
            deleted_repositories = summary.deleted_repositories.len(),
            "Cleanup completed"
        );

        Ok(summary)
    }

    /// Delete every workflow run of the target repository.
    ///
    /// Each listing is deleted in full before the runs are listed again. The
    /// sweep ends when a listing comes back empty.
    pub async fn delete_workflow_runs(&self) -> Result<Vec<u64>> {
        let org = &self.target.organization;
        let repo = &self.target.repository;

        info!(org = org, repo = repo, "Deleting workflow runs");

        let mut deleted = Vec::new();
        let mut pass = 1u32;
        let mut runs = self.list_workflow_runs().await?;

        while !runs.is_empty() {
            debug!(
                org = org,
                repo = repo,
                pass = pass,
                count = runs.workflow_runs.len(),
                remaining = runs.total_count,
                "Deleting page of workflow runs"
            );

            for run in &runs.workflow_runs {
                self.client
                    .delete_workflow_run(org, repo, run.id)
                    .await
                    .with_context(|| {
                        format!("Failed to delete workflow run {} in {}/{}", run.id, org, repo)
                    })?;

                println!("Deleted run: {}", run.id);
                deleted.push(run.id);
            }

            runs = self.list_workflow_runs().await?;
            pass += 1;
        }

        info!(
            org = org,
            repo = repo,
            deleted_count = deleted.len(),
            "No workflow runs left"
        );

        Ok(deleted)
    }

    /// Delete every repository in the organization except the exempt one.
    ///
    /// The sweep ends once a listing holds at most one repository. It assumes
    /// the exempt repository is part of every listing; a listing without it is
    /// reported but otherwise handled the same way.
    pub async fn delete_repositories(&self) -> Result<Vec<String>> {
        let org = &self.target.organization;
        let exempt = &self.target.exempt_repository;

        info!(org = org, exempt = exempt, "Deleting repositories");

        let mut deleted = Vec::new();
        let mut repos = self.list_repositories().await?;

        while repos.len() > 1 {
            if !repos.iter().any(|r| r.name() == exempt) {
                warn!(
                    org = org,
                    exempt = exempt,
                    count = repos.len(),
                    "Exempt repository missing from organization listing"
                );
            }

            for repo in repos.iter().filter(|r| r.name() != exempt) {
                let name = repo.name();
                self.client
                    .delete_repository(org, name)
                    .await
                    .with_context(|| format!("Failed to delete repository {}/{}", org, name))?;

                println!("Deleted repo: {}", name);
                deleted.push(name.to_string());
            }

            repos = self.list_repositories().await?;
        }

        info!(
            org = org,
            remaining = repos.len(),
            deleted_count = deleted.len(),
            "Repository sweep finished"
        );

        Ok(deleted)
    }

    async fn list_workflow_runs(&self) -> Result<models::WorkflowRunList> {
        self.client
            .list_workflow_runs(&self.target.organization, &self.target.repository)
            .await
            .with_context(|| {
                format!(
                    "Failed to list workflow runs for {}/{}",
                    self.target.organization, self.target.repository
                )
            })
    }

    async fn list_repositories(&self) -> Result<Vec<models::Repository>> {
        self.client
            .list_org_repositories(&self.target.organization)
            .await
            .with_context(|| {
                format!(
                    "Failed to list repositories for organization {}",
                    self.target.organization
                )
            })
    }
}

/// Initialize logging for cleanup operations.
///
/// Logs go to stderr so stdout only carries the deletion lines.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
