//! # Models
//!
//! The slices of GitHub API responses the cleanup tooling reads. Only the
//! identifying fields are modelled; everything else in a response body is
//! ignored during deserialization.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// A single execution record of a GitHub Actions workflow.
///
/// # Examples
///
/// ```rust
/// use github_client::models::WorkflowRun;
///
/// let run: WorkflowRun = serde_json::from_str(r#"{"id": 42, "name": "CI"}"#).unwrap();
/// assert_eq!(run.id, 42);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WorkflowRun {
    /// The unique ID of the run
    pub id: u64,
    /// The workflow name, when GitHub reports one
    #[serde(default)]
    pub name: Option<String>,
}

/// One page of workflow runs as returned by
/// `GET /repos/{owner}/{repo}/actions/runs`.
///
/// A body without a `workflow_runs` field is read as an empty listing.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WorkflowRunList {
    /// Total number of runs GitHub reports for the repository
    #[serde(default)]
    pub total_count: u64,
    /// The runs on this page
    #[serde(default)]
    pub workflow_runs: Vec<WorkflowRun>,
}

impl WorkflowRunList {
    /// Returns `true` when the page holds no runs.
    pub fn is_empty(&self) -> bool {
        self.workflow_runs.is_empty()
    }
}

/// Represents a GitHub repository in an organization listing.
///
/// # Examples
///
/// ```rust
/// use github_client::models::Repository;
///
/// let repo = Repository::new("my-repo");
/// assert_eq!(repo.name(), "my-repo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Repository {
    /// The name of the repository
    name: String,
}

impl Repository {
    /// Creates a new Repository instance.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the name of the repository (without owner).
    pub fn name(&self) -> &str {
        &self.name
    }
}
