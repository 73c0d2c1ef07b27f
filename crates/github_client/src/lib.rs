//! Crate for interacting with the GitHub REST API.
//!
//! This crate provides a client for making token-authenticated requests to
//! GitHub, covering the calls needed to clear workflow run history and
//! organization repositories.

use async_trait::async_trait;
use http::StatusCode;
use octocrab::{Octocrab, Result as OctocrabResult};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, info, instrument};
use url::Url;

pub mod errors;
pub use errors::Error;

pub mod models;

/// Media type sent in the `Accept` header of every request.
pub const GITHUB_JSON_MEDIA_TYPE: &str = "application/vnd.github+json";

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// A client for interacting with the GitHub API, authenticated with a token.
#[derive(Debug)]
pub struct GitHubClient {
    client: Octocrab,
}

impl GitHubClient {
    /// Creates a new `GitHubClient` from an already authenticated `Octocrab` instance.
    ///
    /// Use [`create_token_client`] to build the `Octocrab` instance from a token.
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WorkflowRunClient for GitHubClient {
    /// Lists the current page of workflow runs for a repository.
    ///
    /// # Arguments
    ///
    /// * `owner` - The owner of the repository (user or organization name).
    /// * `repo` - The name of the repository.
    ///
    /// # Errors
    /// Returns `Error::NotFound` for a 404, `Error::InvalidResponse` for other API
    /// failures, or `Error::Deserialization` if the body cannot be parsed.
    #[instrument(skip(self), fields(owner = %owner, repo = %repo))]
    async fn list_workflow_runs(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<models::WorkflowRunList, Error> {
        let path = format!("/repos/{}/{}/actions/runs", owner, repo);

        debug!("Making API call to: {}", path);
        let response: OctocrabResult<serde_json::Value> = self.client.get(path, None::<&()>).await;

        match response {
            Ok(body) => {
                let runs: models::WorkflowRunList = serde_json::from_value(body)?;
                debug!(
                    owner = owner,
                    repo = repo,
                    count = runs.workflow_runs.len(),
                    total_count = runs.total_count,
                    "Retrieved workflow runs"
                );
                Ok(runs)
            }
            Err(e) => Err(map_octocrab_error("Failed to list workflow runs", e)),
        }
    }

    /// Deletes a single workflow run by ID.
    ///
    /// # Errors
    /// Returns `Error::NotFound` if the run does not exist, or
    /// `Error::UnexpectedStatus` if GitHub answers with any other non-success status.
    #[instrument(skip(self), fields(owner = %owner, repo = %repo, run_id = run_id))]
    async fn delete_workflow_run(&self, owner: &str, repo: &str, run_id: u64) -> Result<(), Error> {
        let path = format!("/repos/{}/{}/actions/runs/{}", owner, repo, run_id);

        debug!("Making API call to: {}", path);
        let response = self
            .client
            ._delete(path, None::<&()>)
            .await
            .map_err(|e| map_octocrab_error("Failed to delete workflow run", e))?;

        match response.status() {
            status if status.is_success() => {
                info!(
                    owner = owner,
                    repo = repo,
                    run_id = run_id,
                    "Deleted workflow run"
                );
                Ok(())
            }
            StatusCode::NOT_FOUND => {
                error!(
                    owner = owner,
                    repo = repo,
                    run_id = run_id,
                    "Workflow run not found"
                );
                Err(Error::NotFound)
            }
            status => {
                error!(
                    owner = owner,
                    repo = repo,
                    run_id = run_id,
                    status = status.as_u16(),
                    "Failed to delete workflow run"
                );
                Err(Error::UnexpectedStatus(status.as_u16()))
            }
        }
    }
}

#[async_trait]
impl RepositoryClient for GitHubClient {
    /// Lists the current page of repositories for an organization.
    ///
    /// # Arguments
    ///
    /// * `org_name` - The name of the organization.
    ///
    /// # Errors
    /// Returns `Error::NotFound` for an unknown organization, `Error::InvalidResponse`
    /// for other API failures, or `Error::Deserialization` if the body cannot be parsed.
    #[instrument(skip(self), fields(org_name = %org_name))]
    async fn list_org_repositories(
        &self,
        org_name: &str,
    ) -> Result<Vec<models::Repository>, Error> {
        let path = format!("/orgs/{}/repos", org_name);

        debug!("Making API call to: {}", path);
        let response: OctocrabResult<serde_json::Value> = self.client.get(path, None::<&()>).await;

        match response {
            Ok(body) => {
                let repos: Vec<models::Repository> = serde_json::from_value(body)?;
                debug!(
                    org_name = org_name,
                    count = repos.len(),
                    "Retrieved organization repositories"
                );
                Ok(repos)
            }
            Err(e) => Err(map_octocrab_error(
                "Failed to list organization repositories",
                e,
            )),
        }
    }

    /// Deletes a repository.
    ///
    /// # Errors
    /// Returns `Error::NotFound` if the repository does not exist, or
    /// `Error::InvalidResponse` if GitHub rejects the deletion.
    #[instrument(skip(self), fields(owner = %owner, repo = %repo))]
    async fn delete_repository(&self, owner: &str, repo: &str) -> Result<(), Error> {
        match self.client.repos(owner, repo).delete().await {
            Ok(()) => {
                info!(owner = owner, repo = repo, "Deleted repository");
                Ok(())
            }
            Err(e) => Err(map_octocrab_error("Failed to delete repository", e)),
        }
    }
}

/// Trait for workflow run operations.
#[async_trait]
pub trait WorkflowRunClient: Send + Sync {
    /// Lists the current page of workflow runs for a repository.
    ///
    /// Only the first page GitHub returns is fetched; callers re-list after
    /// deleting to make progress through the history.
    async fn list_workflow_runs(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<models::WorkflowRunList, Error>;

    /// Deletes a single workflow run by ID.
    async fn delete_workflow_run(&self, owner: &str, repo: &str, run_id: u64) -> Result<(), Error>;
}

/// Trait for organization repository operations.
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    /// Lists the current page of repositories for an organization.
    async fn list_org_repositories(&self, org_name: &str)
        -> Result<Vec<models::Repository>, Error>;

    /// Deletes a repository. This cannot be undone.
    async fn delete_repository(&self, owner: &str, repo: &str) -> Result<(), Error>;
}

/// Creates an `Octocrab` client that authenticates every request with the
/// given token as a bearer token and asks for `application/vnd.github+json`.
///
/// # Arguments
///
/// * `token` - A personal access token or installation token.
/// * `base_uri` - Optional API root, for GitHub Enterprise Server or tests.
///   Defaults to `https://api.github.com`.
///
/// # Errors
///
/// Returns an `Error::AuthError` if the base URI is invalid or the client
/// cannot be built.
///
/// # Example
///
/// ```rust,no_run
/// use github_client::{create_token_client, Error, GitHubClient};
/// use secrecy::SecretString;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Error> {
///     let token = SecretString::from("ghp_example".to_string());
///     let octocrab = create_token_client(&token, None)?;
///     let client = GitHubClient::new(octocrab);
///
///     // Use `client` to perform API operations
///     Ok(())
/// }
/// ```
#[instrument(skip(token))]
pub fn create_token_client(token: &SecretString, base_uri: Option<&Url>) -> Result<Octocrab, Error> {
    let mut builder = Octocrab::builder()
        .personal_token(token.expose_secret().to_string())
        .add_header(http::header::ACCEPT, GITHUB_JSON_MEDIA_TYPE.to_string());

    if let Some(uri) = base_uri {
        let uri = uri.as_str().trim_end_matches('/');
        info!(base_uri = uri, "Using custom GitHub API base URI");
        builder = builder.base_uri(uri).map_err(|e| {
            error!(base_uri = uri, error = %e, "Invalid GitHub API base URI");
            Error::AuthError(format!("Invalid GitHub API base URI '{}': {}", uri, e))
        })?;
    }

    builder.build().map_err(|e| {
        error!(error = ?e, "Failed to build Octocrab client with token credentials");
        Error::AuthError("Failed to build a GitHub client for the token.".to_string())
    })
}

fn map_octocrab_error(message: &str, e: octocrab::Error) -> Error {
    let not_found = matches!(
        &e,
        octocrab::Error::GitHub { source, .. } if source.status_code == StatusCode::NOT_FOUND
    );

    log_octocrab_error(message, e);

    if not_found {
        Error::NotFound
    } else {
        Error::InvalidResponse
    }
}

fn log_octocrab_error(message: &str, e: octocrab::Error) {
    match e {
        octocrab::Error::GitHub { source, backtrace } => error!(
            error_message = source.message,
            status = source.status_code.as_u16(),
            backtrace = backtrace.to_string(),
            "{}. Received an error from GitHub",
            message
        ),
        octocrab::Error::Serde { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. Failed to parse the response body.",
            message
        ),
        octocrab::Error::Uri { source, backtrace } => error!(
            error_message = source.to_string(),
            backtrace = backtrace.to_string(),
            "{}. Failed to parse URI.",
            message
        ),
        _ => error!(error_message = e.to_string(), message),
    };
}
