//! Cleanup configuration.
//!
//! Values are read from the environment first and can then be overridden by
//! command line flags. The token is only ever held as a [`SecretString`].

use anyhow::{Context, Result};
use secrecy::SecretString;
use std::env;
use url::Url;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Organization cleaned when `CLEANUP_ORG` is not set.
pub const DEFAULT_ORGANIZATION: &str = "bitbucket-migration";

/// Repository whose workflow runs are cleared when `CLEANUP_REPO` is not set.
pub const DEFAULT_REPOSITORY: &str = "migrations-issue-ops";

/// Configuration for cleanup operations loaded from environment variables.
#[derive(Debug)]
pub struct CleanupConfig {
    /// Token sent as `Authorization: Bearer <token>`
    pub token: SecretString,
    /// Organization that owns the repositories
    pub organization: String,
    /// Repository whose workflow run history is deleted
    pub repository: String,
    /// Repository kept during the repository sweep. Falls back to `repository`.
    pub exempt_repository: Option<String>,
    /// API root for GitHub Enterprise Server, `None` for github.com
    pub api_url: Option<Url>,
}

impl CleanupConfig {
    /// Load cleanup configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `GITHUB_TOKEN`: token with `repo`, `delete_repo` and `workflow` scopes
    ///
    /// Optional environment variables:
    /// - `CLEANUP_ORG`: organization name (default `bitbucket-migration`)
    /// - `CLEANUP_REPO`: repository to clear runs for (default `migrations-issue-ops`)
    /// - `CLEANUP_EXEMPT_REPO`: repository to keep (default: the value of `CLEANUP_REPO`)
    /// - `GITHUB_API_URL`: API root URL
    pub fn from_env() -> Result<Self> {
        let token =
            env::var("GITHUB_TOKEN").context("GITHUB_TOKEN environment variable not set")?;
        if token.trim().is_empty() {
            anyhow::bail!("GITHUB_TOKEN environment variable is empty");
        }

        let organization =
            non_empty_var("CLEANUP_ORG").unwrap_or_else(|| DEFAULT_ORGANIZATION.to_string());
        let repository =
            non_empty_var("CLEANUP_REPO").unwrap_or_else(|| DEFAULT_REPOSITORY.to_string());
        let exempt_repository = non_empty_var("CLEANUP_EXEMPT_REPO");

        let api_url = non_empty_var("GITHUB_API_URL")
            .map(|raw| {
                Url::parse(&raw)
                    .with_context(|| format!("GITHUB_API_URL '{}' is not a valid URL", raw))
            })
            .transpose()?;

        Ok(Self {
            token: SecretString::from(token),
            organization,
            repository,
            exempt_repository,
            api_url,
        })
    }

    /// Apply command line overrides on top of the environment values.
    pub fn with_overrides(
        mut self,
        organization: Option<String>,
        repository: Option<String>,
        exempt_repository: Option<String>,
    ) -> Self {
        if let Some(organization) = organization {
            self.organization = organization;
        }
        if let Some(repository) = repository {
            self.repository = repository;
        }
        if exempt_repository.is_some() {
            self.exempt_repository = exempt_repository;
        }
        self
    }

    /// The repository that is never deleted.
    pub fn exempt_repository(&self) -> &str {
        self.exempt_repository.as_deref().unwrap_or(&self.repository)
    }

    /// The resources the runner operates on, without the credentials.
    pub fn target(&self) -> CleanupTarget {
        CleanupTarget {
            organization: self.organization.clone(),
            repository: self.repository.clone(),
            exempt_repository: self.exempt_repository().to_string(),
        }
    }
}

/// The organization and repositories a [`crate::CleanupRunner`] works against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupTarget {
    pub organization: String,
    pub repository: String,
    pub exempt_repository: String,
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
