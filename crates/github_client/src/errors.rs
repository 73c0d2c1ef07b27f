//! Error types for GitHub client operations.
//!
//! This module defines the error types that can occur when listing and deleting
//! workflow runs and repositories through the github_client crate.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during GitHub client operations.
///
/// Every failed GitHub call is logged with its details at the point of failure,
/// so the variants here only carry enough context for the caller to decide what
/// to report.
///
/// ## Examples
///
/// ```rust,ignore
/// use github_client::Error;
///
/// match client.delete_repository("my-org", "old-repo").await {
///     Ok(()) => println!("Deleted"),
///     Err(Error::NotFound) => eprintln!("Repository is already gone"),
///     Err(err) => eprintln!("Other error: {}", err),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The GitHub client could not be initialized.
    ///
    /// This error occurs when the token cannot be attached to the client or the
    /// configured API base URL is not a valid URI.
    #[error("Failed to authenticate or initialize GitHub client: {0}")]
    AuthError(String),

    /// Error deserializing the response from GitHub.
    ///
    /// This error occurs when the GitHub API returns a body that cannot be
    /// parsed into the expected listing structure.
    #[error("Failed to deserialize GitHub response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The GitHub API call failed.
    ///
    /// Covers transport failures and error bodies returned by GitHub, such as
    /// a rejected token or missing permissions.
    #[error("GitHub API request failed")]
    InvalidResponse,

    /// The requested resource was not found.
    ///
    /// This error occurs when a GitHub API request returns a 404 status code,
    /// indicating that the organization, repository or workflow run does not
    /// exist or is not accessible with the current token.
    #[error("Resource not found")]
    NotFound,

    /// A delete request returned a status outside the success range.
    #[error("GitHub returned unexpected status code {0}")]
    UnexpectedStatus(u16),
}
