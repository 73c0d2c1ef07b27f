//! Unit tests for the github_client crate.

use super::*; // Import items from lib.rs
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// --- Test Constants ---
const TEST_TOKEN: &str = "test-token";
const TEST_OWNER: &str = "test-org";
const TEST_REPO: &str = "test-repo";

fn create_test_client(mock_server: &MockServer) -> GitHubClient {
    let token = SecretString::from(TEST_TOKEN.to_string());
    let base_uri = Url::parse(&mock_server.uri()).unwrap();
    let octocrab = create_token_client(&token, Some(&base_uri)).unwrap();
    GitHubClient::new(octocrab)
}

fn github_error_body(message: &str) -> serde_json::Value {
    json!({
        "message": message,
        "documentation_url": "https://docs.github.com/rest"
    })
}

#[tokio::test]
async fn test_list_workflow_runs_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/repos/{TEST_OWNER}/{TEST_REPO}/actions/runs")))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .and(header("accept", GITHUB_JSON_MEDIA_TYPE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 2,
            "workflow_runs": [
                { "id": 30433642, "name": "Build", "status": "completed" },
                { "id": 30433643, "name": "Build", "status": "queued" }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let result = client.list_workflow_runs(TEST_OWNER, TEST_REPO).await;

    if let Err(e) = &result {
        eprintln!("list_workflow_runs error: {e:?}");
    }
    let runs = result.unwrap();
    assert_eq!(runs.total_count, 2);
    let ids: Vec<u64> = runs.workflow_runs.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![30433642, 30433643]);
}

#[tokio::test]
async fn test_list_workflow_runs_without_runs_field_is_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/repos/{TEST_OWNER}/{TEST_REPO}/actions/runs")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total_count": 0 })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let runs = client
        .list_workflow_runs(TEST_OWNER, TEST_REPO)
        .await
        .expect("listing should succeed");

    assert!(runs.is_empty());
}

#[tokio::test]
async fn test_list_workflow_runs_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/repos/{TEST_OWNER}/{TEST_REPO}/actions/runs")))
        .respond_with(ResponseTemplate::new(404).set_body_json(github_error_body("Not Found")))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let result = client.list_workflow_runs(TEST_OWNER, TEST_REPO).await;

    assert!(matches!(result, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_list_workflow_runs_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/repos/{TEST_OWNER}/{TEST_REPO}/actions/runs")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "workflow_runs": [ { "name": "missing id" } ]
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let result = client.list_workflow_runs(TEST_OWNER, TEST_REPO).await;

    assert!(matches!(result, Err(Error::Deserialization(_))));
}

#[tokio::test]
async fn test_delete_workflow_run_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!(
            "/repos/{TEST_OWNER}/{TEST_REPO}/actions/runs/30433642"
        )))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let result = client
        .delete_workflow_run(TEST_OWNER, TEST_REPO, 30433642)
        .await;

    if let Err(e) = &result {
        eprintln!("delete_workflow_run error: {e:?}");
    }
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_delete_workflow_run_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/repos/{TEST_OWNER}/{TEST_REPO}/actions/runs/7")))
        .respond_with(ResponseTemplate::new(404).set_body_json(github_error_body("Not Found")))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let result = client.delete_workflow_run(TEST_OWNER, TEST_REPO, 7).await;

    assert!(matches!(result, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_delete_workflow_run_rejected() {
    let mock_server = MockServer::start().await;

    // GitHub refuses to delete runs that are still in progress.
    Mock::given(method("DELETE"))
        .and(path(format!("/repos/{TEST_OWNER}/{TEST_REPO}/actions/runs/8")))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(github_error_body("Cannot delete")),
        )
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let result = client.delete_workflow_run(TEST_OWNER, TEST_REPO, 8).await;

    assert!(matches!(result, Err(Error::UnexpectedStatus(403))));
}

#[tokio::test]
async fn test_list_org_repositories_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/orgs/{TEST_OWNER}/repos")))
        .and(header("authorization", format!("Bearer {TEST_TOKEN}").as_str()))
        .and(header("accept", GITHUB_JSON_MEDIA_TYPE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "migrations-issue-ops", "full_name": "test-org/migrations-issue-ops" },
            { "id": 2, "name": "imported-a", "full_name": "test-org/imported-a" }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let repos = client
        .list_org_repositories(TEST_OWNER)
        .await
        .expect("listing should succeed");

    let names: Vec<&str> = repos.iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["migrations-issue-ops", "imported-a"]);
}

#[tokio::test]
async fn test_list_org_repositories_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/orgs/{TEST_OWNER}/repos")))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(github_error_body("Bad credentials")),
        )
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let result = client.list_org_repositories(TEST_OWNER).await;

    assert!(matches!(result, Err(Error::InvalidResponse)));
}

#[tokio::test]
async fn test_delete_repository_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/repos/{TEST_OWNER}/imported-a")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let result = client.delete_repository(TEST_OWNER, "imported-a").await;

    if let Err(e) = &result {
        eprintln!("delete_repository error: {e:?}");
    }
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_delete_repository_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/repos/{TEST_OWNER}/gone")))
        .respond_with(ResponseTemplate::new(404).set_body_json(github_error_body("Not Found")))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    let result = client.delete_repository(TEST_OWNER, "gone").await;

    assert!(matches!(result, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_create_token_client_default_base_uri() {
    let token = SecretString::from(TEST_TOKEN.to_string());

    let result = create_token_client(&token, None);

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_requests_send_github_json_accept_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/orgs/{TEST_OWNER}/repos")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/repos/{TEST_OWNER}/{TEST_REPO}/actions/runs/9")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);

    client.list_org_repositories(TEST_OWNER).await.unwrap();
    client
        .delete_workflow_run(TEST_OWNER, TEST_REPO, 9)
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    for request in requests {
        let accept = request
            .headers
            .get("accept")
            .and_then(|v| v.to_str().ok());
        assert_eq!(
            accept,
            Some(GITHUB_JSON_MEDIA_TYPE),
            "{} {}",
            request.method,
            request.url
        );
    }
}
