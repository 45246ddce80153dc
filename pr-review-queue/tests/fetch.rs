use octocrab::Octocrab;
use pr_review_queue::{
    discover_repositories, fetch_open_pull_requests, install_crypto_provider, CiStatus, FetchError,
    FetchOptions, Verdict,
};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ORG: &str = "osbuild";
const REPO: &str = "osbuild-composer";

async fn unauthorized_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Bad credentials",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&server)
        .await;
    server
}

fn client(server: &MockServer) -> Octocrab {
    install_crypto_provider();
    Octocrab::builder()
        .personal_token("test-token".to_string())
        .base_uri(server.uri())
        .unwrap()
        .build()
        .unwrap()
}

fn user(login: &str) -> Value {
    let api = format!("https://api.github.com/users/{login}");
    json!({
        "login": login,
        "id": login.len() as u64 * 1000 + 7,
        "node_id": format!("U_{login}"),
        "avatar_url": "https://avatars.githubusercontent.com/u/7?v=4",
        "gravatar_id": "",
        "url": api,
        "html_url": format!("https://github.com/{login}"),
        "followers_url": format!("{api}/followers"),
        "following_url": format!("{api}/following"),
        "gists_url": format!("{api}/gists"),
        "starred_url": format!("{api}/starred"),
        "subscriptions_url": format!("{api}/subscriptions"),
        "organizations_url": format!("{api}/orgs"),
        "repos_url": format!("{api}/repos"),
        "events_url": format!("{api}/events"),
        "received_events_url": format!("{api}/received_events"),
        "type": "User",
        "site_admin": false
    })
}

/// A pull request as returned by the listing endpoint.
fn pull(repo: &str, number: u64, sha: &str, requested: &[&str], draft: bool) -> Value {
    json!({
        "url": format!("https://api.github.com/repos/{ORG}/{repo}/pulls/{number}"),
        "id": 90_000 + number,
        "number": number,
        "title": format!("Change {number}"),
        "html_url": format!("https://github.com/{ORG}/{repo}/pull/{number}"),
        "user": user("octocat"),
        "created_at": "2024-06-01T09:00:00Z",
        "updated_at": "2024-06-20T09:00:00Z",
        "draft": draft,
        "requested_reviewers": requested.iter().map(|login| user(login)).collect::<Vec<_>>(),
        "labels": [{
            "id": 11,
            "node_id": "LA_11",
            "url": format!("https://api.github.com/repos/{ORG}/{repo}/labels/enhancement"),
            "name": "enhancement",
            "color": "a2eeef",
            "default": true
        }],
        "head": { "ref": format!("change-{number}"), "sha": sha },
        "base": { "ref": "main", "sha": "0000000" }
    })
}

/// The single pull request endpoint adds the diff size and mergeability.
fn detail(mut pull: Value, additions: u64, deletions: u64, mergeable_state: &str) -> Value {
    pull["additions"] = json!(additions);
    pull["deletions"] = json!(deletions);
    pull["mergeable_state"] = json!(mergeable_state);
    pull
}

fn review(id: u64, login: &str, state: &str) -> Value {
    let submitted_at = (state != "PENDING").then_some("2024-06-10T09:00:00Z");
    json!({
        "id": id,
        "node_id": format!("PRR_{id}"),
        "html_url": format!("https://github.com/{ORG}/{REPO}/pull/1#pullrequestreview-{id}"),
        "user": user(login),
        "body": "",
        "state": state,
        "commit_id": "abc1234",
        "submitted_at": submitted_at
    })
}

fn repository(id: u64, name: &str, archived: bool, disabled: bool) -> Value {
    json!({
        "id": id,
        "node_id": format!("R_{id}"),
        "name": name,
        "full_name": format!("{ORG}/{name}"),
        "url": format!("https://api.github.com/repos/{ORG}/{name}"),
        "archived": archived,
        "disabled": disabled
    })
}

fn check_runs(conclusions: &[&str]) -> Value {
    let runs: Vec<Value> = conclusions
        .iter()
        .enumerate()
        .map(|(id, conclusion)| {
            json!({ "id": id, "name": format!("job-{id}"), "status": "completed", "conclusion": conclusion })
        })
        .collect();
    json!({ "total_count": runs.len(), "check_runs": runs })
}

fn rate_limit() -> Value {
    let rate = json!({ "limit": 5000, "used": 10, "remaining": 4990, "reset": 1_900_000_000_u64 });
    json!({
        "resources": { "core": rate.clone(), "search": rate.clone() },
        "rate": rate
    })
}

async fn mount_json(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_never_called(server: &MockServer, route: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

/// Mounts the per pull request endpoints: details, reviews and CI.
///
/// Without a combined status the status endpoint must not be called.
async fn mount_pull(
    server: &MockServer,
    repo: &str,
    detail: Value,
    reviews: Value,
    runs: Value,
    status: Option<Value>,
) {
    let number = detail["number"].as_u64().unwrap();
    let sha = detail["head"]["sha"].as_str().unwrap().to_string();
    let base = format!("/repos/{ORG}/{repo}");

    mount_json(server, &format!("{base}/pulls/{number}"), detail).await;
    mount_json(server, &format!("{base}/pulls/{number}/reviews"), reviews).await;
    mount_json(server, &format!("{base}/commits/{sha}/check-runs"), runs).await;
    match status {
        Some(status) => mount_json(server, &format!("{base}/commits/{sha}/status"), status).await,
        None => mount_never_called(server, &format!("{base}/commits/{sha}/status")).await,
    }
}

async fn github_server() -> MockServer {
    let server = MockServer::start().await;
    mount_json(&server, "/rate_limit", rate_limit()).await;
    server
}

#[tokio::test]
async fn bad_credentials_for_one_repository() {
    let server = unauthorized_server().await;

    let result = fetch_open_pull_requests(
        &client(&server),
        ORG,
        Some(REPO),
        FetchOptions::default(),
    )
    .await;

    assert!(matches!(result, Err(FetchError::UpstreamUnavailable(_))));
}

#[tokio::test]
async fn bad_credentials_for_organization() {
    let server = unauthorized_server().await;

    let result =
        fetch_open_pull_requests(&client(&server), ORG, None, FetchOptions::default()).await;

    assert!(matches!(result, Err(FetchError::UpstreamUnavailable(_))));
}

#[tokio::test]
async fn follows_pages_and_maps_reviews() {
    let server = github_server().await;
    let pulls_route = format!("/repos/{ORG}/{REPO}/pulls");
    let next = format!(
        "<{}{pulls_route}?state=open&per_page=100&page=2>; rel=\"next\"",
        server.uri()
    );
    Mock::given(method("GET"))
        .and(path(pulls_route.as_str()))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([pull(REPO, 2, "sha2", &[], false)])),
        )
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(pulls_route.as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Link", next.as_str())
                .set_body_json(json!([pull(REPO, 1, "sha1", &["alice"], false)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    mount_pull(
        &server,
        REPO,
        detail(pull(REPO, 1, "sha1", &["alice"], false), 12, 3, "dirty"),
        json!([
            review(1, "bob", "APPROVED"),
            review(2, "carol", "PENDING"),
            review(3, "dave", "DISMISSED"),
            review(4, "octocat", "COMMENTED"),
            review(5, "alice", "CHANGES_REQUESTED"),
        ]),
        check_runs(&["success", "skipped"]),
        Some(json!({ "state": "success", "total_count": 1, "statuses": [] })),
    )
    .await;
    mount_pull(
        &server,
        REPO,
        detail(pull(REPO, 2, "sha2", &[], false), 1, 1, "clean"),
        json!([]),
        check_runs(&["success", "failure"]),
        None,
    )
    .await;

    let pull_requests =
        fetch_open_pull_requests(&client(&server), ORG, Some(REPO), FetchOptions::default())
            .await
            .unwrap();

    let numbers: Vec<u64> = pull_requests.iter().map(|pr| pr.number).collect();
    assert_eq!(numbers, vec![1, 2]);

    let first = &pull_requests[0];
    assert_eq!(first.repository, REPO);
    assert_eq!(first.author, "octocat");
    assert_eq!(first.url, "https://github.com/osbuild/osbuild-composer/pull/1");
    assert_eq!(first.labels, ["enhancement"]);
    let verdicts: Vec<(&str, Verdict)> = first
        .reviews
        .iter()
        .map(|review| (review.reviewer.as_str(), review.verdict))
        .collect();
    assert_eq!(
        verdicts,
        vec![("bob", Verdict::Approved), ("alice", Verdict::ChangesRequested)]
    );
    assert_eq!(first.requested_reviewers, ["bob", "alice"]);
    assert_eq!(first.re_requested, ["alice"]);
    assert_eq!((first.additions, first.deletions), (12, 3));
    assert!(first.needs_update);
    assert_eq!(first.ci_status, Some(CiStatus::Success));

    let second = &pull_requests[1];
    assert!(second.reviews.is_empty());
    assert!(second.requested_reviewers.is_empty());
    assert!(!second.needs_update);
    assert_eq!(second.ci_status, Some(CiStatus::Failure));
}

#[tokio::test]
async fn skip_drafts_drops_drafts_before_fetching_reviews() {
    let server = github_server().await;
    mount_json(
        &server,
        &format!("/repos/{ORG}/{REPO}/pulls"),
        json!([pull(REPO, 3, "sha3", &["alice"], true), pull(REPO, 4, "sha4", &[], false)]),
    )
    .await;
    mount_never_called(&server, &format!("/repos/{ORG}/{REPO}/pulls/3/reviews")).await;
    mount_never_called(&server, &format!("/repos/{ORG}/{REPO}/pulls/3")).await;
    mount_pull(
        &server,
        REPO,
        detail(pull(REPO, 4, "sha4", &[], false), 5, 0, "behind"),
        json!([]),
        check_runs(&["success"]),
        Some(json!({ "state": "pending", "total_count": 2, "statuses": [] })),
    )
    .await;

    let pull_requests = fetch_open_pull_requests(
        &client(&server),
        ORG,
        Some(REPO),
        FetchOptions { skip_drafts: true },
    )
    .await
    .unwrap();

    assert_eq!(pull_requests.len(), 1);
    assert_eq!(pull_requests[0].number, 4);
    assert!(pull_requests[0].needs_update);
    assert_eq!(pull_requests[0].ci_status, Some(CiStatus::Pending));
}

#[tokio::test]
async fn organization_skips_archived_and_disabled_repositories() {
    let server = github_server().await;
    mount_json(
        &server,
        &format!("/orgs/{ORG}/repos"),
        json!([
            repository(1, "image-builder", false, false),
            repository(2, "old-tools", true, false),
            repository(3, "frozen", false, true),
        ]),
    )
    .await;
    mount_json(
        &server,
        &format!("/repos/{ORG}/image-builder/pulls"),
        json!([pull("image-builder", 7, "sha7", &[], false)]),
    )
    .await;
    mount_pull(
        &server,
        "image-builder",
        detail(pull("image-builder", 7, "sha7", &[], false), 2, 2, "clean"),
        json!([]),
        check_runs(&[]),
        Some(json!({ "state": "pending", "total_count": 0, "statuses": [] })),
    )
    .await;
    mount_never_called(&server, &format!("/repos/{ORG}/old-tools/pulls")).await;
    mount_never_called(&server, &format!("/repos/{ORG}/frozen/pulls")).await;

    let octocrab = client(&server);
    let discovered = discover_repositories(&octocrab, ORG).await.unwrap();
    let pull_requests = fetch_open_pull_requests(&octocrab, ORG, None, FetchOptions::default())
        .await
        .unwrap();

    let names: Vec<&str> = discovered.iter().map(|repo| repo.name.as_str()).collect();
    assert_eq!(names, vec!["image-builder"]);
    assert_eq!(pull_requests.len(), 1);
    assert_eq!(pull_requests[0].repository, "image-builder");
    assert_eq!(pull_requests[0].ci_status, Some(CiStatus::Success));
}

#[tokio::test]
async fn missing_rate_limit_endpoint_means_no_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rate_limit"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&server)
        .await;
    mount_json(&server, &format!("/repos/{ORG}/{REPO}/pulls"), json!([])).await;

    let pull_requests =
        fetch_open_pull_requests(&client(&server), ORG, Some(REPO), FetchOptions::default())
            .await
            .unwrap();

    assert!(pull_requests.is_empty());
}
