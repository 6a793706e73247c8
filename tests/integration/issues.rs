//! Issue lifecycle against the fake tracker.

use super::*;
use futures::TryStreamExt;
use integrations_github_issues::{
    EventType, GitHubErrorKind, Issue, IssueState, IssueStateFilter, ListIssuesParams,
};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_end_to_end_scenario() {
    let h = setup().await;
    let repo = h.client.repo("octocat/hello-world").unwrap();

    let issue = repo.issues().create("t", "b").await.unwrap();
    assert!(issue.title().await.unwrap().starts_with('t'));
    assert!(issue.is_open().await.unwrap());

    issue.close().await.unwrap();
    assert!(!issue.is_open().await.unwrap());
    let latest = issue.events().latest().await.unwrap().unwrap();
    assert_eq!(latest.event, EventType::Closed);

    issue.open().await.unwrap();
    assert!(issue.is_open().await.unwrap());
}

#[tokio::test]
async fn test_created_issue_is_open_and_not_a_pull() {
    let h = setup().await;
    let issue = h
        .client
        .repo("octocat/hello-world")
        .unwrap()
        .issues()
        .create("Crash on start", "")
        .await
        .unwrap();

    let snapshot = issue.fetch().await.unwrap();
    assert_eq!(snapshot.number, issue.number());
    assert_eq!(snapshot.state, IssueState::Open);
    assert!(!issue.is_pull().await.unwrap());
}

#[tokio::test]
async fn test_pull_request_is_pull() {
    let h = setup().await;
    let number = h.tracker.seed_pull_request("Add feature");

    let issue = h.client.repo("octocat/hello-world").unwrap().issues().get(number);
    assert!(issue.is_pull().await.unwrap());
}

#[tokio::test]
async fn test_close_is_idempotent() {
    let h = setup().await;
    let number = h.tracker.seed_issue("twice");
    let issue = h.client.repo("octocat/hello-world").unwrap().issues().get(number);

    issue.close().await.unwrap();
    issue.close().await.unwrap();

    assert_eq!(issue.state().await.unwrap(), IssueState::Closed);
    let closes = issue
        .events()
        .iterate()
        .try_filter(|e| futures::future::ready(e.event == EventType::Closed))
        .try_collect::<Vec<_>>()
        .await
        .unwrap();
    assert_eq!(closes.len(), 1);
}

#[tokio::test]
async fn test_open_is_idempotent() {
    let h = setup().await;
    let number = h.tracker.seed_issue("already open");
    let issue = h.client.repo("octocat/hello-world").unwrap().issues().get(number);

    issue.open().await.unwrap();
    issue.open().await.unwrap();

    assert!(issue.is_open().await.unwrap());
    let events: Vec<_> = issue.events().iterate().try_collect().await.unwrap();
    assert!(events.iter().all(|e| e.event != EventType::Reopened));
    assert_eq!(h.tracker.count_requests("PATCH /repos/octocat/hello-world/issues/1"), 2);
}

#[tokio::test]
async fn test_reopen_records_one_event() {
    let h = setup().await;
    let number = h.tracker.seed_issue("flaky");
    let issue = h.client.repo("octocat/hello-world").unwrap().issues().get(number);

    issue.close().await.unwrap();
    issue.open().await.unwrap();
    issue.open().await.unwrap();

    let reopened = issue
        .events()
        .iterate()
        .try_filter(|e| futures::future::ready(e.event == EventType::Reopened))
        .try_collect::<Vec<_>>()
        .await
        .unwrap();
    assert_eq!(reopened.len(), 1);
}

#[tokio::test]
async fn test_title_and_body_edits_persist() {
    let h = setup().await;
    let number = h.tracker.seed_issue("old");
    let issue = h.client.repo("octocat/hello-world").unwrap().issues().get(number);

    issue.set_title("X marks the spot").await.unwrap();
    issue.set_body("Y not").await.unwrap();

    assert!(issue.title().await.unwrap().starts_with('X'));
    assert!(issue.body().await.unwrap().starts_with('Y'));
    assert_eq!(
        issue.events().latest().await.unwrap().map(|e| e.event),
        Some(EventType::Renamed)
    );
}

#[tokio::test]
async fn test_empty_title_never_reaches_server() {
    let h = setup().await;
    let issues = h.client.repo("octocat/hello-world").unwrap().issues();

    let err = issues.create("", "body").await.unwrap_err();

    assert_eq!(*err.kind(), GitHubErrorKind::InvalidParameter);
    assert!(h.tracker.request_log().is_empty());
}

#[tokio::test]
async fn test_handles_are_interchangeable() {
    let h = setup().await;
    let number = h.tracker.seed_issue("shared");
    let a = h.client.repo("octocat/hello-world").unwrap().issues().get(number);
    let b = h.client.repo_of("octocat", "hello-world").unwrap().issues().get(number);
    assert_eq!(a, b);

    a.close().await.unwrap();
    assert!(!b.is_open().await.unwrap());
}

#[tokio::test]
async fn test_list_filters_by_state() {
    let h = setup().await;
    let open = h.tracker.seed_issue("open one");
    let closed = h.tracker.seed_issue("closed one");
    let repo = h.client.repo("octocat/hello-world").unwrap();
    repo.issues().get(closed).close().await.unwrap();

    let default: Vec<Issue> = repo.issues().iterate().try_collect().await.unwrap();
    let all: Vec<Issue> = repo
        .issues()
        .iterate_with(&ListIssuesParams::default().state(IssueStateFilter::All))
        .try_collect()
        .await
        .unwrap();

    assert_eq!(default.iter().map(Issue::number).collect::<Vec<_>>(), vec![open]);
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_missing_issue_is_not_found() {
    let h = setup().await;
    let issue = h.client.repo("octocat/hello-world").unwrap().issues().get(404);

    let err = issue.close().await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.operation(), Some("issue.close"));
    assert_eq!(err.path(), Some("/repos/octocat/hello-world/issues/404"));
}

#[tokio::test]
async fn test_wrong_token_is_rejected() {
    let h = setup().await;
    let stranger = GitHubClient::builder()
        .pat("ghp_someoneelse")
        .base_url(h.server.uri())
        .build()
        .unwrap();

    // the fake only answers the expected bearer token
    let err = stranger
        .repo("octocat/hello-world")
        .unwrap()
        .fetch()
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(h.tracker.request_log().is_empty());
}

#[tokio::test]
async fn test_repo_fetch() {
    let h = setup().await;
    h.tracker.seed_issue("one");

    let snapshot = h.client.repo("octocat/hello-world").unwrap().fetch().await.unwrap();

    assert_eq!(snapshot.full_name, "octocat/hello-world");
    assert_eq!(snapshot.open_issues_count, 1);
}
