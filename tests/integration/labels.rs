//! Issue label membership and the repository catalog.

use super::*;
use futures::TryStreamExt;
use integrations_github_issues::{GitHubErrorKind, Label};
use pretty_assertions::assert_eq;

async fn labeled_issue(h: &Harness) -> (u64, integrations_github_issues::IssueLabels) {
    let number = h.tracker.seed_issue("labels");
    let labels = h
        .client
        .repo("octocat/hello-world")
        .unwrap()
        .issues()
        .get(number)
        .labels();
    (number, labels)
}

#[tokio::test]
async fn test_add_then_remove_single_label() {
    let h = setup().await;
    let (_, labels) = labeled_issue(&h).await;
    let bug = Label::new("bug");

    labels.add([bug.clone()]).await.unwrap();
    let attached: Vec<Label> = labels.iterate().try_collect().await.unwrap();
    assert_eq!(attached, vec![bug.clone()]);

    labels.remove(&bug.name).await.unwrap();
    let attached: Vec<Label> = labels.iterate().try_collect().await.unwrap();
    assert!(attached.is_empty());
}

#[tokio::test]
async fn test_adding_present_label_keeps_one_copy() {
    let h = setup().await;
    let (number, labels) = labeled_issue(&h).await;

    labels.add(["bug"]).await.unwrap();
    labels.add(["bug", "ui"]).await.unwrap();

    assert_eq!(h.tracker.labels_of(number), vec!["bug", "ui"]);
}

#[tokio::test]
async fn test_adding_unknown_label_creates_it_in_catalog() {
    let h = setup().await;
    let (_, labels) = labeled_issue(&h).await;
    assert!(!h.tracker.catalog_has("needs triage"));

    labels.add(["needs triage"]).await.unwrap();

    assert!(h.tracker.catalog_has("needs triage"));
}

#[tokio::test]
async fn test_clear_on_empty_set_succeeds() {
    let h = setup().await;
    let (number, labels) = labeled_issue(&h).await;

    labels.clear().await.unwrap();
    labels.add(["a", "b"]).await.unwrap();
    labels.clear().await.unwrap();

    assert!(h.tracker.labels_of(number).is_empty());
}

#[tokio::test]
async fn test_remove_absent_label_is_not_found() {
    let h = setup().await;
    let (_, labels) = labeled_issue(&h).await;

    let err = labels.remove("wontfix").await.unwrap_err();

    assert_eq!(*err.kind(), GitHubErrorKind::NotFound);
    assert_eq!(err.message(), "Label does not exist");
    assert_eq!(err.operation(), Some("labels.remove"));
}

#[tokio::test]
async fn test_label_names_with_spaces_round_trip() {
    let h = setup().await;
    let (number, labels) = labeled_issue(&h).await;

    labels.add(["good first issue"]).await.unwrap();
    labels.remove("good first issue").await.unwrap();

    assert!(h.tracker.labels_of(number).is_empty());
}

#[tokio::test]
async fn test_replace_sets_full_membership() {
    let h = setup().await;
    let (number, labels) = labeled_issue(&h).await;

    labels.add(["old"]).await.unwrap();
    labels.replace(["new", "newer"]).await.unwrap();

    assert_eq!(h.tracker.labels_of(number), vec!["new", "newer"]);
}

#[tokio::test]
async fn test_label_events_are_recorded() {
    let h = setup().await;
    let number = h.tracker.seed_issue("audit");
    let issue = h.client.repo("octocat/hello-world").unwrap().issues().get(number);

    issue.labels().add(["bug"]).await.unwrap();
    issue.labels().remove("bug").await.unwrap();

    let events: Vec<_> = issue.events().iterate().try_collect().await.unwrap();
    let kinds: Vec<&str> = events.iter().map(|e| e.event.as_str()).collect();
    assert_eq!(kinds, vec!["labeled", "unlabeled"]);
    assert_eq!(events[0].label.as_ref().map(|l| l.name.as_str()), Some("bug"));
}

#[tokio::test]
async fn test_catalog_crud() {
    let h = setup().await;
    let catalog = h.client.repo("octocat/hello-world").unwrap().labels();

    let created = catalog.create("bug", "#d73a4a").await.unwrap();
    assert_eq!(created.color.as_deref(), Some("d73a4a"));
    assert_eq!(catalog.get("bug").await.unwrap(), Label::new("bug"));

    let duplicate = catalog.create("bug", "ffffff").await.unwrap_err();
    assert_eq!(duplicate.status_code(), Some(422));

    let names: Vec<String> = catalog
        .iterate()
        .map_ok(|l| l.name)
        .try_collect()
        .await
        .unwrap();
    assert_eq!(names, vec!["bug"]);

    catalog.delete("bug").await.unwrap();
    assert!(catalog.get("bug").await.unwrap_err().is_not_found());
}
