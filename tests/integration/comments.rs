//! Comment posting, listing and removal.

use super::*;
use futures::TryStreamExt;

#[tokio::test]
async fn test_comment_lifecycle() {
    let h = setup().await;
    let number = h.tracker.seed_issue("talk");
    let comments = h
        .client
        .repo("octocat/hello-world")
        .unwrap()
        .issues()
        .get(number)
        .comments();

    let comment = comments.post("hey, works?").await.unwrap();
    assert!(comment.body().await.unwrap().starts_with("hey, "));
    assert_eq!(comments.collection().count().await.unwrap(), 1);

    let me = h.client.users().self_user().await.unwrap();
    let author = comment.author().await.unwrap();
    assert_eq!(author.name().await.unwrap(), me.name().await.unwrap());
    assert_eq!(author.name().await.unwrap().as_deref(), Some(DISPLAY_NAME));

    comment.remove().await.unwrap();
    assert_eq!(comments.collection().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_second_remove_is_not_found() {
    let h = setup().await;
    let number = h.tracker.seed_issue("gone");
    let comment = h
        .client
        .repo("octocat/hello-world")
        .unwrap()
        .issues()
        .get(number)
        .comments()
        .post("short-lived")
        .await
        .unwrap();

    comment.remove().await.unwrap();
    let err = comment.remove().await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.status_code(), Some(404));
    assert_eq!(h.tracker.count_requests("DELETE /repos/octocat/hello-world/issues/comments/"), 2);
}

#[tokio::test]
async fn test_comments_keep_creation_order() {
    let h = setup().await;
    let number = h.tracker.seed_issue("ordered");
    let comments = h
        .client
        .repo("octocat/hello-world")
        .unwrap()
        .issues()
        .get(number)
        .comments();

    let first = comments.post("first").await.unwrap();
    let second = comments.post("second").await.unwrap();

    let listed: Vec<_> = comments.iterate().try_collect().await.unwrap();
    assert_eq!(listed, vec![first, second]);
}

#[tokio::test]
async fn test_edit_comment_body() {
    let h = setup().await;
    let number = h.tracker.seed_issue("edit");
    let comment = h
        .client
        .repo("octocat/hello-world")
        .unwrap()
        .issues()
        .get(number)
        .comments()
        .post("typo")
        .await
        .unwrap();

    comment.set_body("fixed").await.unwrap();

    assert_eq!(comment.fetch().await.unwrap().body, "fixed");
}
