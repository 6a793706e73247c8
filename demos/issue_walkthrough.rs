//! Walks one issue through its whole lifecycle.
//!
//! Run with:
//! ```
//! RUST_LOG=integrations_github_issues=debug cargo run --example issue_walkthrough -- ghp_xxxxxxxxxxxx owner/repo
//! ```

use anyhow::Context;
use futures::TryStreamExt;
use integrations_github_issues::{AuthMethod, GitHubClient, GitHubConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let token = args
        .next()
        .context("usage: issue_walkthrough <token> <owner/repo>")?;
    let full_name = args
        .next()
        .context("usage: issue_walkthrough <token> <owner/repo>")?;

    let config = GitHubConfig::builder()
        .auth(AuthMethod::pat(token))
        .build()?;
    let client = GitHubClient::new(config)?;
    let repo = client.repo(&full_name)?;

    let me = client.users().self_user().await?;
    println!("Signed in as {}", me.login());

    println!("1. Opening an issue...");
    let issue = repo
        .issues()
        .create("Walkthrough issue", "Created by the issue_walkthrough demo")
        .await?;
    println!("   #{} \"{}\"", issue.number(), issue.title().await?);

    println!("2. Commenting...");
    let comment = issue.comments().post("hey, works?").await?;
    println!("   comment {} by {}", comment.id(), comment.author().await?.login());

    println!("3. Labelling...");
    issue.labels().add(["demo"]).await?;
    let labels: Vec<String> = issue
        .labels()
        .iterate()
        .map_ok(|l| l.name)
        .try_collect()
        .await?;
    println!("   labels: {}", labels.join(", "));

    println!("4. Cleaning up...");
    comment.remove().await?;
    issue.labels().clear().await?;
    issue.close().await?;

    println!("5. Event trail:");
    let mut events = issue.events().iterate();
    while let Some(event) = events.try_next().await? {
        let actor = event.actor.map(|a| a.login).unwrap_or_else(|| "ghost".into());
        println!("   {} {} by {}", event.created_at, event.event, actor);
    }

    if let Some(metrics) = client.metrics() {
        let snapshot = metrics.snapshot();
        println!(
            "\n{} requests, {} failed, {}us average",
            snapshot.requests_total, snapshot.requests_failed, snapshot.average_latency_us
        );
    }

    Ok(())
}
