use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{authenticated, execute, segment, Paged};
use crate::Settings;

/// An existing branch restriction. Only the identifier is needed to remove it.
#[derive(Deserialize)]
pub(crate) struct Restriction {
    pub id: u64,
}

#[derive(Serialize)]
pub(crate) struct NewRestriction {
    pub matcher: Matcher,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub users: Vec<String>,
    pub groups: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Matcher {
    pub id: &'static str,
    pub display_id: &'static str,
    #[serde(rename = "type")]
    pub kind: MatcherType,
}

#[derive(Serialize)]
pub(crate) struct MatcherType {
    pub id: &'static str,
}

impl NewRestriction {
    /// Nobody may push to any branch.
    pub(crate) fn read_only_wildcard() -> Self {
        Self {
            matcher: Matcher {
                id: "*",
                display_id: "*",
                kind: MatcherType { id: "PATTERN" },
            },
            kind: "read-only",
            users: Vec::new(),
            groups: Vec::new(),
        }
    }
}

fn restrictions_url(settings: &Settings, slug: &str) -> String {
    format!(
        "{}/rest/branch-permissions/latest/projects/{}/repos/{}/restrictions",
        settings.url,
        segment(&settings.project),
        segment(slug)
    )
}

#[instrument(skip(client, settings), fields(project = %settings.project))]
pub(crate) async fn list_restrictions(
    client: &Client,
    settings: &Settings,
    slug: &str,
) -> Result<Vec<Restriction>> {
    let url = restrictions_url(settings, slug);

    debug!("Requesting [{}]", url);
    let response = execute(authenticated(client.get(&url), settings), "list restrictions")
        .await
        .with_context(|| {
            format!(
                "Failed to list the restrictions of {}/{}",
                settings.project, slug
            )
        })?;

    let page: Paged<Restriction> = response.json().await.with_context(|| {
        format!(
            "Failed to read the restrictions of {}/{}",
            settings.project, slug
        )
    })?;

    Ok(page.values)
}

#[instrument(skip(client, settings, restriction), fields(project = %settings.project, id = restriction.id))]
pub(crate) async fn delete_restriction(
    client: &Client,
    settings: &Settings,
    slug: &str,
    restriction: &Restriction,
) -> Result<()> {
    let url = format!("{}/{}", restrictions_url(settings, slug), restriction.id);

    debug!("Deleting [{}]", url);
    execute(authenticated(client.delete(&url), settings), "delete restriction")
        .await
        .with_context(|| {
            format!(
                "Failed to delete restriction {} of {}/{}",
                restriction.id, settings.project, slug
            )
        })?;

    Ok(())
}

#[instrument(skip(client, settings), fields(project = %settings.project))]
pub(crate) async fn create_read_only_restriction(
    client: &Client,
    settings: &Settings,
    slug: &str,
) -> Result<()> {
    let url = restrictions_url(settings, slug);
    let payload = NewRestriction::read_only_wildcard();

    debug!(
        "Sending payload: [{}]",
        serde_json::to_string(&payload).unwrap_or_default()
    );
    execute(
        authenticated(client.post(&url), settings).json(&payload),
        "create restriction",
    )
    .await
    .with_context(|| {
        format!(
            "Failed to create the read-only restriction for {}/{}",
            settings.project, slug
        )
    })?;

    Ok(())
}
