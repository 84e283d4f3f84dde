use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{authenticated, execute, segment, Paged};
use crate::Settings;

#[derive(Deserialize)]
pub(crate) struct Repository {
    pub slug: String,
}

#[instrument(skip_all, fields(project = %settings.project))]
pub(crate) async fn list_repositories(
    client: &Client,
    settings: &Settings,
) -> Result<Vec<Repository>> {
    let url = format!(
        "{}/rest/api/1.0/projects/{}/repos",
        settings.url,
        segment(&settings.project)
    );

    debug!("Requesting [{}]", url);
    let response = execute(authenticated(client.get(&url), settings), "list repositories")
        .await
        .with_context(|| {
            format!(
                "Failed to list the repositories of project {}",
                settings.project
            )
        })?;

    let page: Paged<Repository> = response.json().await.with_context(|| {
        format!(
            "Failed to read the repositories of project {}",
            settings.project
        )
    })?;

    debug!(count = page.values.len(), "Found repositories");
    Ok(page.values)
}
