use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{authenticated, execute};
use crate::Settings;

#[derive(Deserialize)]
pub(crate) struct Group {
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// A project as listed in the group details. Empty projects have no default
/// branch.
#[derive(Deserialize)]
pub(crate) struct Project {
    pub path: String,
    pub default_branch: Option<String>,
    pub ssh_url_to_repo: String,
}

#[instrument(skip_all, fields(group = %settings.group))]
pub(crate) async fn get_group(client: &Client, settings: &Settings) -> Result<Group> {
    let url = format!(
        "{}/api/v4/groups/{}",
        settings.url,
        urlencoding::encode(&settings.group)
    );

    debug!("Requesting [{}]", url);
    let request = authenticated(client.get(&url), settings).header("Accept", "application/json");
    let response = execute(request, "get group")
        .await
        .with_context(|| format!("Failed to fetch group {}", settings.group))?;

    let group: Group = response
        .json()
        .await
        .with_context(|| format!("Failed to read the projects of group {}", settings.group))?;

    debug!(count = group.projects.len(), "Found projects");
    Ok(group)
}
