use std::path::PathBuf;

use anyhow::{Context, Result};
use forge_profile::expand_home;
use reqwest::Client;
use tracing::{debug, info, instrument};

use crate::api::groups::{get_group, Project};
use crate::git;
use crate::Settings;

#[cfg(test)]
#[path = "mirror_tests.rs"]
mod mirror_tests;

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    Cloned,
    Updated,
    Skipped,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct MirrorSummary {
    pub cloned: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// Local directory for a project: `<root_dir>/<group>/<project path>`.
pub(crate) fn clone_dir(settings: &Settings, project: &Project) -> Result<PathBuf> {
    let joined = format!("{}/{}/{}", settings.root_dir, settings.group, project.path);
    Ok(expand_home(&joined)?)
}

/// Clones or updates every project of the group that has a default branch.
///
/// Projects are handled one at a time in the order the API lists them. The
/// first failure ends the run.
#[instrument(skip_all, fields(group = %settings.group))]
pub(crate) async fn mirror_group(client: &Client, settings: &Settings) -> Result<MirrorSummary> {
    let mut summary = MirrorSummary::default();

    let group = get_group(client, settings).await?;
    for project in &group.projects {
        match mirror_project(settings, project).await? {
            Outcome::Cloned => summary.cloned += 1,
            Outcome::Updated => summary.updated += 1,
            Outcome::Skipped => summary.skipped += 1,
        }
    }

    Ok(summary)
}

#[instrument(skip_all, fields(project = %project.path))]
pub(crate) async fn mirror_project(settings: &Settings, project: &Project) -> Result<Outcome> {
    let has_default_branch = project
        .default_branch
        .as_deref()
        .is_some_and(|b| !b.is_empty());
    if !has_default_branch {
        debug!("No default branch, skipping");
        return Ok(Outcome::Skipped);
    }

    let dir = clone_dir(settings, project)?;
    tokio::fs::create_dir_all(&dir)
        .await
        .with_context(|| format!("Failed to create the directory {}", dir.display()))?;

    if git::is_work_tree(&dir).await? {
        info!("Synching {} to {}", project.ssh_url_to_repo, dir.display());
        git::fetch_all(&dir).await?;
        git::pull(&dir).await?;
        Ok(Outcome::Updated)
    } else {
        info!("Cloning {} to {}", project.ssh_url_to_repo, dir.display());
        git::clone(&project.ssh_url_to_repo, &dir).await?;
        Ok(Outcome::Cloned)
    }
}
