use anyhow::Result;
use reqwest::Client;
use tracing::{info, instrument};

use crate::api::{
    repositories::list_repositories,
    restrictions::{create_read_only_restriction, delete_restriction, list_restrictions},
};
use crate::Settings;

#[cfg(test)]
#[path = "restrict_tests.rs"]
mod restrict_tests;

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct RestrictSummary {
    pub repositories: usize,
    pub deleted: usize,
}

/// Replaces the restrictions of every repository in the project with one
/// wildcard read-only restriction.
///
/// Stops at the first failing request. Repositories handled before the failure
/// keep their new restriction.
#[instrument(skip_all, fields(project = %settings.project))]
pub(crate) async fn restrict_project(client: &Client, settings: &Settings) -> Result<RestrictSummary> {
    let mut summary = RestrictSummary::default();

    let repositories = list_repositories(client, settings).await?;
    for repo in &repositories {
        let restrictions = list_restrictions(client, settings, &repo.slug).await?;
        if !restrictions.is_empty() {
            info!(
                "Deleting current restrictions for {}/{}",
                settings.project, repo.slug
            );
        }

        for restriction in &restrictions {
            delete_restriction(client, settings, &repo.slug, restriction).await?;
            summary.deleted += 1;
        }

        info!("Creating restrictions for {}/{}", settings.project, repo.slug);
        create_read_only_restriction(client, settings, &repo.slug).await?;
        summary.repositories += 1;
    }

    Ok(summary)
}
