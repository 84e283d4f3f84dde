use anyhow::Error;
use clap::Parser;
use forge_profile::{telemetry::init_local_telemetry, ConfigError, ConfigSources, DEFAULT_PROFILE};
use tracing::info;

mod api;
mod git;
mod mirror;

use mirror::mirror_group;


#[cfg(test)]
mod test_support;

const GITLAB_INI_FILE: &str = "~/.gitlab.ini";
const DEFAULT_CLONE_ROOT_DIR: &str = "~/projects";

#[derive(Parser)]
#[command(name = "sync-gitlab-group")]
#[command(about = "Clones gitlab subgroup repos", long_about = None)]
#[command(after_help = "Progress is logged at info level; RUST_LOG=warn or stricter hides it.")]
struct Cli {
    /// The gitlab profile to use within ~/.gitlab.ini
    #[arg(long, default_value = DEFAULT_PROFILE)]
    profile: String,

    /// The gitlab url
    #[arg(long)]
    url: Option<String>,

    /// The gitlab root group path
    #[arg(long)]
    root_group: Option<String>,

    /// The gitlab api token to be used
    #[arg(long)]
    api_token: Option<String>,

    /// The local directory to be used when cloning. Default: ~/projects/
    #[arg(long)]
    root_dir: Option<String>,

    /// The group that owns the repositories
    group: String,
}

pub(crate) struct Settings {
    pub url: String,
    pub api_token: String,
    pub root_dir: String,
    pub group: String,
}

/// Prefixes a bare group name with the root group, if one is configured.
fn qualify_group(group: &str, root_group: Option<&str>) -> String {
    match root_group {
        Some(root) if !group.contains('/') => format!("{}/{}", root.trim_end_matches('/'), group),
        _ => group.to_string(),
    }
}

fn resolve_settings(cli: &Cli, sources: &ConfigSources) -> Result<Settings, ConfigError> {
    let api_token = sources.require("api_token", cli.api_token.as_deref())?;
    let url = sources.require("url", cli.url.as_deref())?;
    let root_dir = sources
        .resolve("root_dir", cli.root_dir.as_deref())
        .unwrap_or_else(|| DEFAULT_CLONE_ROOT_DIR.to_string());
    let root_group = sources.resolve("root_group", cli.root_group.as_deref());

    Ok(Settings {
        url: url.trim_end_matches('/').to_string(),
        api_token,
        root_dir: root_dir.trim_end_matches('/').to_string(),
        group: qualify_group(&cli.group, root_group.as_deref()),
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_local_telemetry()?;

    let cli = Cli::parse();
    let sources = ConfigSources::load(GITLAB_INI_FILE, &cli.profile)?;
    let settings = resolve_settings(&cli, &sources)?;

    info!(
        profile = sources.profile(),
        url = settings.url.as_str(),
        group = settings.group.as_str(),
        root_dir = settings.root_dir.as_str(),
        "Synchronising group"
    );

    let client = reqwest::Client::new();
    let summary = mirror_group(&client, &settings).await?;

    info!(
        cloned = summary.cloned,
        updated = summary.updated,
        skipped = summary.skipped,
        "Done"
    );

    Ok(())
}
