use anyhow::Error;
use clap::Parser;
use forge_profile::{telemetry::init_local_telemetry, ConfigError, ConfigSources, DEFAULT_PROFILE};
use tracing::info;

mod api;
mod restrict;

use restrict::restrict_project;


const BITBUCKET_INI_FILE: &str = "~/.bitbucket.ini";

#[derive(Parser)]
#[command(name = "bitbucket-restrict-push")]
#[command(about = "Restrict push for all repositories in project", long_about = None)]
#[command(after_help = "Progress is logged at info level; RUST_LOG=warn or stricter hides it.")]
struct Cli {
    /// The profile to use within ~/.bitbucket.ini
    #[arg(long, default_value = DEFAULT_PROFILE)]
    profile: String,

    /// The bitbucket url
    #[arg(long)]
    url: Option<String>,

    /// The bitbucket username
    #[arg(long)]
    username: Option<String>,

    /// The bitbucket password
    #[arg(long)]
    password: Option<String>,

    /// The project that owns the repositories
    project: String,
}

pub(crate) struct Settings {
    pub url: String,
    pub username: String,
    pub password: String,
    pub project: String,
}

fn resolve_settings(cli: &Cli, sources: &ConfigSources) -> Result<Settings, ConfigError> {
    let username = sources.require("username", cli.username.as_deref())?;
    let password = sources.require("password", cli.password.as_deref())?;
    let url = sources.require("url", cli.url.as_deref())?;

    Ok(Settings {
        url: url.trim_end_matches('/').to_string(),
        username,
        password,
        project: cli.project.clone(),
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_local_telemetry()?;

    let cli = Cli::parse();
    let sources = ConfigSources::load(BITBUCKET_INI_FILE, &cli.profile)?;
    let settings = resolve_settings(&cli, &sources)?;

    info!(
        profile = sources.profile(),
        url = settings.url.as_str(),
        project = settings.project.as_str(),
        "Restricting push"
    );

    let client = reqwest::Client::new();
    let summary = restrict_project(&client, &settings).await?;

    info!(
        repositories = summary.repositories,
        deleted = summary.deleted,
        "Done"
    );

    Ok(())
}
