use ini::{Ini, ParseOption};
use std::{
    collections::HashMap,
    env,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::debug;

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;

/// The profile that is used when none is given on the command line.
pub const DEFAULT_PROFILE: &str = "default";

/// Section whose keys every profile inherits.
pub const INI_DEFAULT_SECTION: &str = "DEFAULT";

/// Prefix of the environment variables that can hold a configuration field.
pub const ENV_PREFIX: &str = "GITLAB_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} is required")]
    MissingField { field: String },

    #[error("Failed to read the configuration file at {path}: {source}")]
    Ini {
        path: String,
        #[source]
        source: ini::Error,
    },

    #[error("Unable to determine the home directory of the current user")]
    NoHomeDirectory,
}

/// The environment variable that holds the given field, e.g. `GITLAB_API_TOKEN`
/// for `api_token`.
pub fn env_var_name(field: &str) -> String {
    format!("{}{}", ENV_PREFIX, field.to_uppercase())
}

/// Replaces a leading `~` with the home directory of the current user.
pub fn expand_home(path: &str) -> Result<PathBuf, ConfigError> {
    if path == "~" {
        return dirs::home_dir().ok_or(ConfigError::NoHomeDirectory);
    }

    match path.strip_prefix("~/") {
        Some(rest) => {
            let home = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
            Ok(home.join(rest))
        }
        None => Ok(PathBuf::from(path)),
    }
}

/// The non-CLI sources a configuration field can be resolved from.
///
/// Resolved once at start-up and never changed afterwards.
pub struct ConfigSources {
    profile: String,
    ini: Ini,
    env: HashMap<String, String>,
}

impl ConfigSources {
    pub fn new(profile: &str, ini: Ini, env: HashMap<String, String>) -> Self {
        Self {
            profile: profile.to_string(),
            ini,
            env,
        }
    }

    /// Reads the INI file at `ini_path` (a leading `~` is expanded) and captures
    /// the `GITLAB_*` variables of the current process.
    ///
    /// A missing INI file is not an error, it simply contributes nothing.
    pub fn load(ini_path: &str, profile: &str) -> Result<Self, ConfigError> {
        let path = expand_home(ini_path)?;
        let ini = read_ini(&path)?;

        let env = env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .collect();

        Ok(Self::new(profile, ini, env))
    }

    /// Builds the sources from INI text instead of a file.
    pub fn parse(
        profile: &str,
        ini_content: &str,
        env: HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str_opt(ini_content, parse_options()).map_err(|e| {
            ConfigError::Ini {
                path: "<inline>".to_string(),
                source: ini::Error::Parse(e),
            }
        })?;

        Ok(Self::new(profile, ini, env))
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Returns the first non-empty value for `field`, looking at `explicit`,
    /// then the environment, then the profile section of the INI file (falling back to `[DEFAULT]`).
    pub fn resolve(&self, field: &str, explicit: Option<&str>) -> Option<String> {
        if let Some(value) = non_empty(explicit) {
            debug!(field, source = "argument", "Resolved configuration field");
            return Some(value.to_string());
        }

        let env_name = env_var_name(field);
        if let Some(value) = non_empty(self.env.get(&env_name).map(String::as_str)) {
            debug!(field, source = env_name.as_str(), "Resolved configuration field");
            return Some(value.to_string());
        }

        if let Some(value) = non_empty(self.ini_value(field)) {
            debug!(
                field,
                source = "ini",
                profile = self.profile.as_str(),
                "Resolved configuration field"
            );
            return Some(value.to_string());
        }

        None
    }

    /// Keys match regardless of case. A key missing from the profile section
    /// is looked up in `[DEFAULT]`.
    fn ini_value(&self, field: &str) -> Option<&str> {
        section_value(&self.ini, self.profile.as_str(), field)
            .or_else(|| section_value(&self.ini, INI_DEFAULT_SECTION, field))
    }

    /// Same as [`ConfigSources::resolve`] but fails when nothing provides a value.
    pub fn require(&self, field: &str, explicit: Option<&str>) -> Result<String, ConfigError> {
        self.resolve(field, explicit)
            .ok_or_else(|| ConfigError::MissingField {
                field: field.to_string(),
            })
    }
}

fn section_value<'a>(ini: &'a Ini, section: &str, field: &str) -> Option<&'a str> {
    ini.section(Some(section))?
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(field))
        .map(|(_, value)| value)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

// Passwords may contain backslashes and quotes, take values literally.
fn parse_options() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    }
}

fn read_ini(path: &Path) -> Result<Ini, ConfigError> {
    match Ini::load_from_file_opt(path, parse_options()) {
        Ok(ini) => Ok(ini),
        Err(ini::Error::Io(e)) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "No configuration file found");
            Ok(Ini::new())
        }
        Err(source) => Err(ConfigError::Ini {
            path: path.display().to_string(),
            source,
        }),
    }
}
