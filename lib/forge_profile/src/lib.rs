//! Shared plumbing for the forge administration tools.
//!
//! Both tools resolve each configuration field from three places, in order of
//! precedence:
//!
//! 1. an explicit command line argument,
//! 2. a `GITLAB_<FIELD>` environment variable,
//! 3. the `[<profile>]` section of the tool's INI file.
//!
//! The first non-empty value wins.

pub mod config;
pub mod telemetry;

pub use config::{expand_home, ConfigError, ConfigSources, DEFAULT_PROFILE, ENV_PREFIX};
