use super::*;
use std::fs;
use tempfile::TempDir;

const INI_CONTENT: &str = r#"
[default]
url = https://ini.example.com
username = ini-user
password = p\ss"word

[staging]
url = https://staging.example.com
username =
"#;

fn sources(profile: &str, env: &[(&str, &str)]) -> ConfigSources {
    let env = env
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ConfigSources::parse(profile, INI_CONTENT, env).unwrap()
}

#[test]
fn when_an_argument_is_given_it_should_win_over_env_and_ini() {
    let sources = sources("default", &[("GITLAB_URL", "https://env.example.com")]);

    let url = sources.resolve("url", Some("https://cli.example.com"));

    assert_eq!(url.as_deref(), Some("https://cli.example.com"));
}

#[test]
fn when_no_argument_is_given_it_should_use_the_environment() {
    let sources = sources("default", &[("GITLAB_URL", "https://env.example.com")]);

    let url = sources.resolve("url", None);

    assert_eq!(url.as_deref(), Some("https://env.example.com"));
}

#[test]
fn when_only_the_ini_has_a_value_it_should_use_the_profile_section() {
    let sources = sources("staging", &[]);

    let url = sources.resolve("url", None);

    assert_eq!(url.as_deref(), Some("https://staging.example.com"));
}

#[test]
fn when_the_argument_is_empty_it_should_fall_through_to_the_next_source() {
    let sources = sources("default", &[("GITLAB_USERNAME", "")]);

    let username = sources.resolve("username", Some(""));

    assert_eq!(username.as_deref(), Some("ini-user"));
}

#[test]
fn when_the_field_name_has_an_underscore_it_should_use_the_upper_case_env_name() {
    assert_eq!(env_var_name("api_token"), "GITLAB_API_TOKEN");
    assert_eq!(env_var_name("root_dir"), "GITLAB_ROOT_DIR");

    let sources = sources("default", &[("GITLAB_API_TOKEN", "secret")]);
    assert_eq!(sources.resolve("api_token", None).as_deref(), Some("secret"));
}

#[test]
fn when_a_required_field_is_empty_everywhere_it_should_error() {
    let sources = sources("staging", &[]);

    let err = sources.require("username", None).unwrap_err();

    assert!(matches!(err, ConfigError::MissingField { ref field } if field == "username"));
    assert_eq!(err.to_string(), "username is required");
}

#[test]
fn when_the_profile_section_is_missing_it_should_treat_fields_as_unresolved() {
    let sources = sources("production", &[]);

    assert_eq!(sources.resolve("url", None), None);
    assert!(sources.require("url", None).is_err());
}

const SHARED_INI: &str = r#"
[DEFAULT]
url = https://shared.example.com
password = shared-password

[work]
Username = bob
PASSWORD = work-password
"#;

#[test]
fn when_a_key_differs_in_case_it_should_still_match() {
    let sources = ConfigSources::parse("work", SHARED_INI, HashMap::new()).unwrap();

    assert_eq!(sources.resolve("username", None).as_deref(), Some("bob"));
}

#[test]
fn when_the_profile_lacks_a_key_it_should_use_the_default_section() {
    let sources = ConfigSources::parse("work", SHARED_INI, HashMap::new()).unwrap();

    assert_eq!(
        sources.resolve("url", None).as_deref(),
        Some("https://shared.example.com")
    );
    assert_eq!(
        sources.resolve("password", None).as_deref(),
        Some("work-password")
    );
}

#[test]
fn when_the_default_section_lacks_the_key_too_it_should_stay_unresolved() {
    let sources = ConfigSources::parse("work", SHARED_INI, HashMap::new()).unwrap();

    assert_eq!(sources.resolve("api_token", None), None);
}

#[test]
fn when_loading_a_file_it_should_keep_values_literally() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("forge.ini");
    fs::write(&path, INI_CONTENT).unwrap();

    let sources = ConfigSources::load(path.to_str().unwrap(), "default").unwrap();

    assert_eq!(sources.profile(), "default");
    assert_eq!(
        sources.require("password", Some("")).unwrap(),
        r#"p\ss"word"#
    );
}

#[test]
fn when_the_file_does_not_exist_it_should_load_an_empty_configuration() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.ini");

    let sources = ConfigSources::load(path.to_str().unwrap(), DEFAULT_PROFILE).unwrap();

    assert_eq!(sources.resolve("forge_profile_test_field", None), None);
}

#[test]
fn when_the_file_is_malformed_it_should_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.ini");
    fs::write(&path, "[default\nurl = https://example.com\n").unwrap();

    let result = ConfigSources::load(path.to_str().unwrap(), DEFAULT_PROFILE);

    assert!(matches!(result, Err(ConfigError::Ini { .. })));
}

#[test]
fn when_parsing_malformed_text_it_should_error() {
    let result = ConfigSources::parse(DEFAULT_PROFILE, "[default\nurl = x\n", HashMap::new());

    assert!(matches!(result, Err(ConfigError::Ini { ref path, .. }) if path == "<inline>"));
}

#[test]
fn when_expanding_a_path_without_tilde_it_should_be_unchanged() {
    assert_eq!(
        expand_home("/srv/mirrors").unwrap(),
        PathBuf::from("/srv/mirrors")
    );
    assert_eq!(
        expand_home("relative/~/dir").unwrap(),
        PathBuf::from("relative/~/dir")
    );
}

#[test]
fn when_expanding_a_tilde_path_it_should_start_at_the_home_directory() {
    let home = match dirs::home_dir() {
        Some(h) => h,
        None => return,
    };

    assert_eq!(expand_home("~").unwrap(), home);
    assert_eq!(
        expand_home("~/projects/group").unwrap(),
        home.join("projects").join("group")
    );
}
