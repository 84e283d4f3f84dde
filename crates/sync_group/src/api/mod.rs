use reqwest::{RequestBuilder, Response};
use tracing::warn;

use crate::Settings;

pub(crate) mod groups;


pub(crate) fn authenticated(request: RequestBuilder, settings: &Settings) -> RequestBuilder {
    request.header("PRIVATE-TOKEN", &settings.api_token)
}

/// Sends the request and fails on any non-success status.
pub(crate) async fn execute(request: RequestBuilder, operation: &str) -> Result<Response, reqwest::Error> {
    let result = match request.send().await {
        Ok(response) => response.error_for_status(),
        Err(e) => Err(e),
    };

    if let Err(e) = &result {
        log_failure(operation, e);
    }

    result
}

/// Coarse class of a request failure, logged as `error_type`.
pub(crate) fn error_type(err: &reqwest::Error) -> &'static str {
    if err.is_status() {
        "status"
    } else if err.is_connect() {
        "connect"
    } else if err.is_timeout() {
        "timeout"
    } else if err.is_decode() {
        "decode"
    } else if err.is_builder() {
        "builder"
    } else if err.is_request() {
        "request"
    } else {
        "other"
    }
}

fn log_failure(operation: &str, err: &reqwest::Error) {
    let status_code = err
        .status()
        .map(|s| s.as_u16().to_string())
        .unwrap_or_default();

    warn!(
        error_message = err.to_string(),
        status_code = status_code,
        error_type = error_type(err),
        operation = operation,
        "GitLab request failed"
    );
}
