//! Calls against the Bitbucket Server REST API.
//!
//! Every request authenticates with HTTP Basic credentials and any non-2xx
//! response is turned into an error.

use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use tracing::warn;

use crate::Settings;

pub(crate) mod repositories;
pub(crate) mod restrictions;


/// Bitbucket wraps collections in a page envelope. Only the first page is read.
#[derive(Deserialize)]
pub(crate) struct Paged<T> {
    pub values: Vec<T>,
}

pub(crate) fn authenticated(request: RequestBuilder, settings: &Settings) -> RequestBuilder {
    request.basic_auth(&settings.username, Some(&settings.password))
}

/// Path segment safe form of a project key or repository slug.
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
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
        "Bitbucket request failed"
    );
}
