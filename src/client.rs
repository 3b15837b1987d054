//! Digest-authenticated HTTP client for the printer API.
//!
//! Wraps a shared `reqwest::Client`; digest challenge-response signing is
//! handled by diqwest on every request. Safe for concurrent use; connections
//! are pooled by reqwest.

use diqwest::WithDigestAuth;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// A single upstream fetch failure. Local to one fetch within one collection
/// cycle; never propagated as a process fault.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] diqwest::error::Error),

    #[error("status code: {0}")]
    Status(StatusCode),

    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Client bound to one printer base URL and one set of credentials.
#[derive(Clone)]
pub struct PrinterClient {
    http: Client,
    base: String,
    username: String,
    password: String,
}

impl PrinterClient {
    /// `timeout` applies to every request issued through this client; the
    /// proxy path passes `None`.
    pub fn new(
        base: &str,
        username: &str,
        password: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base: base.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Join `path` onto the printer base URL.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    /// GET `path` and decode the JSON body. 204 No Content maps to
    /// `Ok(None)`; any other non-200 status is a failure.
    pub async fn get_json_optional<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, FetchError> {
        let res = self
            .http
            .get(self.url_for(path))
            .send_with_digest_auth(&self.username, &self.password)
            .await?;
        match res.status() {
            StatusCode::NO_CONTENT => Ok(None),
            StatusCode::OK => Ok(Some(res.json().await.map_err(FetchError::Decode)?)),
            other => Err(FetchError::Status(other)),
        }
    }

    /// GET `path` and decode the JSON body; only 200 is a success.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        self.get_json_optional(path)
            .await?
            .ok_or(FetchError::Status(StatusCode::NO_CONTENT))
    }

    /// Replay an arbitrary request against the printer, preserving method and
    /// body. Used by the forwarder; the response is relayed verbatim by the
    /// caller.
    pub async fn execute(
        &self,
        method: Method,
        path_and_query: &str,
        body: Vec<u8>,
    ) -> Result<Response, diqwest::error::Error> {
        self.http
            .request(method, self.url_for(path_and_query))
            .body(body)
            .send_with_digest_auth(&self.username, &self.password)
            .await
    }
}
