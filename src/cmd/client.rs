//! Minimal HTTP client for the admin API of a running instance.

use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Method, StatusCode};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::error::SignpostError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub struct AdminResponse {
    pub endpoint: String,
    pub status: StatusCode,
    pub body: Bytes,
}

impl AdminResponse {
    /// Fail unless the admin API answered with `expected`.
    pub fn expect_status(self, expected: StatusCode) -> Result<Self, SignpostError> {
        if self.status == expected {
            Ok(self)
        } else {
            Err(SignpostError::AdminRequestFailed {
                endpoint: self.endpoint,
                status: self.status,
            })
        }
    }

    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Join the admin base URL and an endpoint path.
#[must_use]
pub fn endpoint(base: &str, path: &str) -> String {
    format!("{}{path}", base.trim_end_matches('/'))
}

pub async fn send(method: Method, base: &str, path: &str) -> Result<AdminResponse, SignpostError> {
    let url = endpoint(base, path);
    let uri: hyper::Uri =
        url.parse()
            .map_err(|e: hyper::http::uri::InvalidUri| SignpostError::UriParse {
                source: Box::new(e),
            })?;

    let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

    let req = hyper::Request::builder()
        .method(method)
        .uri(uri)
        .body(Full::new(Bytes::new()))
        .map_err(|e| SignpostError::HttpRequest {
            source: Box::new(e),
        })?;

    let response = tokio::time::timeout(REQUEST_TIMEOUT, client.request(req))
        .await
        .map_err(|_| SignpostError::HttpRequest {
            source: format!("request to {url} timed out after 10s").into(),
        })?
        .map_err(|e| SignpostError::HttpRequest {
            source: Box::new(e),
        })?;

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| SignpostError::HttpRequest {
            source: Box::new(e),
        })?
        .to_bytes();

    Ok(AdminResponse {
        endpoint: url,
        status,
        body,
    })
}
