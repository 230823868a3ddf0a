pub mod config;

use anyhow::{bail, Context, Result};
use log::debug;
use reqwest::{Method, StatusCode, Url};
use serde_json::Value;
use thiserror::Error;

use crate::api;

pub const SESSION_EXPIRED_MESSAGE: &str = "session expired, please log in again";

/// Why a dispatched request did not produce a result.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("{}", SESSION_EXPIRED_MESSAGE)]
    SessionExpired,

    #[error("HTTP {status}{}", format_body(.body))]
    Http { status: u16, body: String },

    #[error("{0}")]
    Transport(String),
}

fn format_body(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(": {body}")
    }
}

/// Whether a request carries the bearer token of the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    Authenticated,
    /// Never sends the token, even if a session exists. Used by login and
    /// account creation.
    Anonymous,
}

/// Status and raw body of a response.
#[derive(Debug)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parses the body as json, an empty body reads as `null`.
    pub fn json(&self) -> Result<Value, DispatchError> {
        if self.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&self.body)
            .map_err(|e| DispatchError::Transport(format!("parse json response: {e}")))
    }
}

/// Plain json-over-http client bound to one server.
#[derive(Debug, Clone)]
pub struct RestClient {
    url: String,
    client: reqwest::Client,
}

impl RestClient {
    pub fn new(url: &str, accept_invalid_certs: bool) -> Result<Self> {
        let url = url.trim_end_matches('/');
        let parsed = match Url::parse(url) {
            Ok(url) => url,
            Err(_) => bail!("invalid server url '{url}'"),
        };

        match parsed.scheme() {
            "http" | "https" => {}
            _ => bail!(
                "invalid url scheme, expect 'http' or 'https', not '{}'",
                parsed.scheme()
            ),
        }

        let client = if accept_invalid_certs && parsed.scheme() == "https" {
            reqwest::Client::builder()
                .danger_accept_invalid_certs(true)
                .build()
                .context("build https client")?
        } else {
            reqwest::Client::new()
        };

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends one request and classifies the response.
    ///
    /// A 401 is reported as [`DispatchError::SessionExpired`] before any other
    /// status check. The caller decides what expiry means for its session.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        payload: Option<&Value>,
    ) -> Result<Reply, DispatchError> {
        let reply = self.send(method, path, token, payload).await?;

        if reply.status == StatusCode::UNAUTHORIZED.as_u16() {
            return Err(DispatchError::SessionExpired);
        }
        if !reply.is_success() {
            return Err(DispatchError::Http {
                status: reply.status,
                body: reply.body,
            });
        }
        Ok(reply)
    }

    /// Sends one request and returns the response whatever its status. Only
    /// failing to talk to the server is an error here.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        payload: Option<&Value>,
    ) -> Result<Reply, DispatchError> {
        let url = format!("{}{}", self.url, path);
        debug!("Request server: {method} {url}");

        let mut req = self.client.request(method.clone(), &url);
        if method != Method::DELETE {
            req = req.header(api::HEADER_CONTENT_TYPE, api::MIME_JSON);
        }
        if let Some(payload) = payload {
            let body = serde_json::to_string(payload)
                .map_err(|e| DispatchError::Transport(format!("encode json payload: {e}")))?;
            req = req.body(body);
        }
        if let Some(token) = token {
            req = req.header(api::HEADER_AUTHORIZATION, format!("Bearer {token}"));
        }

        let req = req
            .build()
            .map_err(|e| DispatchError::Transport(format!("build request: {e}")))?;

        let resp = self
            .client
            .execute(req)
            .await
            .map_err(|e| DispatchError::Transport(format!("send request: {e}")))?;

        let status = resp.status();
        debug!("Server responded {method} {url}: {status}");

        let body = resp
            .text()
            .await
            .map_err(|e| DispatchError::Transport(format!("read response body: {e}")))?;

        Ok(Reply {
            status: status.as_u16(),
            body,
        })
    }
}
