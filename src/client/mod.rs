//! HTTP client for the recipe backend.

mod recipes;
mod users;

pub use users::{Credentials, Signup};

use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::error::{AppError, Result};

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client from configuration
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Self::with_base_url(&config.base_url, Some(config.timeout()))
    }

    /// Create a client for an explicit base URL (e.g. `http://localhost:5000/api`)
    pub fn with_base_url(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout.unwrap_or(Duration::from_secs(30)))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Attach a bearer token to every subsequent request
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub(crate) fn get(&self, endpoint: &str) -> RequestBuilder {
        self.authorize(self.client.get(self.url(endpoint)))
    }

    pub(crate) fn post(&self, endpoint: &str) -> RequestBuilder {
        self.authorize(self.client.post(self.url(endpoint)))
    }

    pub(crate) fn delete(&self, endpoint: &str) -> RequestBuilder {
        self.authorize(self.client.delete(self.url(endpoint)))
    }

    /// Send a request and decode the JSON body
    pub(crate) async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = check_status(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    /// Send a request whose response body is not needed
    pub(crate) async fn execute(&self, request: RequestBuilder) -> Result<()> {
        check_status(request.send().await?).await?;
        Ok(())
    }
}

/// Turn a non-success response into `AppError::Api`
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!("Backend returned {}: {}", status, body);
    Err(AppError::Api {
        status: status.as_u16(),
        message: error_message(status.as_u16(), &body),
    })
}

/// Pick the user-facing message out of an error body
fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => json["message"]
            .as_str()
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP error! status: {}", status)),
        Err(_) => "An error occurred".to_string(),
    }
}
