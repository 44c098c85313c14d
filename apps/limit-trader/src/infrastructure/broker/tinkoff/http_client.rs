//! HTTP client wrapper for the Tinkoff OpenAPI.
//!
//! One call, one request: rate-limit retries happen a level up so that the
//! adapter can log progress between waits.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::api_types::{Envelope, ErrorPayload};
use super::config::TinkoffConfig;
use super::error::TinkoffError;
use crate::broker::parse_retry_after;

/// HTTP client for the Tinkoff OpenAPI.
#[derive(Debug, Clone)]
pub struct TinkoffHttpClient {
    client: Client,
    token: String,
    base_url: String,
    broker_account_id: Option<String>,
}

impl TinkoffHttpClient {
    /// Create a new HTTP client from config.
    pub fn new(config: &TinkoffConfig) -> Result<Self, TinkoffError> {
        if config.token.trim().is_empty() {
            return Err(TinkoffError::MissingToken);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .map_err(|e| TinkoffError::Network(e.to_string()))?;

        Ok(Self {
            client,
            token: config.token.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            broker_account_id: config.broker_account_id.clone(),
        })
    }

    /// GET `path` and return the envelope payload.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, TinkoffError> {
        let request = self.client.get(self.url(path));
        self.send(path, self.authorize(request, query)).await
    }

    /// POST `body` (if any) to `path` and return the envelope payload.
    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<T, TinkoffError> {
        let mut request = self.client.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(path, self.authorize(request, query)).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder, query: &[(&str, &str)]) -> RequestBuilder {
        let mut request = request.bearer_auth(&self.token).query(query);
        if let Some(account) = &self.broker_account_id {
            request = request.query(&[("brokerAccountId", account.as_str())]);
        }
        request
    }

    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, TinkoffError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TinkoffError::Timeout(path.to_string())
            } else {
                TinkoffError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after);

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                TinkoffError::Timeout(path.to_string())
            } else {
                TinkoffError::Network(e.to_string())
            }
        })?;

        if status.is_success() {
            let envelope: Envelope<T> =
                serde_json::from_str(&body).map_err(|e| TinkoffError::JsonParse(e.to_string()))?;
            return Ok(envelope.payload);
        }

        let error = serde_json::from_str::<Envelope<ErrorPayload>>(&body)
            .map(|envelope| envelope.payload)
            .unwrap_or_else(|_| ErrorPayload {
                message: body.clone(),
                code: String::new(),
            });

        tracing::debug!(
            path,
            status = status.as_u16(),
            code = %error.code,
            message = %error.message,
            "Tinkoff request failed"
        );

        Err(categorize_status(status, retry_after, error))
    }
}

/// Map a non-success status to an adapter error.
fn categorize_status(
    status: StatusCode,
    retry_after_secs: Option<u64>,
    error: ErrorPayload,
) -> TinkoffError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => TinkoffError::RateLimited { retry_after_secs },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => TinkoffError::AuthenticationFailed,
        _ => TinkoffError::Api {
            status: status.as_u16(),
            code: error.code,
            message: error.message,
        },
    }
}
