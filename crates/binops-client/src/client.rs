//! HTTP client for the fleet-operations REST backend.
//!
//! Wraps `reqwest` with bearer authentication, envelope unwrapping and typed
//! error extraction. Every non-2xx answer becomes [`ClientError::Api`]
//! carrying the backend's human-readable message, which callers pattern-match
//! to detect route conflicts.

use std::sync::Arc;
use std::time::Duration;

use binops_core::{AppConfig, CredentialProvider, NoCredentials, StaticToken};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ClientError;

/// Client for the backend REST API.
///
/// Use [`BinopsClient::from_config`] for production or
/// [`BinopsClient::with_base_url`] to point at a mock server in tests.
pub struct BinopsClient {
    client: Client,
    base_url: Url,
    credentials: Arc<dyn CredentialProvider>,
}

impl BinopsClient {
    /// Builds a client from application configuration, using the configured
    /// token (if any) as a static bearer credential.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if the
    /// configured URL does not parse.
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        let credentials: Arc<dyn CredentialProvider> = match &config.api_token {
            Some(token) => Arc::new(StaticToken::new(token.clone())),
            None => Arc::new(NoCredentials),
        };
        Self::with_base_url(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
            credentials,
        )
    }

    /// Creates a client with an explicit base URL and credential provider.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash; `endpoint` pops the empty segment
        // before appending route segments.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    /// Resolves a route relative to the base URL. Each segment is
    /// percent-encoded, so ids never alter the path structure.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot be a base".to_owned(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        match self.credentials.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, ClientError> {
        let body = self.execute(self.request(Method::GET, url), context).await?;
        decode(body, context)
    }

    pub(crate) async fn send_json<B, T>(
        &self,
        method: Method,
        url: Url,
        payload: &B,
        context: &str,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self
            .execute(self.request(method, url).json(payload), context)
            .await?;
        decode(body, context)
    }

    /// Like [`Self::send_json`] but ignores the response body.
    pub(crate) async fn send_unit<B>(
        &self,
        method: Method,
        url: Url,
        payload: &B,
        context: &str,
    ) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized,
    {
        self.execute(self.request(method, url).json(payload), context)
            .await?;
        Ok(())
    }

    /// Sends the request and returns the raw body of a 2xx response.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] on transport failure and
    /// [`ClientError::Api`] for any non-2xx status.
    async fn execute(&self, request: RequestBuilder, context: &str) -> Result<String, ClientError> {
        tracing::debug!(context, "backend request");
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = extract_error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_owned()
            });
            tracing::debug!(
                context,
                status = status.as_u16(),
                %message,
                "backend rejected request"
            );
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(body)
    }
}

/// Parses a 2xx body, unwrapping a `{"data": …}` envelope when present.
fn decode<T: DeserializeOwned>(body: String, context: &str) -> Result<T, ClientError> {
    let value: serde_json::Value =
        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: context.to_owned(),
            source: e,
        })?;
    let inner = match value {
        serde_json::Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(serde_json::Value::Null)
        }
        other => other,
    };
    serde_json::from_value(inner).map_err(|e| ClientError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}

/// Pulls the human-readable message out of an error body.
///
/// Looks at `error`, `message` and `detail` (string or `{ "message": … }`),
/// then falls back to the trimmed raw body. Returns `None` for an empty body.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message", "detail"] {
            match map.get(key) {
                Some(serde_json::Value::String(s)) if !s.trim().is_empty() => {
                    return Some(s.trim().to_owned());
                }
                Some(serde_json::Value::Object(inner)) => {
                    if let Some(s) = inner.get("message").and_then(serde_json::Value::as_str) {
                        return Some(s.trim().to_owned());
                    }
                }
                _ => {}
            }
        }
    }
    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
