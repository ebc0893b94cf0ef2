//! Injected translation capability. The core never depends on any
//! vendor's request/response shape; the remote service is an opaque
//! endpoint taking `(text, targetLanguage)` and returning a translation.

use crate::APP_USER_AGENT;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("no translation endpoint configured")]
    NotConfigured,

    #[error("request failed: {0}")]
    Request(String),

    #[error("endpoint returned {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoteRequest<'a> {
    text: &'a str,
    target_language: &'a str,
}

#[derive(Deserialize)]
struct RemoteResponse {
    translation: String,
}

#[derive(Debug, Clone)]
pub struct Translator {
    endpoint: Option<String>,
    client: Client,
}

impl Translator {
    /// Build a translator; with no endpoint every call fails with
    /// [`TranslateError::NotConfigured`].
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(endpoint: Option<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().user_agent(APP_USER_AGENT).build()?;

        Ok(Self { endpoint, client })
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self {
            endpoint: None,
            client: Client::new(),
        }
    }

    /// Translate `text` into `target_language` via the remote endpoint.
    /// # Errors
    /// Returns a typed failure when unconfigured, on transport errors, or
    /// on a non-success status.
    #[instrument(skip(self, text))]
    pub async fn translate(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<String, TranslateError> {
        let Some(endpoint) = &self.endpoint else {
            return Err(TranslateError::NotConfigured);
        };

        let response = self
            .client
            .post(endpoint)
            .json(&RemoteRequest {
                text,
                target_language,
            })
            .send()
            .await
            .map_err(|err| TranslateError::Request(err.to_string()))?;

        if !response.status().is_success() {
            return Err(TranslateError::Status(response.status()));
        }

        let body: RemoteResponse = response
            .json()
            .await
            .map_err(|err| TranslateError::Request(err.to_string()))?;

        debug!("translated {} characters", body.translation.len());

        Ok(body.translation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_translator_is_not_configured() {
        let translator = Translator::disabled();
        let err = translator.translate("hello", "eo").await.unwrap_err();
        assert!(matches!(err, TranslateError::NotConfigured));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_request_error() {
        // Grab a free port, then close it so the connection is refused
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let translator =
            Translator::new(Some(format!("http://127.0.0.1:{port}/translate"))).unwrap();
        let err = translator.translate("hello", "eo").await.unwrap_err();
        assert!(matches!(err, TranslateError::Request(_)));
    }
}
