use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use yomu_types::SupportedLanguage;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection-level failure; safe to retry.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered, but not with anything usable. Not retried.
    #[error("malformed response: {0}")]
    Protocol(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslateRequest {
    pub q: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// Wire-level translation backend. The HTTP implementation talks to a
/// LibreTranslate-style service; tests substitute counting stubs.
#[async_trait]
pub trait TranslationTransport: Send + Sync {
    /// Cheap reachability probe, used once during client initialization.
    async fn ping(&self) -> Result<(), TransportError>;

    async fn fetch_languages(&self) -> Result<Vec<SupportedLanguage>, TransportError>;

    async fn translate(&self, request: &TranslateRequest) -> Result<String, TransportError>;
}

pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl TranslationTransport for HttpTransport {
    async fn ping(&self) -> Result<(), TransportError> {
        // Any HTTP response proves the server is there; only a failure
        // to connect at all counts as unreachable.
        self.client
            .get(&self.base_url)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(())
    }

    async fn fetch_languages(&self) -> Result<Vec<SupportedLanguage>, TransportError> {
        let response = self
            .client
            .get(self.endpoint("languages"))
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TransportError::Protocol(format!(
                "languages endpoint returned HTTP {}",
                response.status()
            )));
        }

        response
            .json::<Vec<SupportedLanguage>>()
            .await
            .map_err(|e| TransportError::Protocol(e.to_string()))
    }

    async fn translate(&self, request: &TranslateRequest) -> Result<String, TransportError> {
        let response = self
            .client
            .post(self.endpoint("translate"))
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TransportError::Protocol(format!(
                "translate endpoint returned HTTP {}",
                response.status()
            )));
        }

        let body = response
            .json::<TranslateResponse>()
            .await
            .map_err(|e| TransportError::Protocol(e.to_string()))?;

        if body.translated_text.is_empty() {
            return Err(TransportError::Protocol(
                "empty translation in response".to_string(),
            ));
        }

        Ok(body.translated_text)
    }
}
