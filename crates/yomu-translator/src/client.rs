use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use yomu_config::cache::CacheConfig;
use yomu_config::translator::{Backoff, TranslatorConfig};
use yomu_types::SupportedLanguage;

use crate::cache::{CacheKey, TranslationCache};
use crate::normalize::normalize;
use crate::transport::{TranslateRequest, TranslationTransport, TransportError};

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("translator is not initialized")]
    NotInitialized,

    #[error("translator has been disposed")]
    Disposed,

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("connection failed after {attempts} attempt(s): {message}")]
    Connection { attempts: u32, message: String },

    #[error("translation server error: {0}")]
    ServerProtocol(String),
}

/// Caching, retrying front-end over a [`TranslationTransport`].
///
/// Lifecycle: constructed uninitialized; `initialize` probes the server
/// and fetches the language list as one all-or-nothing step; `dispose`
/// retires the client permanently. The language list is written once
/// during `initialize` and read-only afterward, so concurrent
/// `translate` calls share it without contention.
pub struct TranslationClient<T: TranslationTransport> {
    transport: T,
    cache: TranslationCache,
    languages: RwLock<Option<Vec<SupportedLanguage>>>,
    disposed: AtomicBool,
    max_retries: u32,
    retry_delay: Duration,
    backoff: Backoff,
}

impl<T: TranslationTransport> TranslationClient<T> {
    pub fn new(transport: T, translator: &TranslatorConfig, cache: &CacheConfig) -> Self {
        Self {
            transport,
            cache: TranslationCache::new(cache.capacity, Duration::from_secs(cache.ttl_secs)),
            languages: RwLock::new(None),
            disposed: AtomicBool::new(false),
            max_retries: translator.max_retries.max(1),
            retry_delay: Duration::from_millis(translator.retry_delay_ms),
            backoff: translator.backoff,
        }
    }

    /// Reachability check, then language fetch. Fails without becoming
    /// partially initialized: the language list is only stored once
    /// both steps have succeeded.
    pub async fn initialize(&self) -> Result<(), TranslateError> {
        self.ensure_not_disposed()?;

        self.transport.ping().await.map_err(|e| connection(1, e))?;

        let languages = match self.transport.fetch_languages().await {
            Ok(languages) => languages,
            Err(TransportError::Protocol(msg)) => return Err(TranslateError::ServerProtocol(msg)),
            Err(e) => return Err(connection(1, e)),
        };

        tracing::info!(count = languages.len(), "translation service ready");
        *self.languages.write().unwrap_or_else(|e| e.into_inner()) = Some(languages);
        Ok(())
    }

    pub async fn translate(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<String, TranslateError> {
        self.ensure_not_disposed()?;
        self.validate_languages(from, to)?;

        // Empty input short-circuits: no cache lookup, no network.
        let normalized = normalize(text);
        if normalized.is_empty() {
            return Ok(String::new());
        }

        let key = CacheKey::new(from, to, &normalized);
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(from, to, "cache hit");
            return Ok(cached);
        }

        let request = TranslateRequest {
            q: normalized,
            source: from.to_string(),
            target: to.to_string(),
        };

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.transport.translate(&request).await {
                Ok(result) => {
                    self.cache.put(key, result.clone());
                    return Ok(result);
                }
                Err(TransportError::Protocol(msg)) => {
                    return Err(TranslateError::ServerProtocol(msg));
                }
                Err(e @ TransportError::Network(_)) => {
                    if attempt >= self.max_retries {
                        return Err(connection(attempt, e));
                    }
                    tracing::warn!(attempt, error = %e, "translate attempt failed, retrying");
                    tokio::time::sleep(self.delay_for(attempt)).await;
                }
            }
        }
    }

    /// Language list fetched at initialization.
    pub fn supported_languages(&self) -> Result<Vec<SupportedLanguage>, TranslateError> {
        self.ensure_not_disposed()?;
        self.languages
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or(TranslateError::NotInitialized)
    }

    /// Retires the client. Every later operation fails with `Disposed`.
    /// Safe to call concurrently with in-flight translations; those
    /// complete, new calls are rejected.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
        self.cache.clear();
    }

    fn ensure_not_disposed(&self) -> Result<(), TranslateError> {
        if self.disposed.load(Ordering::SeqCst) {
            Err(TranslateError::Disposed)
        } else {
            Ok(())
        }
    }

    fn validate_languages(&self, from: &str, to: &str) -> Result<(), TranslateError> {
        let languages = self.languages.read().unwrap_or_else(|e| e.into_inner());
        let languages = languages.as_ref().ok_or(TranslateError::NotInitialized)?;

        for code in [from, to] {
            if !languages.iter().any(|l| l.code == code) {
                return Err(TranslateError::UnsupportedLanguage(code.to_string()));
            }
        }
        Ok(())
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Constant => self.retry_delay,
            Backoff::Exponential => self.retry_delay * 2u32.saturating_pow(attempt - 1),
        }
    }
}

fn connection(attempts: u32, error: TransportError) -> TranslateError {
    TranslateError::Connection {
        attempts,
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;

    use super::*;

    /// Scripted transport: fails the first `fail_attempts` translate
    /// calls with a network error, then succeeds by echoing the input
    /// uppercased. Counts every call.
    struct StubTransport {
        languages: Vec<SupportedLanguage>,
        fail_attempts: usize,
        protocol_error: bool,
        translate_calls: AtomicUsize,
        last_request: Mutex<Option<TranslateRequest>>,
    }

    impl StubTransport {
        fn new() -> Self {
            Self {
                languages: vec![
                    SupportedLanguage {
                        code: "en".into(),
                        name: "English".into(),
                    },
                    SupportedLanguage {
                        code: "ja".into(),
                        name: "Japanese".into(),
                    },
                ],
                fail_attempts: 0,
                protocol_error: false,
                translate_calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            }
        }

        fn failing_first(fail_attempts: usize) -> Self {
            Self {
                fail_attempts,
                ..Self::new()
            }
        }

        fn calls(&self) -> usize {
            self.translate_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TranslationTransport for StubTransport {
        async fn ping(&self) -> Result<(), TransportError> {
            Ok(())
        }

        async fn fetch_languages(&self) -> Result<Vec<SupportedLanguage>, TransportError> {
            Ok(self.languages.clone())
        }

        async fn translate(&self, request: &TranslateRequest) -> Result<String, TransportError> {
            let call = self.translate_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());

            if self.protocol_error {
                return Err(TransportError::Protocol("garbage body".into()));
            }
            if call < self.fail_attempts {
                return Err(TransportError::Network("connection refused".into()));
            }
            Ok(request.q.to_uppercase())
        }
    }

    fn config() -> TranslatorConfig {
        TranslatorConfig {
            max_retries: 3,
            retry_delay_ms: 1,
            ..TranslatorConfig::default()
        }
    }

    async fn ready_client(transport: StubTransport) -> TranslationClient<StubTransport> {
        let client = TranslationClient::new(transport, &config(), &CacheConfig::default());
        client.initialize().await.expect("initialize failed");
        client
    }

    #[tokio::test]
    async fn translate_before_initialize_fails() {
        let client =
            TranslationClient::new(StubTransport::new(), &config(), &CacheConfig::default());
        let err = client.translate("hello", "en", "ja").await.unwrap_err();
        assert!(matches!(err, TranslateError::NotInitialized));
        assert!(matches!(
            client.supported_languages().unwrap_err(),
            TranslateError::NotInitialized
        ));
    }

    #[tokio::test]
    async fn second_translate_is_served_from_cache() {
        let client = ready_client(StubTransport::new()).await;

        let first = client.translate("hello", "en", "ja").await.unwrap();
        let second = client.translate("hello", "en", "ja").await.unwrap();

        assert_eq!(first, "HELLO");
        assert_eq!(second, first);
        assert_eq!(client.transport.calls(), 1);
    }

    #[tokio::test]
    async fn normalization_unifies_cache_keys() {
        let client = ready_client(StubTransport::new()).await;

        client.translate("hello\nworld", "en", "ja").await.unwrap();
        client.translate("  hello   world ", "en", "ja").await.unwrap();

        assert_eq!(client.transport.calls(), 1);
        let sent = client.transport.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(sent.q, "hello world");
    }

    #[tokio::test]
    async fn empty_input_returns_empty_without_network() {
        let client = ready_client(StubTransport::new()).await;
        assert_eq!(client.translate("", "en", "ja").await.unwrap(), "");
        assert_eq!(client.translate("  \n ", "en", "ja").await.unwrap(), "");
        assert_eq!(client.transport.calls(), 0);
    }

    #[tokio::test]
    async fn unknown_language_is_rejected() {
        let client = ready_client(StubTransport::new()).await;
        let err = client.translate("hello", "en", "xx").await.unwrap_err();
        match err {
            TranslateError::UnsupportedLanguage(code) => assert_eq!(code, "xx"),
            other => panic!("expected UnsupportedLanguage, got {other:?}"),
        }
        assert_eq!(client.transport.calls(), 0);
    }

    #[tokio::test]
    async fn succeeds_on_final_retry() {
        let client = ready_client(StubTransport::failing_first(2)).await;
        let result = client.translate("hello", "en", "ja").await.unwrap();
        assert_eq!(result, "HELLO");
        assert_eq!(client.transport.calls(), 3);
    }

    #[tokio::test]
    async fn exhausted_retries_fail_with_connection_error() {
        let client = ready_client(StubTransport::failing_first(99)).await;
        let err = client.translate("hello", "en", "ja").await.unwrap_err();
        match err {
            TranslateError::Connection { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("expected Connection, got {other:?}"),
        }
        assert_eq!(client.transport.calls(), 3);
    }

    #[tokio::test]
    async fn protocol_errors_are_not_retried() {
        let mut transport = StubTransport::new();
        transport.protocol_error = true;
        let client = ready_client(transport).await;

        let err = client.translate("hello", "en", "ja").await.unwrap_err();
        assert!(matches!(err, TranslateError::ServerProtocol(_)));
        assert_eq!(client.transport.calls(), 1);
    }

    #[tokio::test]
    async fn disposed_client_rejects_everything() {
        let client = ready_client(StubTransport::new()).await;
        client.dispose();

        assert!(matches!(
            client.translate("hello", "en", "ja").await.unwrap_err(),
            TranslateError::Disposed
        ));
        assert!(matches!(
            client.supported_languages().unwrap_err(),
            TranslateError::Disposed
        ));
        assert!(matches!(
            client.initialize().await.unwrap_err(),
            TranslateError::Disposed
        ));
    }

    #[tokio::test]
    async fn supported_languages_match_fetch() {
        let client = ready_client(StubTransport::new()).await;
        let languages = client.supported_languages().unwrap();
        assert_eq!(languages.len(), 2);
        assert!(languages.iter().any(|l| l.code == "ja"));
    }
}
