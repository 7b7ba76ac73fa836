//! Async LibreTranslate client façade

use bytes::Bytes;
use reqwest::{Method, Url};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::errors::{Error, Result};
use crate::models::{Format, FrontendSetting, Language, TranslateRequest, TranslatedText};
use crate::request::RequestExecutor;
use crate::retry::RetryPolicy;

/// Async client for a LibreTranslate instance
///
/// Holds the frozen configuration, the pooled HTTP transport and the
/// precomputed endpoint URLs. Cloning is cheap and clones share the
/// connection pool; because nothing is mutable after construction, one
/// client can serve any number of concurrent tasks.
///
/// Each operation takes a [`CancellationToken`]; pass a fresh token when a
/// call does not need to be aborted, or wrap the returned future in
/// `tokio::time::timeout` to enforce a deadline.
#[derive(Debug, Clone)]
pub struct LibreTranslate {
    config: ClientConfig,
    executor: RequestExecutor,
    language_url: Url,
    frontend_setting_url: Url,
    translate_url: Url,
}

impl LibreTranslate {
    /// Create a client from a configuration
    ///
    /// Fails when the base URL is empty or unparsable, or when the HTTP
    /// transport cannot be built. Retry and timeout behavior are fixed here
    /// for the lifetime of the client.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let base = config.base_url.trim_end_matches('/').to_string();
        let language_url = parse_endpoint(&base, "languages")?;
        let frontend_setting_url = parse_endpoint(&base, "frontend/settings")?;
        let translate_url = parse_endpoint(&base, "translate")?;

        let http = reqwest::Client::builder()
            .timeout(config.conn_timeout)
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| Error::Config {
                message: format!("building HTTP client: {e}"),
            })?;

        let executor = RequestExecutor::new(http, RetryPolicy::from_config(&config));

        Ok(Self {
            config,
            executor,
            language_url,
            frontend_setting_url,
            translate_url,
        })
    }

    /// Create a client from the `LIBRETRANSLATE_*` environment variables
    pub fn from_env() -> Result<Self> {
        let config = ClientConfig::from_env()?;
        Self::new(config)
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch the languages the instance can translate between, in server
    /// order
    pub async fn get_languages(&self, cancel: &CancellationToken) -> Result<Vec<Language>> {
        let body = self.get(&self.language_url, cancel).await?;
        let languages = serde_json::from_slice(&body)?;
        Ok(languages)
    }

    /// Fetch the frontend configuration snapshot
    pub async fn get_frontend_setting(
        &self,
        cancel: &CancellationToken,
    ) -> Result<FrontendSetting> {
        let body = self.get(&self.frontend_setting_url, cancel).await?;
        let setting = serde_json::from_slice(&body)?;
        Ok(setting)
    }

    /// Translate plain text between two language codes
    pub async fn translate(
        &self,
        cancel: &CancellationToken,
        q: &str,
        source: &str,
        target: &str,
    ) -> Result<String> {
        self.translate_with_format(cancel, q, source, target, Format::Text)
            .await
    }

    /// Translate text in the given format between two language codes
    ///
    /// [`Format::Html`] keeps markup intact and translates only the text
    /// content.
    pub async fn translate_with_format(
        &self,
        cancel: &CancellationToken,
        q: &str,
        source: &str,
        target: &str,
        format: Format,
    ) -> Result<String> {
        let params = TranslateRequest::new(q, source, target)
            .with_format(format)
            .with_api_key(self.config.api_key.clone());
        let payload = serde_json::to_vec(&params)?;

        let body = self
            .post(&self.translate_url, Bytes::from(payload), cancel)
            .await?;

        let translated: TranslatedText = serde_json::from_slice(&body)?;
        Ok(translated.text)
    }

    /// Issue a GET and return the raw success body
    async fn get(&self, url: &Url, cancel: &CancellationToken) -> Result<Bytes> {
        self.executor.execute(Method::GET, url, None, cancel).await
    }

    /// Issue a JSON POST and return the raw success body
    async fn post(&self, url: &Url, body: Bytes, cancel: &CancellationToken) -> Result<Bytes> {
        self.executor
            .execute(Method::POST, url, Some(body), cancel)
            .await
    }
}

/// Build an absolute endpoint URL under the configured base
fn parse_endpoint(base: &str, path: &str) -> Result<Url> {
    let raw = format!("{base}/{path}");
    Url::parse(&raw).map_err(|e| Error::Config {
        message: format!("invalid base url {raw}: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Client with millisecond backoff pointed at the given mock server
    fn test_client(server: &MockServer) -> LibreTranslate {
        let config = ClientConfig::new(server.uri())
            .with_retry_wait(Duration::from_millis(1), Duration::from_millis(2));
        LibreTranslate::new(config).unwrap()
    }

    #[test]
    fn test_invalid_base_url_rejected_at_construction() {
        let err = LibreTranslate::new(ClientConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        let err = LibreTranslate::new(ClientConfig::new("")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[tokio::test]
    async fn test_get_languages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/languages"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "code": "en", "name": "English" },
                { "code": "es", "name": "Spanish" }
            ])))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let languages = client
            .get_languages(&CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(languages.len(), 2);
        assert_eq!(
            languages[0],
            Language {
                code: "en".to_string(),
                name: "English".to_string()
            }
        );
        assert_eq!(languages[1].code, "es");
    }

    #[tokio::test]
    async fn test_get_frontend_setting() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/frontend/settings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "apiKeys": false,
                "keyRequired": false,
                "suggestions": true,
                "charLimit": 5000,
                "frontendTimeout": 500,
                "language": {
                    "source": { "code": "en", "name": "English" },
                    "target": { "code": "es", "name": "Spanish" }
                },
                "supportedFilesFormat": [".txt", ".odt"]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let setting = client
            .get_frontend_setting(&CancellationToken::new())
            .await
            .unwrap();

        assert!(setting.char_limit > 0);
        assert_eq!(setting.char_limit, 5000);
        assert!(setting.suggestions);
        assert_eq!(setting.language.source.code, "en");
        assert_eq!(setting.language.target.code, "es");
        assert_eq!(setting.supported_files_format, vec![".txt", ".odt"]);
    }

    #[tokio::test]
    async fn test_translate_posts_expected_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translate"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "q": "hello",
                "source": "en",
                "target": "es",
                "format": "text",
                "api_key": "secret"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "translatedText": "hola" })),
            )
            .mount(&server)
            .await;

        let config = ClientConfig::new(server.uri()).with_api_key("secret");
        let client = LibreTranslate::new(config).unwrap();

        let translated = client
            .translate(&CancellationToken::new(), "hello", "en", "es")
            .await
            .unwrap();

        assert_eq!(translated, "hola");
    }

    #[tokio::test]
    async fn test_translate_html_format() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translate"))
            .and(body_json(json!({
                "q": "<b>hello</b>",
                "source": "en",
                "target": "es",
                "format": "html",
                "api_key": ""
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "translatedText": "<b>hola</b>" })),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        let translated = client
            .translate_with_format(
                &CancellationToken::new(),
                "<b>hello</b>",
                "en",
                "es",
                Format::Html,
            )
            .await
            .unwrap();

        assert_eq!(translated, "<b>hola</b>");
    }

    #[tokio::test]
    async fn test_server_error_exhausts_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/languages"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client
            .get_languages(&CancellationToken::new())
            .await
            .unwrap_err();

        // The exhaustion error carries the request URL
        assert!(err.to_string().contains("/languages"));
        match err {
            Error::RetriesExhausted { attempts, .. } => assert_eq!(attempts, 6),
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }

        // Default ceiling of 5 retries: one initial attempt plus five more
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 6);
    }

    #[tokio::test]
    async fn test_client_error_fails_immediately_with_remote_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translate"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({ "error": "invalid target language" })),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client
            .translate(&CancellationToken::new(), "hello", "en", "xx")
            .await
            .unwrap_err();

        // The server message surfaces verbatim
        assert_eq!(err.to_string(), "invalid target language");
        match err {
            Error::Remote { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "invalid target language");
            }
            other => panic!("expected Remote, got {other:?}"),
        }

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_before_call_performs_no_io() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/languages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        cancel.cancel();

        let client = test_client(&server);
        let err = client.get_languages(&cancel).await.unwrap_err();

        assert!(matches!(err, Error::Cancelled));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_during_backoff_aborts_pending_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/languages"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        // Long backoff so the first retry is still pending when the token
        // fires
        let config = ClientConfig::new(server.uri())
            .with_retry_wait(Duration::from_secs(30), Duration::from_secs(60));
        let client = LibreTranslate::new(config).unwrap();

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let err = client.get_languages(&cancel).await.unwrap_err();

        assert!(matches!(err, Error::Cancelled));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_retry_max_zero_disables_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/languages"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let config = ClientConfig::new(server.uri()).with_retry_max(0);
        let client = LibreTranslate::new(config).unwrap();

        let err = client
            .get_languages(&CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            Error::RetriesExhausted { attempts, .. } => assert_eq!(attempts, 1),
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_too_many_requests_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/languages"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/languages"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{ "code": "en", "name": "English" }])),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        let languages = client
            .get_languages(&CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(languages.len(), 1);
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_not_implemented_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/frontend/settings"))
            .respond_with(
                ResponseTemplate::new(501).set_body_json(json!({ "error": "not implemented" })),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client
            .get_frontend_setting(&CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            Error::Remote { status, message } => {
                assert_eq!(status, 501);
                assert_eq!(message, "not implemented");
            }
            other => panic!("expected Remote, got {other:?}"),
        }
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/languages"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client
            .get_languages(&CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Json(_)));
    }

    #[tokio::test]
    async fn test_malformed_error_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/languages"))
            .respond_with(ResponseTemplate::new(403).set_body_string("<html>forbidden</html>"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client
            .get_languages(&CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Json(_)));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_connection_failure_exhausts_retries() {
        // Grab a port with nothing listening on it
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let config = ClientConfig::new(url)
            .with_retry_max(2)
            .with_conn_timeout(Duration::from_millis(500))
            .with_retry_wait(Duration::from_millis(1), Duration::from_millis(2));
        let client = LibreTranslate::new(config).unwrap();

        let err = client
            .get_languages(&CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            Error::RetriesExhausted { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/languages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let config = ClientConfig::new(format!("{}/", server.uri()))
            .with_retry_wait(Duration::from_millis(1), Duration::from_millis(2));
        let client = LibreTranslate::new(config).unwrap();

        let languages = client
            .get_languages(&CancellationToken::new())
            .await
            .unwrap();
        assert!(languages.is_empty());
    }
}
