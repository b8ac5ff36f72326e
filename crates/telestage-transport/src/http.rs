//! Bot API client over HTTPS.
//!
//! Every call is a `POST {api_url}/bot{token}/{method}` with a JSON body. The
//! response is the Bot API envelope:
//!
//! ```text
//! { "ok": true,  "result": ... }
//! { "ok": false, "error_code": 409, "description": "Conflict: ..." }
//! ```
//!
//! A request's timeout is the configured request timeout plus the `timeout`
//! parameter, if any, so long polls are not cut short. Failed calls are not
//! retried.
//!
//! The token is part of every URL. It is never logged, and URLs are stripped
//! from reqwest errors before they are surfaced.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

use telestage_core::{ApiError, ApiResult, Bot, TransportError, TransportResult};

/// The public Bot API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A Bot API client.
pub struct HttpBot {
    client: Client,
    id: String,
    token: String,
    api_url: String,
    request_timeout: Duration,
}

impl HttpBot {
    /// Creates a client for the public endpoint with the default timeout.
    pub fn new(token: impl Into<String>) -> TransportResult<Self> {
        Self::with_options(token, DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Creates a client for a custom endpoint, such as a local Bot API server.
    pub fn with_options(
        token: impl Into<String>,
        api_url: impl Into<String>,
        request_timeout: Duration,
    ) -> TransportResult<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(TransportError::InvalidConfig("bot token is empty".into()));
        }
        let api_url = api_url.into().trim_end_matches('/').to_string();
        if api_url.is_empty() {
            return Err(TransportError::InvalidConfig("API URL is empty".into()));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            id: bot_id_from_token(&token).to_string(),
            token,
            api_url,
            request_timeout,
        })
    }

    /// Returns the endpoint this client talks to.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    fn timeout_for(&self, params: &Value) -> Duration {
        let poll = params
            .get("timeout")
            .and_then(Value::as_u64)
            .map_or(Duration::ZERO, Duration::from_secs);
        self.request_timeout + poll
    }
}

#[async_trait]
impl Bot for HttpBot {
    fn id(&self) -> &str {
        &self.id
    }

    async fn call_api(&self, method: &str, params: Value) -> ApiResult<Value> {
        let timeout = self.timeout_for(&params);
        trace!(bot_id = %self.id, method, ?timeout, "Calling Bot API");

        let response = self
            .client
            .post(self.method_url(method))
            .json(&params)
            .timeout(timeout)
            .send()
            .await
            .map_err(request_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(request_error)?;

        let result = decode_envelope(status, &body);
        if let Err(err) = &result {
            debug!(bot_id = %self.id, method, status, error = %err, "Bot API call failed");
        }
        result
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl std::fmt::Debug for HttpBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBot")
            .field("id", &self.id)
            .field("api_url", &self.api_url)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

/// The numeric prefix of a token (`123456:ABC...`), or the whole token if it
/// has no colon.
fn bot_id_from_token(token: &str) -> &str {
    token.split_once(':').map_or(token, |(id, _)| id)
}

#[derive(Debug, Deserialize)]
struct Envelope {
    ok: bool,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error_code: Option<i64>,
}

/// Decodes a Bot API response body.
///
/// The API answers errors with a 4xx status and a regular envelope, so the
/// body is decoded before the status is looked at.
fn decode_envelope(status: u16, body: &str) -> ApiResult<Value> {
    match serde_json::from_str::<Envelope>(body) {
        Ok(envelope) if envelope.ok => Ok(envelope.result.unwrap_or(Value::Null)),
        Ok(envelope) => Err(ApiError::Api {
            code: envelope.error_code.unwrap_or(i64::from(status)),
            description: envelope.description.unwrap_or_default(),
        }),
        Err(_) if !(200..300).contains(&status) => Err(TransportError::UnexpectedStatus {
            status,
            body: body.to_string(),
        }
        .into()),
        Err(err) => Err(err.into()),
    }
}

fn request_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else if err.is_connect() {
        ApiError::NotConnected
    } else {
        TransportError::Io(err.without_url().to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn successful_envelope_yields_result() {
        let body = r#"{"ok":true,"result":{"id":1,"is_bot":true,"first_name":"stage"}}"#;
        let value = decode_envelope(200, body).unwrap();
        assert_eq!(value["first_name"], "stage");
    }

    #[test]
    fn error_envelope_becomes_api_error() {
        let body = r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#;
        let err = decode_envelope(400, body).unwrap_err();
        match err {
            ApiError::Api { code, description } => {
                assert_eq!(code, 400);
                assert_eq!(description, "Bad Request: chat not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn error_code_defaults_to_status() {
        let err = decode_envelope(409, r#"{"ok":false}"#).unwrap_err();
        assert!(matches!(err, ApiError::Api { code: 409, .. }));
    }

    #[test]
    fn non_json_error_page_is_unexpected_status() {
        let err = decode_envelope(502, "<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(
            err,
            ApiError::Transport(TransportError::UnexpectedStatus { status: 502, .. })
        ));
    }

    #[test]
    fn garbled_success_body_is_serialization_error() {
        let err = decode_envelope(200, "{not json").unwrap_err();
        assert!(matches!(err, ApiError::Serialization(_)));
    }

    #[test]
    fn id_is_token_prefix() {
        assert_eq!(bot_id_from_token("123456:ABC-DEF"), "123456");
        assert_eq!(bot_id_from_token("opaque"), "opaque");
    }

    #[test]
    fn method_url_includes_token_once() {
        let bot = HttpBot::with_options("42:secret", "http://localhost:8081/", Duration::from_secs(5))
            .unwrap();

        assert_eq!(bot.id(), "42");
        assert_eq!(bot.api_url(), "http://localhost:8081");
        assert_eq!(
            bot.method_url("getMe"),
            "http://localhost:8081/bot42:secret/getMe"
        );
        assert!(!format!("{bot:?}").contains("secret"));
    }

    #[test]
    fn long_poll_extends_timeout() {
        let bot = HttpBot::new("1:t").unwrap();
        assert_eq!(bot.timeout_for(&json!({ "timeout": 30 })), Duration::from_secs(60));
        assert_eq!(bot.timeout_for(&json!({ "chat_id": 1 })), Duration::from_secs(30));
    }

    #[test]
    fn empty_token_is_rejected() {
        assert!(matches!(
            HttpBot::new("  "),
            Err(TransportError::InvalidConfig(_))
        ));
    }
}
