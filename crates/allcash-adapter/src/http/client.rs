/*
[INPUT]:  API key, demo flag, HTTP configuration (base URL, timeouts)
[OUTPUT]: Configured reqwest client and the single request dispatch path
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing dispatch behavior
*/

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, error, info, warn};
use url::{ParseError, Url};

use crate::http::routing::resolve_endpoint;
use crate::http::{AllcashError, Result};
use crate::types::{JsonMap, Payload};

/// Base URL for the AllCash broker API
pub const DEFAULT_BASE_URL: &str = "https://allcash.site/api/v1.1";

pub(crate) const DEMO_FLAG: &str = "isDemo";
const ERROR_FIELD: &str = "error";
const BODY_LOG_MAX_BYTES: usize = 1024;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Point the client at another host (staging, mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Main HTTP client for the AllCash broker API
#[derive(Debug)]
pub struct AllcashClient {
    http_client: Client,
    base_url: String,
    demo_mode: bool,
}

impl AllcashClient {
    /// Create a new client against the official API host
    pub fn new(api_key: impl AsRef<str>, demo_mode: bool) -> Result<Self> {
        Self::with_config(api_key, demo_mode, ClientConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// The API key is sent verbatim as the `Authorization` header, so it must
    /// already carry any scheme prefix the broker expects.
    pub fn with_config(
        api_key: impl AsRef<str>,
        demo_mode: bool,
        config: ClientConfig,
    ) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if Url::parse(&base_url)?.cannot_be_a_base() {
            return Err(AllcashError::Config(format!(
                "base URL {base_url} cannot carry endpoint paths"
            )));
        }

        let mut authorization = HeaderValue::from_str(api_key.as_ref())
            .map_err(|e| AllcashError::Config(format!("API key is not a valid header value: {e}")))?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http_client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| AllcashError::Config(format!("failed to build HTTP client: {e}")))?;

        if demo_mode {
            info!(base_url = %base_url, "API initialized in DEMO mode");
        } else {
            warn!(base_url = %base_url, "API initialized in LIVE trading mode");
        }

        Ok(Self {
            http_client,
            base_url,
            demo_mode,
        })
    }

    pub fn is_demo(&self) -> bool {
        self.demo_mode
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build full URL for an endpoint, after legacy route rewriting
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        let url = Url::parse(&format!("{}{}", self.base_url, resolve_endpoint(endpoint)))?;
        Ok(url)
    }

    /// Build a URL from the base plus one path segment per element.
    ///
    /// Each segment is percent-encoded on its own, so `/`, `?`, `#` and `%`
    /// inside an order id or symbol stay part of that segment. Empty, `.` and
    /// `..` segments are rejected.
    pub fn segments_url(&self, segments: &[&str]) -> Result<Url> {
        if let Some(segment) = segments
            .iter()
            .find(|segment| matches!(**segment, "" | "." | ".."))
        {
            return Err(AllcashError::InvalidArgument(format!(
                "invalid path segment {segment:?}"
            )));
        }

        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send one request and decode the JSON object it returns.
    ///
    /// GET payloads become query parameters; POST, PUT and DELETE payloads are
    /// sent as a JSON body. In demo mode POST and PUT payloads always carry
    /// `isDemo: true` unless the caller set the key already.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<Payload>,
    ) -> Result<JsonMap> {
        let url = self.endpoint_url(endpoint)?;
        self.dispatch(method, url, payload).await
    }

    /// Same as [`AllcashClient::request`] for a path built with
    /// [`AllcashClient::segments_url`]; no legacy rewriting applies.
    pub async fn request_segments(
        &self,
        method: Method,
        segments: &[&str],
        payload: Option<Payload>,
    ) -> Result<JsonMap> {
        let url = self.segments_url(segments)?;
        self.dispatch(method, url, payload).await
    }

    async fn dispatch(
        &self,
        method: Method,
        url: Url,
        payload: Option<Payload>,
    ) -> Result<JsonMap> {
        if !matches!(
            method,
            Method::GET | Method::POST | Method::PUT | Method::DELETE
        ) {
            error!(method = %method, url = %url, "unsupported HTTP method");
            return Err(AllcashError::InvalidArgument(format!(
                "Unsupported HTTP method: {method}"
            )));
        }

        let payload = self.prepare_payload(&method, payload);
        let payload_log = describe_payload(payload.as_ref());

        let mut builder = self.http_client.request(method.clone(), url.clone());
        if let Some(body) = payload.as_ref() {
            builder = if method == Method::GET {
                builder.query(&query_pairs(body))
            } else {
                builder.json(body)
            };
        }

        debug!(method = %method, url = %url, payload = %payload_log, "sending API request");

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                error!(
                    method = %method,
                    url = %url,
                    payload = %payload_log,
                    error = %err,
                    "API request error"
                );
                return Err(AllcashError::Http(err));
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                error!(
                    method = %method,
                    url = %url,
                    status = status.as_u16(),
                    error = %err,
                    "failed to read API response body"
                );
                return Err(AllcashError::Http(err));
            }
        };

        if !status.is_success() {
            error!(
                method = %method,
                url = %url,
                payload = %payload_log,
                status = status.as_u16(),
                body = %truncate_for_log(&body, BODY_LOG_MAX_BYTES),
                "API returned error status"
            );
            return Err(AllcashError::http_status(status, body));
        }

        let result = match decode_body(&body) {
            Ok(result) => result,
            Err(err) => {
                error!(
                    method = %method,
                    url = %url,
                    payload = %payload_log,
                    body = %truncate_for_log(&body, BODY_LOG_MAX_BYTES),
                    error = %err,
                    "invalid JSON response from API"
                );
                return Err(err);
            }
        };

        if let Some(broker_error) = result.get(ERROR_FIELD).filter(|value| !value.is_null()) {
            let err = AllcashError::broker(broker_error);
            error!(
                method = %method,
                url = %url,
                payload = %payload_log,
                body = %truncate_for_log(&body, BODY_LOG_MAX_BYTES),
                error = %err,
                "API reported an error"
            );
            return Err(err);
        }

        debug!(method = %method, url = %url, status = status.as_u16(), "API request succeeded");
        Ok(result)
    }

    fn prepare_payload(&self, method: &Method, payload: Option<Payload>) -> Option<Payload> {
        let mutating = *method == Method::POST || *method == Method::PUT;
        if !(mutating && self.demo_mode) {
            return payload;
        }
        let mut payload = payload.unwrap_or_default();
        payload.entry(DEMO_FLAG).or_insert(Value::Bool(true));
        Some(payload)
    }
}

fn decode_body(body: &str) -> Result<JsonMap> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(AllcashError::Decode {
            message: format!("expected a JSON object, got {}", json_type_name(&other)),
            body: body.to_string(),
        }),
        Err(err) => Err(AllcashError::Decode {
            message: err.to_string(),
            body: body.to_string(),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Flatten a payload into query pairs; nulls are dropped
fn query_pairs(payload: &Payload) -> Vec<(String, String)> {
    payload
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), rendered)
        })
        .collect()
}

fn describe_payload(payload: Option<&Payload>) -> String {
    match payload {
        Some(map) => truncate_for_log(&Value::Object(map.clone()).to_string(), BODY_LOG_MAX_BYTES),
        None => "null".to_string(),
    }
}

fn truncate_for_log(value: &str, max_len: usize) -> String {
    if value.len() <= max_len {
        return value.to_string();
    }
    let mut end = max_len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = String::with_capacity(end + 3);
    out.push_str(&value[..end]);
    out.push_str("...");
    out
}
