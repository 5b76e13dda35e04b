//! IGameServersService HTTP client.
//!
//! Every call carries its parameters in the query string: the API key as
//! `key` and the JSON-serialized payload as `input_json`, for GET and POST
//! alike. Responses are JSON objects of the form `{"response": {...}}`.
//!
//! Design:
//! - `GameServersClient` owns a `reqwest::Client`, the base URL and the key.
//! - One request per call. No retry, no timeout tuning, no caching.
//! - Errors are unified via `Error`.
//!
//! Endpoint operations live in `account.rs`; this module only knows how to
//! encode a payload and perform one exchange.
//!
//! Example (pseudo usage):
//! ```ignore
//! use gslt_rs::{ApiKey, GameServersClient};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = GameServersClient::new(ApiKey::new("your_api_key"))?;
//!     let raw: serde_json::Value = client.get("GetAccountList/v1", &json!({})).await?;
//!     println!("{raw}");
//!     Ok(())
//! }
//! ```

use reqwest::{Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::credential::ApiKey;

/// Base URL of the Steam game server account service.
pub const DEFAULT_BASE_URL: &str = "https://api.steampowered.com/IGameServersService/";

/// Longest response body echoed back inside an error.
const MAX_ERROR_BODY: usize = 2048;

/// Unified error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("invalid argument {name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("failed to encode request payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request failed with status {status}; body: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response (status {status}): {error}; body: {body}")]
    UnexpectedResponse {
        status: u16,
        error: String,
        body: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Client for `IGameServersService`.
///
/// - Wraps `reqwest::Client`
/// - Holds the API key for the lifetime of the process
#[derive(Clone, Debug)]
pub struct GameServersClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: ApiKey,
}

impl GameServersClient {
    /// Client against the public Steam endpoint.
    pub fn new(api_key: ApiKey) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Client against a custom base URL (a proxy, or a local test server).
    pub fn with_base_url(api_key: ApiKey, base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder().gzip(true).build()?;
        Self::with_http(http, api_key, base_url)
    }

    /// Use a custom `reqwest::Client`
    pub fn with_http(http: reqwest::Client, api_key: ApiKey, base_url: &str) -> Result<Self> {
        // Url::join drops the last path segment unless the base ends with '/'
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(format!("{normalized} cannot be a base url")));
        }
        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the query string for `data`: `key=<api key>&input_json=<json>`.
    ///
    /// Form-urlencoded over UTF-8 (space becomes `+`).
    pub fn encode<T: Serialize + ?Sized>(&self, data: &T) -> Result<String> {
        let input_json = serde_json::to_string(data)?;
        Ok(url::form_urlencoded::Serializer::new(String::new())
            .append_pair("key", self.api_key.as_str())
            .append_pair("input_json", &input_json)
            .finish())
    }

    pub async fn get<T, D>(&self, endpoint: &str, data: &D) -> Result<T>
    where
        T: DeserializeOwned,
        D: Serialize + ?Sized,
    {
        self.request(endpoint, data, Method::GET).await
    }

    pub async fn post<T, D>(&self, endpoint: &str, data: &D) -> Result<T>
    where
        T: DeserializeOwned,
        D: Serialize + ?Sized,
    {
        self.request(endpoint, data, Method::POST).await
    }

    /// Perform one call and decode the JSON body into `T`.
    ///
    /// Use `serde_json::Value` as `T` for the raw document.
    #[instrument(level = "debug", skip(self, data))]
    pub async fn request<T, D>(&self, endpoint: &str, data: &D, method: Method) -> Result<T>
    where
        T: DeserializeOwned,
        D: Serialize + ?Sized,
    {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| Error::InvalidUrl(e.to_string()))?;
        url.set_query(Some(&self.encode(data)?));

        // The query string carries the key, so log the path only
        debug!(path = url.path(), %method, "sending request");

        // reqwest errors carry the request URL, which holds the key
        let resp = self
            .http
            .request(method, url)
            .send()
            .await
            .map_err(|e| Error::Http(e.without_url()))?;
        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| Error::Http(e.without_url()))?;
        debug!(status = status.as_u16(), len = bytes.len(), "response received");

        if !status.is_success() {
            warn!(status = status.as_u16(), endpoint, "non-success status");
            return Err(Error::Status {
                status: status.as_u16(),
                body: redact_body(&bytes),
            });
        }

        let text = std::str::from_utf8(&bytes).map_err(|e| Error::UnexpectedResponse {
            status: status.as_u16(),
            error: e.to_string(),
            body: redact_body(&bytes),
        })?;

        serde_json::from_str::<T>(text).map_err(|e| Error::UnexpectedResponse {
            status: status.as_u16(),
            error: e.to_string(),
            body: redact_body(&bytes),
        })
    }
}

/// Render a response body for an error message: any `login_token` value is
/// replaced and the result is capped at `MAX_ERROR_BODY` bytes.
fn redact_body(bytes: &[u8]) -> String {
    let mut body = String::from_utf8_lossy(bytes).to_string();
    if let Ok(mut v) = serde_json::from_str::<serde_json::Value>(&body) {
        redact_tokens(&mut v);
        if let Ok(s) = serde_json::to_string(&v) {
            body = s;
        }
    }
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push_str("...");
    }
    body
}

fn redact_tokens(v: &mut serde_json::Value) {
    match v {
        serde_json::Value::Object(obj) => {
            for (k, val) in obj.iter_mut() {
                if k == "login_token" && val.is_string() {
                    *val = serde_json::Value::String("[redacted]".into());
                } else {
                    redact_tokens(val);
                }
            }
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(redact_tokens),
        _ => {}
    }
}
