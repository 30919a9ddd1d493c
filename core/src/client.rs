//! Authenticated request builder and executor for the Aircall API.
//!
//! # Design
//! `AircallClient` holds immutable credentials, the API version segment, the
//! base origin and a `Transport`. `request` is split the same way as the
//! transport types: `build_request` produces an `HttpRequest` without I/O,
//! the transport executes it, and `check_status` classifies the response.
//! Nothing is mutated after construction, so a client can be shared across
//! threads whenever its transport can.

use std::collections::BTreeMap;
use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use tracing::debug;
use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};

pub const API_BASE_URL: &str = "https://api.aircall.io/";
pub const API_DEFAULT_VERSION: &str = "v1";

/// Query parameters. Keys are unique and encoded in sorted order.
pub type Params = BTreeMap<String, String>;

/// How requests authenticate. Fixed for the lifetime of a client.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Application id and secret, sent as HTTP basic auth.
    Basic { app_id: String, app_secret: String },
    /// OAuth access token, sent as a bearer token.
    Bearer { access_token: String },
}

impl Credentials {
    /// Value of the `Authorization` header for these credentials.
    pub fn authorization(&self) -> String {
        match self {
            Credentials::Bearer { access_token } => format!("Bearer {access_token}"),
            Credentials::Basic { app_id, app_secret } => {
                format!("Basic {}", STANDARD.encode(format!("{app_id}:{app_secret}")))
            }
        }
    }
}

// Secrets stay out of logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Basic { app_id, .. } => f
                .debug_struct("Basic")
                .field("app_id", app_id)
                .field("app_secret", &"<redacted>")
                .finish(),
            Credentials::Bearer { .. } => f
                .debug_struct("Bearer")
                .field("access_token", &"<redacted>")
                .finish(),
        }
    }
}

/// Synchronous client for the Aircall REST API.
#[derive(Debug, Clone)]
pub struct AircallClient<T = UreqTransport> {
    credentials: Credentials,
    version: String,
    base_url: String,
    transport: T,
}

impl AircallClient<UreqTransport> {
    /// Client authenticating with an application id and secret.
    pub fn new(app_id: &str, app_secret: &str) -> Self {
        Self::with_credentials(Credentials::Basic {
            app_id: app_id.to_string(),
            app_secret: app_secret.to_string(),
        })
    }

    /// Client authenticating with an OAuth access token.
    ///
    /// An empty token is rejected by every request with
    /// `ApiError::EmptyAccessToken` before anything is sent.
    pub fn with_access_token(access_token: &str) -> Self {
        Self::with_credentials(Credentials::Bearer {
            access_token: access_token.to_string(),
        })
    }

    fn with_credentials(credentials: Credentials) -> Self {
        Self {
            credentials,
            version: API_DEFAULT_VERSION.to_string(),
            base_url: API_BASE_URL.to_string(),
            transport: UreqTransport::new(),
        }
    }
}

impl<T> AircallClient<T> {
    /// Replaces the transport, keeping credentials and URL settings.
    pub fn with_transport<U: Transport>(self, transport: U) -> AircallClient<U> {
        AircallClient {
            credentials: self.credentials,
            version: self.version,
            base_url: self.base_url,
            transport,
        }
    }

    /// Points the client at another origin, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = format!("{}/", base_url.trim_end_matches('/'));
        self
    }

    /// Overrides the API version path segment.
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.trim_matches('/').to_string();
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Absolute URL for `path`: origin, version, path, `?`, encoded params.
    ///
    /// The `?` is written even when `params` is empty.
    pub fn build_url(&self, path: &str, params: &Params) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params.iter())
            .finish();
        format!("{}{}{}?{}", self.base_url, self.version, path, query)
    }

    /// Builds the complete request without sending it.
    ///
    /// Fails with `ApiError::Serialization` when `body` cannot be encoded and
    /// with `ApiError::EmptyAccessToken` for a bearer client without a token.
    pub fn build_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        params: &Params,
        body: Option<&B>,
    ) -> Result<HttpRequest, ApiError> {
        if let Credentials::Bearer { access_token } = &self.credentials {
            if access_token.is_empty() {
                return Err(ApiError::EmptyAccessToken);
            }
        }

        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(ApiError::Serialization)?;

        Ok(HttpRequest {
            method,
            url: self.build_url(path, params),
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Authorization".to_string(), self.credentials.authorization()),
            ],
            body,
        })
    }
}

impl<T: Transport> AircallClient<T> {
    /// GET `path` with `params`.
    pub fn fetch(&self, path: &str, params: &Params) -> Result<Vec<u8>, ApiError> {
        self.request::<()>(HttpMethod::Get, path, params, None)
    }

    /// POST `body` as JSON to `path`.
    pub fn create<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Vec<u8>, ApiError> {
        self.request(HttpMethod::Post, path, &Params::new(), Some(body))
    }

    /// DELETE `path` with `params`.
    pub fn remove(&self, path: &str, params: &Params) -> Result<Vec<u8>, ApiError> {
        self.request::<()>(HttpMethod::Delete, path, params, None)
    }

    /// Sends one request and returns the raw response body on success.
    pub fn request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        params: &Params,
        body: Option<&B>,
    ) -> Result<Vec<u8>, ApiError> {
        let request = self.build_request(method, path, params, body)?;
        debug!(method = %request.method, url = %request.url, "sending aircall request");

        let response = self.transport.execute(&request)?;
        debug!(status = response.status, bytes = response.body.len(), "received aircall response");

        check_status(response)
    }
}

/// Map the response status to success bytes or a classified error.
pub fn check_status(response: HttpResponse) -> Result<Vec<u8>, ApiError> {
    match response.status {
        0..=399 => Ok(response.body),
        400..=499 => Err(ApiError::Client {
            status: response.status,
            status_line: response.status_line(),
            body: response.body,
        }),
        _ => Err(ApiError::Server {
            status: response.status,
            status_line: response.status_line(),
            body: response.body,
        }),
    }
}
