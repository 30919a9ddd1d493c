//! Synchronous client for the Aircall telephony REST API.
//!
//! # Overview
//! `AircallClient` authenticates with either an application id/secret pair
//! (HTTP basic auth) or an OAuth access token (bearer auth), builds versioned
//! URLs under `https://api.aircall.io/`, sends JSON bodies and returns raw
//! response bytes. Typed wrappers for each endpoint decode those bytes into
//! the envelopes in [`types`].
//!
//! # Design
//! - Credentials, API version and base origin are fixed once the client is
//!   built; the client carries no mutable state between calls.
//! - Request building (`build_request`) and status classification
//!   (`check_status`) are pure; only the [`Transport`] does I/O.
//! - Every call is a single blocking round trip. There is no retry, paging
//!   iteration or caching.
//!
//! ```no_run
//! let client = aircall::AircallClient::new("app-id", "app-secret");
//! let pong = client.ping()?;
//! assert_eq!(pong.ping, "pong");
//! # Ok::<(), aircall::ApiError>(())
//! ```

pub mod client;
pub mod error;
pub mod http;
pub mod resources;
pub mod types;

pub use client::{check_status, AircallClient, Credentials, Params, API_BASE_URL, API_DEFAULT_VERSION};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use types::*;
