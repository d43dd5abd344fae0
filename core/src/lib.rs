//! Blocking client for the Graylog REST API.
//!
//! # Overview
//! `RestAdapter` turns a logical request (verb, path, query, JSON body) into
//! one HTTP round trip and normalizes the answer into an `ApiResponse` or an
//! `AdapterError`. `GraylogApi` layers the named endpoint operations on top
//! of it, each described by a `Route` in `routes`.
//!
//! # Design
//! - One synchronous call per operation: no retries, pagination, caching or
//!   background work.
//! - The network sits behind the `Transport` trait; `UreqTransport` is the
//!   default, and tests substitute an in-memory one.
//! - Errors are tagged by cause (`Transport`, `Decode`, `HttpStatus`,
//!   `InvalidArgument`) and keep the API's established message wording.
//! - Logging goes through `tracing`; the crate never installs a subscriber.
//!
//! ```no_run
//! use graylog_api_client::{AdapterConfig, GraylogApi, TlsPolicy};
//!
//! let config = AdapterConfig::new("https://graylog.example.org/api", "my-api-token")
//!     .with_tls(TlsPolicy::default());
//! let api = GraylogApi::new(config);
//! let cluster = api.cluster()?;
//! println!("{}", cluster.data());
//! # Ok::<(), graylog_api_client::AdapterError>(())
//! ```

pub mod adapter;
pub mod config;
pub mod error;
pub mod facade;
pub mod http;
pub mod routes;
pub mod tls;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use adapter::RestAdapter;
pub use config::AdapterConfig;
pub use error::{AdapterError, AdapterResult, ConfigError};
pub use facade::GraylogApi;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use routes::Route;
pub use tls::{TlsPolicy, TlsVerify};
pub use transport::UreqTransport;
pub use types::{ApiResponse, NewUser, Parameters, Payload, UserStatus};
