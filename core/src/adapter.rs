//! Request execution for the Graylog REST API.
//!
//! # Design
//! `RestAdapter` is the single place where a logical request (verb, path,
//! query, body) becomes a network call and where the answer becomes either an
//! `ApiResponse` or an `AdapterError`. Each call is one blocking round trip:
//! no retries, no pagination, no caching.
//!
//! The outcome is classified in a fixed order:
//! 1. no response at all → `AdapterError::Transport`
//! 2. body is not JSON → `AdapterError::Decode`, whatever the status
//! 3. status outside 200..=299 → `AdapterError::HttpStatus`
//! 4. otherwise → `ApiResponse`
//!
//! Every request carries `Accept: application/json` and Basic auth with the
//! API token as username and the literal `token` as password.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::Value;
use tracing::{debug, debug_span, error, warn, Span};

use crate::config::AdapterConfig;
use crate::error::{AdapterError, AdapterResult};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::transport::UreqTransport;
use crate::types::{ApiResponse, Parameters, Payload};

/// Basic auth password expected alongside an API token.
const TOKEN_PASSWORD: &str = "token";

const JSON: &str = "application/json";

/// Blocking client for the REST API, generic over its `Transport`.
///
/// Safe to reuse across sequential calls. Concurrent use is as safe as the
/// transport makes it; the adapter adds no locking of its own.
pub struct RestAdapter<T = UreqTransport> {
    base_url: String,
    authorization: String,
    transport: T,
    span: Span,
}

impl RestAdapter<UreqTransport> {
    /// Adapter over the default ureq transport. Never fails: connections are
    /// opened on the first request.
    pub fn new(config: AdapterConfig) -> Self {
        let transport = UreqTransport::new(config.tls.clone());
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> RestAdapter<T> {
    pub fn with_transport(config: AdapterConfig, transport: T) -> Self {
        let base_url = config.normalized_base_url();
        let credentials = STANDARD.encode(format!("{}:{TOKEN_PASSWORD}", config.api_key));
        let span = debug_span!("rest_adapter", base_url = %base_url);

        if config.tls.warns_insecure() {
            span.in_scope(|| {
                warn!(
                    base_url = %base_url,
                    "TLS certificate verification is disabled for this adapter"
                );
            });
        }

        Self {
            base_url,
            authorization: format!("Basic {credentials}"),
            transport,
            span,
        }
    }

    /// Record this adapter's events under `span` instead of its own.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Base URL with its single trailing `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn get(&self, path: &str, query: Option<&Parameters>) -> AdapterResult<ApiResponse> {
        self.execute(HttpMethod::Get, path, query, None)
    }

    pub fn post(
        &self,
        path: &str,
        query: Option<&Parameters>,
        body: Option<&Payload>,
    ) -> AdapterResult<ApiResponse> {
        self.execute(HttpMethod::Post, path, query, body)
    }

    pub fn put(
        &self,
        path: &str,
        query: Option<&Parameters>,
        body: Option<&Payload>,
    ) -> AdapterResult<ApiResponse> {
        self.execute(HttpMethod::Put, path, query, body)
    }

    pub fn delete(
        &self,
        path: &str,
        query: Option<&Parameters>,
        body: Option<&Payload>,
    ) -> AdapterResult<ApiResponse> {
        self.execute(HttpMethod::Delete, path, query, body)
    }

    /// Send one request and classify the outcome.
    pub fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        query: Option<&Parameters>,
        body: Option<&Payload>,
    ) -> AdapterResult<ApiResponse> {
        let _entered = self.span.enter();
        let request = self.build_request(method, path, query, body);

        // The body is never logged.
        debug!(
            method = %method,
            url = %request.url,
            parameters = ?query,
            "sending request"
        );

        let response = match self.transport.send(&request) {
            Ok(response) => response,
            Err(e) => {
                error!(method = %method, url = %request.url, error = %e, "request failed");
                return Err(AdapterError::Transport(e));
            }
        };

        classify(method, &request.url, response)
    }

    fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        query: Option<&Parameters>,
        body: Option<&Payload>,
    ) -> HttpRequest {
        let mut headers = vec![
            ("Accept".to_string(), JSON.to_string()),
            ("Authorization".to_string(), self.authorization.clone()),
        ];
        let body = body.map(|b| {
            headers.push(("Content-Type".to_string(), JSON.to_string()));
            Value::Object(b.clone()).to_string()
        });

        HttpRequest {
            method,
            url: self.url_for(path),
            query: query
                .map(|q| q.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                .unwrap_or_default(),
            headers,
            body,
        }
    }

    /// Join `path` onto the base URL with exactly one separator between them.
    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl<T> fmt::Debug for RestAdapter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestAdapter")
            .field("base_url", &self.base_url)
            .field("authorization", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Turn a received response into the call's outcome. The JSON check runs
/// before the status check.
fn classify(method: HttpMethod, url: &str, response: HttpResponse) -> AdapterResult<ApiResponse> {
    let HttpResponse {
        status,
        reason,
        body,
        ..
    } = response;

    let data: Value = match serde_json::from_slice(&body) {
        Ok(data) => data,
        Err(e) => {
            error!(
                method = %method,
                url = %url,
                success = false,
                status_code = status,
                error = %e,
                "response body is not valid JSON"
            );
            return Err(AdapterError::Decode(e));
        }
    };

    if (200..=299).contains(&status) {
        debug!(
            method = %method,
            url = %url,
            success = true,
            status_code = status,
            message = %reason,
            "request succeeded"
        );
        Ok(ApiResponse::new(status, reason, data))
    } else {
        error!(
            method = %method,
            url = %url,
            success = false,
            status_code = status,
            message = %reason,
            "request rejected"
        );
        Err(AdapterError::HttpStatus {
            code: status,
            reason,
        })
    }
}
