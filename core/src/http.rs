//! HTTP requests and responses as plain data, plus the transport seam.
//!
//! # Design
//! The adapter composes an `HttpRequest` (URL, query pairs, session headers,
//! JSON body) and hands it to a `Transport`, which performs the network round
//! trip and returns an `HttpResponse`. Status interpretation and body decoding
//! stay in the adapter, so a transport only reports whether a response was
//! obtained at all. Tests swap in an in-memory transport to observe exactly
//! what would have gone over the wire.

use std::error::Error;

use strum::{Display, EnumString};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// An HTTP request described as plain data.
///
/// Built by `RestAdapter::execute`. `url` already contains the base URL and
/// the endpoint path; `query` is attached verbatim as the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header value matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// Any status code is a valid response here, including 4xx and 5xx.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Reason phrase for `status`, empty when the code has none.
    pub reason: String,
    pub headers: Vec<(String, String)>,
    /// Raw body bytes, not yet checked for UTF-8.
    pub body: Vec<u8>,
}

/// Cause of a failed round trip: no response was obtained.
pub type TransportError = Box<dyn Error + Send + Sync + 'static>;

/// Executes an `HttpRequest` against the network.
///
/// Implementations must return non-2xx responses as `Ok` data and reserve
/// `Err` for failures where no response exists (refused connection, DNS, TLS,
/// timeouts, unreadable body).
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}
