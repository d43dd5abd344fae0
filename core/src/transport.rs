//! Default blocking transport backed by a reusable `ureq::Agent`.
//!
//! # Design
//! The agent is the connection session: it pools connections across calls and
//! carries the TLS configuration. It is built on the first request rather than
//! at construction, so creating an adapter never fails; a CA bundle that
//! cannot be read or parsed fails the call that needed it instead.
//!
//! Status-code-as-error is disabled so 4xx/5xx responses come back as data for
//! the adapter to classify. Redirects follow ureq's defaults and the response
//! body is read without a size cap.

use std::fmt;
use std::fs;

use once_cell::sync::OnceCell;
use ureq::tls::{PemItem, RootCerts, TlsConfig};
use ureq::{Agent, RequestBuilder};

use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
use crate::tls::{TlsPolicy, TlsVerify};

/// Blocking HTTP transport over a lazily built `ureq::Agent`.
pub struct UreqTransport {
    tls: TlsPolicy,
    agent: OnceCell<Agent>,
}

impl UreqTransport {
    pub fn new(tls: TlsPolicy) -> Self {
        Self {
            tls,
            agent: OnceCell::new(),
        }
    }

    fn agent(&self) -> Result<&Agent, TransportError> {
        self.agent.get_or_try_init(|| build_agent(&self.tls))
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("tls", &self.tls)
            .field("connected", &self.agent.get().is_some())
            .finish()
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(TlsPolicy::default())
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = self.agent()?;
        let url = request.url.as_str();
        let body = request.body.as_deref();

        let result = match request.method {
            HttpMethod::Get => prepare(agent.get(url), request).call(),
            HttpMethod::Delete => match body {
                Some(body) => prepare(agent.delete(url), request)
                    .force_send_body()
                    .send(body.as_bytes()),
                None => prepare(agent.delete(url), request).call(),
            },
            HttpMethod::Post => match body {
                Some(body) => prepare(agent.post(url), request).send(body.as_bytes()),
                None => prepare(agent.post(url), request).send_empty(),
            },
            HttpMethod::Put => match body {
                Some(body) => prepare(agent.put(url), request).send(body.as_bytes()),
                None => prepare(agent.put(url), request).send_empty(),
            },
        };

        let mut response = result?;
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let bytes = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body: bytes,
        })
    }
}

/// Attach the request's headers and query pairs to a ureq builder.
fn prepare<B>(mut builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    for (key, value) in &request.query {
        builder = builder.query(key.as_str(), value.as_str());
    }
    builder
}

fn build_agent(policy: &TlsPolicy) -> Result<Agent, TransportError> {
    let tls = match policy.verify() {
        TlsVerify::Enabled => TlsConfig::default(),
        TlsVerify::Disabled => TlsConfig::builder().disable_verification(true).build(),
        TlsVerify::CustomCa(path) => {
            let pem = fs::read(path)
                .map_err(|e| format!("cannot read CA bundle {}: {e}", path.display()))?;
            let mut certs = Vec::new();
            for item in ureq::tls::parse_pem(&pem) {
                if let PemItem::Certificate(cert) = item? {
                    certs.push(cert.to_owned());
                }
            }
            if certs.is_empty() {
                return Err(format!("no certificates in CA bundle {}", path.display()).into());
            }
            TlsConfig::builder()
                .root_certs(RootCerts::new_with_certs(&certs))
                .build()
        }
    };

    let agent = Agent::config_builder()
        .http_status_as_error(false)
        .tls_config(tls)
        .build()
        .new_agent();
    Ok(agent)
}
