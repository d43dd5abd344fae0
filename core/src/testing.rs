//! In-memory transport for unit tests.

use std::cell::RefCell;

use crate::http::{HttpRequest, HttpResponse, Transport, TransportError};

/// Records every request and answers each with the same canned outcome.
pub(crate) struct RecordingTransport {
    requests: RefCell<Vec<HttpRequest>>,
    reply: Result<HttpResponse, String>,
}

impl RecordingTransport {
    pub(crate) fn replying(status: u16, reason: &str, body: &str) -> Self {
        Self::replying_bytes(status, reason, body.as_bytes())
    }

    pub(crate) fn replying_bytes(status: u16, reason: &str, body: &[u8]) -> Self {
        Self {
            requests: RefCell::new(Vec::new()),
            reply: Ok(HttpResponse {
                status,
                reason: reason.to_string(),
                headers: Vec::new(),
                body: body.to_vec(),
            }),
        }
    }

    pub(crate) fn ok() -> Self {
        Self::replying(200, "OK", "{}")
    }

    pub(crate) fn failing(cause: &str) -> Self {
        Self {
            requests: RefCell::new(Vec::new()),
            reply: Err(cause.to_string()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub(crate) fn last(&self) -> HttpRequest {
        self.requests
            .borrow()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

impl Transport for RecordingTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        self.reply.clone().map_err(TransportError::from)
    }
}
