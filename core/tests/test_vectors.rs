//! Verify outcome classification and route rendering against the JSON test
//! vectors stored in `test-vectors/`.
//!
//! A canned transport replays each simulated response, so these tests never
//! touch the network. Comparing parsed JSON (not raw strings) avoids false
//! negatives from field-ordering differences.

use std::cell::RefCell;

use graylog_api_client::{
    routes, AdapterConfig, AdapterError, GraylogApi, HttpMethod, HttpRequest, HttpResponse,
    RestAdapter, Transport, TransportError,
};

const BASE_URL: &str = "http://localhost:9000/api/";

/// Replays one response and remembers the requests it was given.
struct CannedTransport {
    response: HttpResponse,
    sent: RefCell<Vec<HttpRequest>>,
}

impl CannedTransport {
    fn new(response: HttpResponse) -> Self {
        Self {
            response,
            sent: RefCell::new(Vec::new()),
        }
    }
}

impl Transport for CannedTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.sent.borrow_mut().push(request.clone());
        Ok(self.response.clone())
    }
}

fn adapter(response: HttpResponse) -> RestAdapter<CannedTransport> {
    RestAdapter::with_transport(
        AdapterConfig::new(BASE_URL, "vector-token"),
        CannedTransport::new(response),
    )
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[test]
fn outcome_test_vectors() {
    let raw = include_str!("../../test-vectors/outcomes.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["simulated_response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            reason: sim["reason"].as_str().unwrap().to_string(),
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().as_bytes().to_vec(),
        };

        let result = adapter(response).get("streams", None);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error.as_str().unwrap() {
                "Decode" => assert!(err.is_decode(), "{name}: expected Decode, got {err:?}"),
                "HttpStatus" => assert!(
                    matches!(err, AdapterError::HttpStatus { .. }),
                    "{name}: expected HttpStatus, got {err:?}"
                ),
                other => panic!("{name}: unknown expected_error: {other}"),
            }
            assert_eq!(
                err.to_string(),
                case["expected_message"].as_str().unwrap(),
                "{name}: message"
            );
        } else {
            let result = result.unwrap();
            let expected = &case["expected_result"];
            assert_eq!(
                u64::from(result.status_code()),
                expected["status_code"].as_u64().unwrap(),
                "{name}: status_code"
            );
            assert_eq!(result.message(), expected["message"].as_str().unwrap(), "{name}: message");
            assert_eq!(result.data(), &expected["data"], "{name}: data");
        }
    }
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

#[test]
fn route_test_vectors() {
    let raw = include_str!("../../test-vectors/routes.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let ok = HttpResponse {
        status: 200,
        reason: "OK".to_string(),
        headers: Vec::new(),
        body: b"{}".to_vec(),
    };
    let api = GraylogApi::with_adapter(adapter(ok));

    let cases = vectors["cases"].as_array().unwrap();
    for case in cases {
        let name = case["route"].as_str().unwrap();
        let route = routes::find(name).unwrap_or_else(|| panic!("{name}: not in catalog"));
        let args: Vec<&str> = case["args"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a.as_str().unwrap())
            .collect();
        let expected_req = &case["expected_request"];

        api.dispatch(route, &args, None, None).unwrap();

        let sent = api.adapter().transport().sent.borrow().last().cloned().unwrap();
        let method: HttpMethod = expected_req["method"].as_str().unwrap().parse().unwrap();
        assert_eq!(sent.method, method, "{name}: method");
        assert_eq!(
            sent.url,
            format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()),
            "{name}: path"
        );
    }

    // Every catalog route is covered by at least one vector.
    for route in routes::CATALOG {
        assert!(
            cases.iter().any(|c| c["route"] == route.name),
            "{}: no test vector",
            route.name
        );
    }
}
