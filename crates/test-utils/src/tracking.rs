//! Scripted transport that records every request.
//!
//! Introspection requests are answered automatically with the fixture schema
//! (or an override) and counted separately, so tests can assert exactly how
//! often the network would have been hit.
//!
//! ## Usage
//!
//! ```ignore
//! use graphql_util_test_utils::MockTransport;
//!
//! let transport = MockTransport::new();
//! let client = Client::configure_with_transport(&config, transport.clone())?;
//!
//! let checkpoint = transport.checkpoint();
//! transport.respond(json!({ "data": { "viewer": { "id": "1" } } }));
//! client.call("viewer", &Variables::new(), &RequestContext::new());
//! assert_eq!(transport.count_since(checkpoint), 1);
//! ```

use crate::fixtures;
use graphql_util::{Transport, TransportError, TransportRequest};
use graphql_util_introspect::INTROSPECTION_OPERATION_NAME;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

struct RequestLog {
    introspection: Result<Value, TransportError>,
    responses: VecDeque<Result<Value, TransportError>>,
    requests: Vec<TransportRequest>,
    introspections: usize,
}

impl RequestLog {
    fn record(&mut self, request: &TransportRequest) -> Result<Value, TransportError> {
        if request.body.operation_name.as_deref() == Some(INTROSPECTION_OPERATION_NAME) {
            self.introspections += 1;
            return self.introspection.clone();
        }
        self.requests.push(request.clone());
        self.responses.pop_front().unwrap_or_else(|| {
            Ok(json!({ "errors": [{ "message": "no scripted response" }] }))
        })
    }
}

/// A [`Transport`] answering from a script.
///
/// Clones share the same script and log, so a test can hand one clone to a
/// client and keep another for assertions.
#[derive(Clone)]
pub struct MockTransport {
    log: Arc<Mutex<RequestLog>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// A transport serving the fixture schema.
    pub fn new() -> Self {
        Self::with_introspection(Ok(fixtures::introspection_response()))
    }

    /// A transport answering introspection with `response`.
    pub fn with_introspection(response: Result<Value, TransportError>) -> Self {
        Self {
            log: Arc::new(Mutex::new(RequestLog {
                introspection: response,
                responses: VecDeque::new(),
                requests: Vec::new(),
                introspections: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RequestLog> {
        self.log.lock().expect("RequestLog mutex poisoned")
    }

    /// Queues a response for the next non-introspection request.
    pub fn respond(&self, response: Value) -> &Self {
        self.lock().responses.push_back(Ok(response));
        self
    }

    /// Queues a transport failure for the next non-introspection request.
    pub fn fail(&self, error: TransportError) -> &Self {
        self.lock().responses.push_back(Err(error));
        self
    }

    /// Number of introspection requests received.
    pub fn introspection_count(&self) -> usize {
        self.lock().introspections
    }

    /// Every non-introspection request received, oldest first.
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.lock().requests.clone()
    }

    pub fn last_request(&self) -> Option<TransportRequest> {
        self.lock().requests.last().cloned()
    }

    /// Current log position for later comparison.
    pub fn checkpoint(&self) -> usize {
        self.lock().requests.len()
    }

    /// Non-introspection requests received since `checkpoint`.
    pub fn count_since(&self, checkpoint: usize) -> usize {
        self.lock().requests.len() - checkpoint
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &TransportRequest) -> Result<Value, TransportError> {
        self.lock().record(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_util::GraphQLRequest;
    use std::collections::BTreeMap;

    fn request(operation_name: Option<&str>) -> TransportRequest {
        TransportRequest {
            body: GraphQLRequest::new("{ viewer { id } }").with_operation_name(operation_name),
            headers: BTreeMap::new(),
            timeout: None,
        }
    }

    #[test]
    fn test_introspection_is_answered_and_counted() {
        let transport = MockTransport::new();
        let response = transport
            .send(&request(Some(INTROSPECTION_OPERATION_NAME)))
            .unwrap();
        assert_eq!(response, fixtures::introspection_response());
        assert_eq!(transport.introspection_count(), 1);
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_scripted_responses_in_order() {
        let transport = MockTransport::new();
        transport
            .respond(json!({ "data": { "n": 1 } }))
            .fail(TransportError::Network("down".into()));

        let shared = transport.clone();
        assert_eq!(shared.send(&request(None)).unwrap(), json!({ "data": { "n": 1 } }));
        assert_eq!(
            shared.send(&request(None)).unwrap_err(),
            TransportError::Network("down".into())
        );
        assert!(shared.send(&request(None)).unwrap()["errors"].is_array());

        assert_eq!(transport.count_since(0), 3);
        let checkpoint = transport.checkpoint();
        assert_eq!(transport.count_since(checkpoint), 0);
    }
}
