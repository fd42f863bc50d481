//! Scripted HTTP client for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

type Handler = dyn Fn(&HttpRequest) -> Result<HttpResponse, HttpError> + Send + Sync;

/// A mock [`HttpClient`] that answers every request through a handler
/// closure and records what it was asked.
pub struct MockClient {
    handler: Mutex<Box<Handler>>,
    requests: Mutex<Vec<HttpRequest>>,
    call_count: AtomicUsize,
}

impl std::fmt::Debug for MockClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockClient")
            .field("calls", &self.calls())
            .finish_non_exhaustive()
    }
}

impl MockClient {
    /// Creates a client answering with `handler`.
    pub fn new(
        handler: impl Fn(&HttpRequest) -> Result<HttpResponse, HttpError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Mutex::new(Box::new(handler)),
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Creates a client whose every request fails to connect.
    pub fn unreachable() -> Self {
        Self::new(|_| Err(HttpError::Connection("connection refused".into())))
    }

    /// Swaps the handler, e.g. to simulate the server changing state.
    pub fn respond_with(
        &self,
        handler: impl Fn(&HttpRequest) -> Result<HttpResponse, HttpError> + Send + Sync + 'static,
    ) {
        *self.handler.lock().unwrap() = Box::new(handler);
    }

    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of captured requests whose path contains `fragment`.
    pub fn calls_to(&self, fragment: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.path().contains(fragment))
            .count()
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let result = {
            let handler = self.handler.lock().unwrap();
            (**handler)(&req)
        };
        self.requests.lock().unwrap().push(req);
        result
    }
}

/// JSON `200 OK` response.
pub fn json_ok(body: &serde_json::Value) -> Result<HttpResponse, HttpError> {
    Ok(HttpResponse::with_status(
        http::StatusCode::OK,
        body.to_string(),
    ))
}

/// Bodyless response with the given status.
pub fn status(code: u16) -> Result<HttpResponse, HttpError> {
    Ok(HttpResponse::with_status(
        http::StatusCode::from_u16(code).unwrap(),
        Vec::new(),
    ))
}
