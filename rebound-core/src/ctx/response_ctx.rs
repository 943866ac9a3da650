use http::{HeaderMap, StatusCode};

/// Upstream response as seen by the response-side filter phase.
#[derive(Debug)]
pub struct ResponseCtx {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ResponseCtx {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn with_status(status: StatusCode) -> Self {
        Self::new(status, HeaderMap::new(), Vec::new())
    }
}
