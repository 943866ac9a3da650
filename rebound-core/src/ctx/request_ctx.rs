use crate::ctx::{FilterState, StreamInfo};
use crate::mutation::HeaderMutations;
use crate::route::{RouteId, RouteProvider};
use http::uri::Scheme;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use std::sync::Arc;

/// Canonical downstream request context passed through the filter pipeline.
///
/// Holds the client-facing request line state (method, scheme, host, path),
/// the request headers, the per-stream metadata and the request-scoped
/// filter-state store. One worker owns the context for the lifetime of the
/// request, including across a stream replay.
#[derive(Debug)]
pub struct RequestCtx {
    method: Method,

    /// Explicit scheme of the request, when one was set by the downstream
    /// protocol. HTTP/1.1 origin-form requests carry none.
    scheme: Option<Scheme>,

    /// Authority (host or host:port) the request is addressed to.
    host: String,

    /// Path and optional query string.
    path: String,

    headers: HeaderMap,

    pub stream_info: StreamInfo,

    pub filter_state: FilterState,

    router: Arc<dyn RouteProvider>,

    /// Route resolution is cached per request until explicitly invalidated.
    /// `None` = not yet computed, `Some(None)` = computed, no match.
    cached_route: Option<Option<RouteId>>,

    /// Raised when a filter asks the pipeline to recreate the stream.
    replay_requested: bool,
}

impl RequestCtx {
    pub fn new(
        method: Method,
        scheme: Option<Scheme>,
        host: impl Into<String>,
        path: impl Into<String>,
        headers: HeaderMap,
        stream_info: StreamInfo,
        router: Arc<dyn RouteProvider>,
    ) -> Self {
        Self {
            method,
            scheme,
            host: host.into(),
            path: path.into(),
            headers,
            stream_info,
            filter_state: FilterState::new(),
            router,
            cached_route: None,
            replay_requested: false,
        }
    }
}

/// Request-line API
impl RequestCtx {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn set_method(&mut self, method: Method) {
        self.method = method;
    }

    pub fn scheme(&self) -> Option<&Scheme> {
        self.scheme.as_ref()
    }

    pub fn scheme_is_set(&self) -> bool {
        self.scheme.is_some()
    }

    pub fn set_scheme(&mut self, scheme: Scheme) {
        self.scheme = Some(scheme);
    }

    /// Return the request to the scheme-less form it had when no scheme was
    /// explicitly set by the downstream protocol.
    pub fn clear_scheme(&mut self) {
        self.scheme = None;
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn set_host(&mut self, host: impl Into<String>) {
        self.host = host.into();
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }
}

/// Request header API
impl RequestCtx {
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn insert_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    pub fn remove_header(&mut self, name: &HeaderName) {
        self.headers.remove(name);
    }

    /// Apply an ordered mutation rule set against the request headers.
    pub fn apply_header_mutations(&mut self, mutations: &HeaderMutations) {
        mutations.evaluate(&mut self.headers, &self.stream_info);
    }
}

/// Routing API
impl RequestCtx {
    /// Route for the current host and path. Resolution is performed at most
    /// once per request unless the cache is invalidated.
    pub fn route(&mut self) -> Option<RouteId> {
        if self.cached_route.is_none() {
            let resolved = self.router.find_route(&self.host, &self.path);
            self.cached_route = Some(resolved);
        }
        self.cached_route.as_ref().and_then(|r| r.clone())
    }

    /// Drop the cached route association. Must be called after any mutation
    /// that changes what the request routes on.
    pub fn clear_route_cache(&mut self) {
        self.cached_route = None;
    }
}

/// Stream control API
impl RequestCtx {
    /// Ask the pipeline to recreate the request stream from the top of the
    /// filter chain. The pipeline observes the signal after the current
    /// filter invocation returns.
    pub fn request_replay(&mut self) {
        self.replay_requested = true;
    }

    pub fn replay_requested(&self) -> bool {
        self.replay_requested
    }

    /// Pipeline-side transition into the replayed stream: consumes the
    /// replay signal, drops filter-chain-scoped state and the cached route.
    pub fn begin_replayed_stream(&mut self) {
        debug_assert!(self.replay_requested, "no replay was requested");
        self.replay_requested = false;
        self.cached_route = None;
        self.filter_state.on_stream_replay();
    }
}
