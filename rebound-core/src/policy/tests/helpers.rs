use crate::conf::types::{HeaderMutationConfig, MutationOp, RedirectPolicyConfig};
use crate::ctx::{RequestCtx, ResponseCtx, StreamInfo};
use crate::filter::FilterStats;
use crate::policy::{ModifyRequestHeadersAction, Policy, RedirectPolicy};
use crate::route::{RouteId, RouteProvider, Router};
use http::uri::Scheme;
use http::{HeaderMap, Method, StatusCode};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

pub(super) const REDIRECT_HOST: &str = "https://redirect.example.com";
pub(super) const REDIRECT_PATH: &str = "/new";

pub(super) fn add_header(name: &str, value: &str) -> HeaderMutationConfig {
    HeaderMutationConfig {
        name: name.to_string(),
        value: Some(value.to_string()),
        op: MutationOp::Add,
    }
}

pub(super) fn redirect_config() -> RedirectPolicyConfig {
    RedirectPolicyConfig {
        host: REDIRECT_HOST.to_string(),
        path: REDIRECT_PATH.to_string(),
        status_code: None,
        response_headers: Vec::new(),
        request_headers: Vec::new(),
        modify_request_headers: false,
    }
}

pub(super) fn redirect_policy(
    cfg: &RedirectPolicyConfig,
    action: Option<Arc<dyn ModifyRequestHeadersAction>>,
    stats: &Arc<FilterStats>,
) -> Arc<Policy> {
    Arc::new(Policy::Redirect(
        RedirectPolicy::from_config(cfg, action, Arc::clone(stats)).expect("valid policy"),
    ))
}

pub(super) fn stats() -> Arc<FilterStats> {
    Arc::new(FilterStats::new("test"))
}

/// Router that knows the redirect target.
pub(super) fn router_with_target() -> Arc<dyn RouteProvider> {
    let mut router = Router::new();
    router
        .add_route("redirect.example.com", "/new", RouteId::new("target"))
        .expect("route");
    Arc::new(router)
}

/// Router with no route for the redirect target.
pub(super) fn router_without_target() -> Arc<dyn RouteProvider> {
    let mut router = Router::new();
    router
        .add_route("orig.example.com", "/old", RouteId::new("origin"))
        .expect("route");
    Arc::new(router)
}

/// Downstream request as originally received: POST over plain-text http.
pub(super) fn original_ctx(router: Arc<dyn RouteProvider>) -> RequestCtx {
    let mut headers = HeaderMap::new();
    headers.insert(http::header::CONTENT_LENGTH, "11".parse().expect("value"));
    headers.insert(http::header::ACCEPT, "*/*".parse().expect("value"));

    RequestCtx::new(
        Method::POST,
        Some(Scheme::HTTP),
        "orig.example.com",
        "/old",
        headers,
        StreamInfo::new(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)), false),
        router,
    )
}

pub(super) fn upstream_response(status: StatusCode) -> ResponseCtx {
    let mut headers = HeaderMap::new();
    headers.insert("x-upstream", "origin".parse().expect("value"));
    ResponseCtx::new(status, headers, b"upstream body".to_vec())
}
