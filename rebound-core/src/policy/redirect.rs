use crate::conf::ConfigError;
use crate::conf::types::RedirectPolicyConfig;
use crate::ctx::{Lifespan, Mutability, RequestCtx, ResponseCtx};
use crate::filter::FilterStats;
use crate::mutation::HeaderMutations;
use crate::policy::{FilterAction, ModifyRequestHeadersAction, Policy, RollbackGuard};
use http::uri::Scheme;
use http::{Method, StatusCode, header};
use std::sync::Arc;
use url::Url;

/// Filter-state key under which a redirect in flight marks the request.
pub const CUSTOM_RESPONSE_FILTER_STATE_KEY: &str = "rebound.filters.http.custom_response";

/// Redirect policy: on match, rewrites the downstream request to the
/// configured target and replays it through the proxy's routing and filter
/// machinery. The response to the replayed request is then mutated by the
/// same policy instance, which recognizes the second pass by the
/// filter-state marker.
///
/// Immutable after construction. A failed redirect attempt is invisible to
/// the client: the original request is restored and the original response
/// delivered unchanged.
pub struct RedirectPolicy {
    host: String,
    path: String,
    status_code: Option<StatusCode>,
    response_mutations: HeaderMutations,
    request_mutations: HeaderMutations,
    modify_request_headers_action: Option<Arc<dyn ModifyRequestHeadersAction>>,
    stats: Arc<FilterStats>,
}

/// Parsed redirect target. Recomputed per attempt because validation must
/// hold at redirect time, not only at load time.
struct RedirectTarget {
    scheme: Scheme,
    host_and_port: String,
    path_and_query: String,
}

/// Snapshot of the original request identity, captured immediately before
/// mutation and held by the rollback guard for one attempt.
struct RedirectAttemptState {
    original_host: String,
    original_path: String,
    scheme_was_set: bool,
    scheme_was_http: bool,
}

impl RedirectAttemptState {
    fn capture(ctx: &RequestCtx, scheme_was_http: bool) -> Self {
        Self {
            original_host: ctx.host().to_string(),
            original_path: ctx.path().to_string(),
            scheme_was_set: ctx.scheme_is_set(),
            scheme_was_http,
        }
    }

    fn restore(self, ctx: &mut RequestCtx) {
        ctx.set_host(self.original_host);
        ctx.set_path(self.original_path);
        if self.scheme_was_set {
            ctx.set_scheme(if self.scheme_was_http {
                Scheme::HTTP
            } else {
                Scheme::HTTPS
            });
        } else {
            // Scheme presence must round-trip too: the attempt set one, the
            // original request had none.
            ctx.clear_scheme();
        }

        // The cache holds the failed lookup for the redirect target; the
        // original request's route must resolve again.
        ctx.clear_route_cache();
    }
}

impl RedirectPolicy {
    pub fn from_config(
        cfg: &RedirectPolicyConfig,
        action: Option<Arc<dyn ModifyRequestHeadersAction>>,
        stats: Arc<FilterStats>,
    ) -> Result<Self, ConfigError> {
        // Fail-fast load-time check; the per-attempt re-check happens in
        // initiate_redirect.
        parse_redirect_uri(&cfg.host, &cfg.path)?;

        let status_code = cfg
            .status_code
            .map(|code| {
                StatusCode::from_u16(code).map_err(|_| ConfigError::InvalidStatusCode { code })
            })
            .transpose()?;

        Ok(Self {
            host: cfg.host.clone(),
            path: cfg.path.clone(),
            status_code,
            response_mutations: HeaderMutations::from_config(&cfg.response_headers)?,
            request_mutations: HeaderMutations::from_config(&cfg.request_headers)?,
            modify_request_headers_action: action,
            stats,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn status_code(&self) -> Option<StatusCode> {
        self.status_code
    }

    pub(crate) fn on_response_headers(
        &self,
        this: &Arc<Policy>,
        response: &mut ResponseCtx,
        ctx: &mut RequestCtx,
    ) -> FilterAction {
        // A marker in filter state means this response came from the
        // replayed stream: second and final invocation.
        if let Some(marker) = ctx
            .filter_state
            .get_read_only::<Policy>(CUSTOM_RESPONSE_FILTER_STATE_KEY)
        {
            return self.on_replayed_response(&marker, this, response, ctx);
        }

        self.initiate_redirect(this, ctx)
    }

    fn on_replayed_response(
        &self,
        marker: &Arc<Policy>,
        this: &Arc<Policy>,
        response: &mut ResponseCtx,
        ctx: &mut RequestCtx,
    ) -> FilterAction {
        if !Arc::ptr_eq(marker, this) {
            debug_assert!(false, "policy filter state should be this policy");
            tracing::error!(
                request_id = %ctx.stream_info.request_id(),
                "custom response marker references a different policy instance"
            );
            return FilterAction::Continue;
        }

        // Only rewrite replies the redirect target answered successfully.
        let status = response.status.as_u16();
        if !(100..=299).contains(&status) {
            return FilterAction::Continue;
        }

        self.response_mutations
            .evaluate(&mut response.headers, &ctx.stream_info);

        if let Some(code) = self.status_code {
            response.status = code;
            ctx.stream_info.set_response_code(code.as_u16());
        }

        FilterAction::Continue
    }

    fn initiate_redirect(&self, this: &Arc<Policy>, ctx: &mut RequestCtx) -> FilterAction {
        // Redirect and local reply are mutually exclusive per request.
        if ctx.stream_info.local_reply_sent() {
            return FilterAction::Continue;
        }

        let target = match parse_redirect_uri(&self.host, &self.path) {
            Ok(target) => target,
            Err(err) => {
                debug_assert!(false, "redirect location became invalid: {err}");
                tracing::error!(
                    request_id = %ctx.stream_info.request_id(),
                    error = %err,
                    "redirect for custom response failed: invalid location"
                );
                return FilterAction::Continue;
            }
        };

        // Keep the scheme the client actually used, for restoration.
        let scheme_was_http = scheme_is_http(ctx);

        let snapshot = RedirectAttemptState::capture(ctx, scheme_was_http);
        let mut guard = RollbackGuard::new(ctx);
        guard.arm(move |ctx| snapshot.restore(ctx));

        guard.set_scheme(target.scheme);
        guard.set_host(target.host_and_port);
        guard.set_path(target.path_and_query);

        // The route must be recomputed against the rewritten host and path.
        guard.clear_route_cache();

        // Header mutations run before route recomputation so they can
        // influence it.
        guard.apply_header_mutations(&self.request_mutations);
        if let Some(action) = &self.modify_request_headers_action {
            action.modify_request_headers(&mut guard, self);
        }

        if guard.route().is_none() {
            // Guard not committed: the original request identity is
            // restored when it drops, and the original response is
            // delivered unchanged.
            self.stats.inc_redirect_no_route();
            tracing::trace!(
                request_id = %guard.stream_info.request_id(),
                "redirect for custom response failed: no route found"
            );
            return FilterAction::Continue;
        }

        guard.set_method(Method::GET);
        guard.remove_header(&header::CONTENT_LENGTH);

        if let Err(err) = guard.filter_state.set_data(
            CUSTOM_RESPONSE_FILTER_STATE_KEY,
            Arc::clone(this),
            Mutability::ReadOnly,
            Lifespan::Request,
        ) {
            debug_assert!(false, "marker already present: {err}");
            tracing::error!(
                request_id = %guard.stream_info.request_id(),
                error = %err,
                "could not mark request for custom response replay"
            );
            return FilterAction::Continue;
        }

        guard.request_replay();
        guard.commit();

        FilterAction::Replay
    }
}

impl std::fmt::Debug for RedirectPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedirectPolicy")
            .field("host", &self.host)
            .field("path", &self.path)
            .field("status_code", &self.status_code)
            .finish_non_exhaustive()
    }
}

fn scheme_is_http(ctx: &RequestCtx) -> bool {
    if ctx.scheme() == Some(&Scheme::HTTP) {
        return true;
    }
    !ctx.stream_info.downstream_encrypted
}

fn parse_redirect_uri(host: &str, path: &str) -> Result<RedirectTarget, ConfigError> {
    let invalid = || ConfigError::InvalidRedirectUri {
        uri: format!("{host}{path}"),
    };

    // The authority must come from `host` alone. Parsing the concatenation
    // would let the path supply the host: "https://" + "/x" reads as host
    // "x" under slash-collapsing URL semantics.
    let url = Url::parse(host).map_err(|_| invalid())?;

    let scheme = match url.scheme() {
        "http" => Scheme::HTTP,
        "https" => Scheme::HTTPS,
        _ => return Err(invalid()),
    };

    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(invalid());
    }

    let host_str = match url.host_str() {
        Some(h) if !h.is_empty() => h,
        _ => return Err(invalid()),
    };

    let host_and_port = match url.port().or_else(|| explicit_default_port(host, &url)) {
        Some(p) => format!("{host_str}:{p}"),
        None => host_str.to_string(),
    };

    if !path.starts_with('/') {
        return Err(invalid());
    }

    // A fragment is legal in a Location header but not in a request path;
    // a replayed request carrying one would be rejected as malformed, so
    // the fragment is stripped from what is actually set on the request.
    let path_and_query = match path.find('#') {
        Some(pos) => path[..pos].to_string(),
        None => path.to_string(),
    };

    Ok(RedirectTarget {
        scheme,
        host_and_port,
        path_and_query,
    })
}

/// `Url::port` reports `None` for a scheme's default port even when the
/// configuration spells it out. A route table keyed on "host:443" must
/// still match, so recover the port from the raw authority.
fn explicit_default_port(raw: &str, url: &Url) -> Option<u16> {
    let default = url.port_or_known_default()?;
    let suffix = format!(":{default}");
    raw.trim_end_matches('/').ends_with(&suffix).then_some(default)
}
