mod local_response;
mod redirect;
mod rollback;

#[cfg(test)]
mod tests;

pub use local_response::LocalResponsePolicy;
pub use redirect::{CUSTOM_RESPONSE_FILTER_STATE_KEY, RedirectPolicy};
pub use rollback::RollbackGuard;

use crate::ctx::{RequestCtx, ResponseCtx};
use std::sync::Arc;

/// Outcome of a policy invocation, consumed by the pipeline.
#[derive(Debug, PartialEq, Eq)]
pub enum FilterAction {
    /// Continue delivering the (possibly mutated) response.
    Continue,

    /// Stop processing the current response; the pipeline must recreate the
    /// request stream from the top of the filter chain.
    Replay,
}

/// Caller-supplied request edit applied during redirect initiation, after
/// the configured request-header mutations and before route recomputation.
///
/// The capability is injected when the policy is built; the policy itself
/// is passed read-only so the action can consult configured fields.
pub trait ModifyRequestHeadersAction: Send + Sync {
    fn modify_request_headers(&self, ctx: &mut RequestCtx, policy: &RedirectPolicy);
}

/// Behavior selected by the decision matcher for a matched response.
///
/// Policies are built at configuration-load time, one per configured rule,
/// and are stateless with respect to any single request: everything
/// per-request lives in the filter-state store or on the stack of one
/// invocation. The same instance therefore serves both the pre-redirect
/// and the post-replay invocation.
pub enum Policy {
    LocalResponse(LocalResponsePolicy),
    Redirect(RedirectPolicy),
}

impl Policy {
    /// Shared capability of all policy variants. Takes the owning `Arc` so
    /// the redirect variant can hand a reference to itself to the
    /// filter-state marker.
    pub fn on_response_headers(
        this: &Arc<Policy>,
        response: &mut ResponseCtx,
        ctx: &mut RequestCtx,
    ) -> FilterAction {
        match this.as_ref() {
            Policy::LocalResponse(p) => p.on_response_headers(response, ctx),
            Policy::Redirect(p) => p.on_response_headers(this, response, ctx),
        }
    }
}

impl std::fmt::Debug for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Policy::LocalResponse(_) => f.write_str("Policy::LocalResponse"),
            Policy::Redirect(p) => f
                .debug_struct("Policy::Redirect")
                .field("host", &p.host())
                .field("path", &p.path())
                .finish(),
        }
    }
}
