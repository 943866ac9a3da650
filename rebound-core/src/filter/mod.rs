mod stats;


pub use stats::FilterStats;

use crate::ctx::{RequestCtx, ResponseCtx, StreamInfo};
use crate::matcher::{MatchingData, ResponseMatcher};
use crate::policy::{CUSTOM_RESPONSE_FILTER_STATE_KEY, FilterAction, Policy};
use std::sync::Arc;

/// Immutable configuration of the custom-response filter: the decision
/// matcher bound to a stats namespace.
pub struct FilterConfig {
    matcher: Option<Box<dyn ResponseMatcher>>,
    stats: Arc<FilterStats>,
}

impl FilterConfig {
    /// A matcher may be absent, in which case every response passes
    /// through.
    pub fn new(matcher: Option<Box<dyn ResponseMatcher>>, stats: Arc<FilterStats>) -> Self {
        Self { matcher, stats }
    }

    pub fn stats(&self) -> &Arc<FilterStats> {
        &self.stats
    }

    /// Evaluate the decision matcher against this response and return the
    /// selected policy, if any. Side-effect-free: the snapshot is built
    /// from borrows and discarded after evaluation.
    pub fn select_policy(
        &self,
        response: &ResponseCtx,
        stream_info: &StreamInfo,
    ) -> Option<Arc<Policy>> {
        let matcher = self.matcher.as_ref()?;

        let data = MatchingData {
            response_status: response.status,
            response_headers: &response.headers,
            peer_ip: stream_info.peer_ip,
        };

        matcher.evaluate(&data).map(|action| action.policy)
    }
}

impl std::fmt::Debug for FilterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterConfig")
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// Per-stream entry point invoked by the pipeline on response headers.
///
/// On the original response the policy comes from matcher evaluation; on a
/// replayed response the filter-state marker short-circuits selection and
/// re-invokes the policy that initiated the redirect.
pub struct CustomResponseFilter {
    config: Arc<FilterConfig>,
}

impl CustomResponseFilter {
    pub fn new(config: Arc<FilterConfig>) -> Self {
        Self { config }
    }

    pub fn on_upstream_response(
        &self,
        response: &mut ResponseCtx,
        ctx: &mut RequestCtx,
    ) -> FilterAction {
        let policy = match ctx
            .filter_state
            .get_read_only::<Policy>(CUSTOM_RESPONSE_FILTER_STATE_KEY)
        {
            Some(marker) => marker,
            None => match self.config.select_policy(response, &ctx.stream_info) {
                Some(policy) => policy,
                None => return FilterAction::Continue,
            },
        };

        Policy::on_response_headers(&policy, response, ctx)
    }
}
