mod predicate;
mod tree;


pub use predicate::Predicate;
pub use tree::{MatcherRule, MatcherTree};

use crate::policy::Policy;
use http::{HeaderMap, StatusCode};
use std::net::IpAddr;
use std::sync::Arc;

/// Immutable per-response snapshot evaluated by the decision matcher.
///
/// Assembled once per upstream response from the stream metadata and the
/// response headers, and discarded after evaluation.
#[derive(Debug)]
pub struct MatchingData<'a> {
    pub response_status: StatusCode,
    pub response_headers: &'a HeaderMap,
    pub peer_ip: IpAddr,
}

/// Action yielded by a matching rule.
#[derive(Clone)]
pub struct MatchAction {
    pub policy: Arc<Policy>,
}

impl std::fmt::Debug for MatchAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchAction").finish_non_exhaustive()
    }
}

/// Decision-tree contract consumed by the filter configuration.
///
/// Evaluation must be side-effect-free; the snapshot is read-only.
pub trait ResponseMatcher: Send + Sync {
    fn evaluate(&self, data: &MatchingData<'_>) -> Option<MatchAction>;
}
