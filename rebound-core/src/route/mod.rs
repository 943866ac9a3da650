mod router;

#[cfg(test)]
mod tests;

pub use router::{RouteEntry, Router};

use std::sync::Arc;

/// Identity of a resolved route.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct RouteId(Arc<str>);

impl RouteId {
    pub fn new(s: impl Into<Arc<str>>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Route resolution as consumed by the filter pipeline.
///
/// Implementations must be side-effect-free: resolution for the same
/// host/path pair is repeatable within one request.
pub trait RouteProvider: std::fmt::Debug + Send + Sync {
    fn find_route(&self, host: &str, path: &str) -> Option<RouteId>;
}
