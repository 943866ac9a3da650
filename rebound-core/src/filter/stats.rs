use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for the custom-response filter, bound to a stats namespace.
#[derive(Debug)]
pub struct FilterStats {
    prefix: String,
    redirect_no_route: AtomicU64,
}

impl FilterStats {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            redirect_no_route: AtomicU64::new(0),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// A redirect was attempted but no route matched the rewritten request.
    pub fn inc_redirect_no_route(&self) {
        self.redirect_no_route.fetch_add(1, Ordering::Relaxed);
    }

    pub fn redirect_no_route(&self) -> u64 {
        self.redirect_no_route.load(Ordering::Relaxed)
    }
}
