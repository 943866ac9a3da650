use crate::matcher::{MatchAction, MatchingData, Predicate, ResponseMatcher};
use crate::policy::Policy;
use std::sync::Arc;

pub struct MatcherRule {
    pub predicate: Predicate,
    pub policy: Arc<Policy>,
}

/// First-match-wins rule list over response snapshots.
///
/// The minimal concrete matcher shipped with the crate; anything richer can
/// be plugged in behind [`ResponseMatcher`].
pub struct MatcherTree {
    rules: Vec<MatcherRule>,
}

impl MatcherTree {
    pub fn new(rules: Vec<MatcherRule>) -> Self {
        Self { rules }
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl ResponseMatcher for MatcherTree {
    fn evaluate(&self, data: &MatchingData<'_>) -> Option<MatchAction> {
        self.rules
            .iter()
            .find(|rule| rule.predicate.matches(data))
            .map(|rule| MatchAction {
                policy: Arc::clone(&rule.policy),
            })
    }
}
