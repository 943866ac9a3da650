use crate::conf::ConfigError;
use crate::conf::types::{CustomResponseConfig, PolicyConfig, RuleConfig};
use crate::filter::{FilterConfig, FilterStats};
use crate::matcher::{MatcherRule, MatcherTree, Predicate};
use crate::policy::{LocalResponsePolicy, ModifyRequestHeadersAction, Policy, RedirectPolicy};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Build-time context for assembling the filter configuration.
///
/// The request-mutation action is a capability injected by the embedder;
/// the core performs no registry lookups.
#[derive(Default)]
pub struct BuildCtx {
    pub modify_request_headers_action: Option<Arc<dyn ModifyRequestHeadersAction>>,
}

pub fn build_filter_config(cfg: &CustomResponseConfig, build_ctx: &BuildCtx) -> Result<FilterConfig> {
    let prefix = cfg.stat_prefix.as_deref().unwrap_or("custom_response");
    let stats = Arc::new(FilterStats::new(prefix));

    if cfg.rules.is_empty() {
        return Ok(FilterConfig::new(None, stats));
    }

    let mut rules = Vec::with_capacity(cfg.rules.len());

    for (index, rule) in cfg.rules.iter().enumerate() {
        let built = build_rule(rule, build_ctx, &stats)
            .with_context(|| format!("failed to build custom response rule {index}"))?;
        rules.push(built);
    }

    Ok(FilterConfig::new(
        Some(Box::new(MatcherTree::new(rules))),
        stats,
    ))
}

fn build_rule(
    rule: &RuleConfig,
    build_ctx: &BuildCtx,
    stats: &Arc<FilterStats>,
) -> Result<MatcherRule, ConfigError> {
    let predicate = Predicate::from_config(&rule.matcher)?;
    let policy = build_policy(&rule.policy, build_ctx, stats)?;

    Ok(MatcherRule {
        predicate,
        policy: Arc::new(policy),
    })
}

fn build_policy(
    cfg: &PolicyConfig,
    build_ctx: &BuildCtx,
    stats: &Arc<FilterStats>,
) -> Result<Policy, ConfigError> {
    match (&cfg.redirect, &cfg.local_response) {
        (Some(redirect), None) => {
            let action = if redirect.modify_request_headers {
                let action = build_ctx
                    .modify_request_headers_action
                    .as_ref()
                    .ok_or(ConfigError::MissingRequestAction)?;
                Some(Arc::clone(action))
            } else {
                None
            };

            let policy = RedirectPolicy::from_config(redirect, action, Arc::clone(stats))?;
            Ok(Policy::Redirect(policy))
        }
        (None, Some(local)) => Ok(Policy::LocalResponse(LocalResponsePolicy::from_config(
            local,
        )?)),
        _ => Err(ConfigError::AmbiguousPolicy),
    }
}
