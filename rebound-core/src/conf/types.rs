use serde::Deserialize;

/// Top-level custom-response filter configuration.
///
/// ```hcl
/// stat_prefix = "gateway"
///
/// rules = [
///   {
///     matcher = { status_min = 500, status_max = 599 }
///     policy = {
///       redirect = {
///         host        = "https://fallback.example.com"
///         path        = "/busy"
///         status_code = 302
///       }
///     }
///   }
/// ]
/// ```
#[derive(Debug, Deserialize, Default)]
pub struct CustomResponseConfig {
    pub stat_prefix: Option<String>,

    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Deserialize)]
pub struct RuleConfig {
    pub matcher: PredicateConfig,
    pub policy: PolicyConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct PredicateConfig {
    pub status_min: Option<u16>,
    pub status_max: Option<u16>,

    pub header_exact: Option<HeaderMatchConfig>,
    pub header_present: Option<String>,

    /// Alternatives; at least one of them must match.
    #[serde(default)]
    pub any_of: Vec<PredicateConfig>,

    pub not: Option<Box<PredicateConfig>>,
}

#[derive(Debug, Deserialize)]
pub struct HeaderMatchConfig {
    pub name: String,
    pub value: String,
}

/// Exactly one of the two policy blocks must be present.
#[derive(Debug, Deserialize)]
pub struct PolicyConfig {
    pub redirect: Option<RedirectPolicyConfig>,
    pub local_response: Option<LocalResponseConfig>,
}

#[derive(Debug, Deserialize)]
pub struct RedirectPolicyConfig {
    /// Scheme plus authority of the redirect target, e.g.
    /// `https://fallback.example.com`.
    pub host: String,

    /// Path (and optional query) on the target.
    pub path: String,

    /// Applied to the replayed response when present.
    pub status_code: Option<u16>,

    #[serde(default)]
    pub response_headers: Vec<HeaderMutationConfig>,

    #[serde(default)]
    pub request_headers: Vec<HeaderMutationConfig>,

    /// When true, the request-mutation action injected at build time is
    /// invoked during redirect initiation.
    #[serde(default)]
    pub modify_request_headers: bool,
}

#[derive(Debug, Deserialize)]
pub struct LocalResponseConfig {
    pub status_code: Option<u16>,
    pub body: Option<String>,
    pub content_type: Option<String>,

    #[serde(default)]
    pub response_headers: Vec<HeaderMutationConfig>,
}

#[derive(Debug, Deserialize)]
pub struct HeaderMutationConfig {
    pub name: String,
    pub value: Option<String>,

    #[serde(default)]
    pub op: MutationOp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MutationOp {
    #[default]
    Add,
    Append,
    Remove,
}
