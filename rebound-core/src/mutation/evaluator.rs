use crate::conf::ConfigError;
use crate::conf::types::{HeaderMutationConfig, MutationOp};
use crate::ctx::StreamInfo;
use http::{HeaderMap, HeaderName, HeaderValue, header};
use once_cell::sync::Lazy;
use smallvec::SmallVec;

/// Hop-by-hop headers are owned by the proxy core; mutation rules may not
/// touch them.
static HOP_BY_HOP: Lazy<[HeaderName; 4]> = Lazy::new(|| {
    [
        header::CONNECTION,
        HeaderName::from_static("keep-alive"),
        header::TRANSFER_ENCODING,
        header::UPGRADE,
    ]
});

/// Header value template. Supports the stream-level substitutions
/// `%REQUEST_ID%` and `%DOWNSTREAM_REMOTE_ADDRESS%`; anything else is
/// emitted verbatim.
#[derive(Debug, Clone)]
pub struct HeaderTemplate(String);

impl HeaderTemplate {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    fn render(&self, stream_info: &StreamInfo) -> Option<HeaderValue> {
        let mut out = self.0.clone();
        if out.contains("%REQUEST_ID%") {
            out = out.replace("%REQUEST_ID%", &stream_info.request_id().0);
        }
        if out.contains("%DOWNSTREAM_REMOTE_ADDRESS%") {
            out = out.replace(
                "%DOWNSTREAM_REMOTE_ADDRESS%",
                &stream_info.peer_ip.to_string(),
            );
        }
        HeaderValue::from_str(&out).ok()
    }
}

#[derive(Debug, Clone)]
pub enum HeaderMutation {
    /// Set the header, replacing any existing values.
    Add {
        name: HeaderName,
        value: HeaderTemplate,
    },

    /// Add a value without displacing existing ones.
    Append {
        name: HeaderName,
        value: HeaderTemplate,
    },

    Remove { name: HeaderName },
}

/// Ordered header-mutation rule set. Rules are applied in configuration
/// order; a later rule observes the effect of an earlier one.
#[derive(Debug, Clone, Default)]
pub struct HeaderMutations {
    rules: SmallVec<[HeaderMutation; 4]>,
}

impl HeaderMutations {
    pub fn from_config(configs: &[HeaderMutationConfig]) -> Result<Self, ConfigError> {
        let mut rules = SmallVec::new();

        for cfg in configs {
            let name: HeaderName =
                cfg.name
                    .parse()
                    .map_err(|source| ConfigError::InvalidHeaderName {
                        name: cfg.name.clone(),
                        source,
                    })?;

            if HOP_BY_HOP.contains(&name) {
                return Err(ConfigError::HopByHopHeader {
                    name: cfg.name.clone(),
                });
            }

            let rule = match cfg.op {
                MutationOp::Remove => HeaderMutation::Remove { name },
                op @ (MutationOp::Add | MutationOp::Append) => {
                    let raw = cfg.value.as_deref().ok_or(ConfigError::MissingValue {
                        name: cfg.name.clone(),
                    })?;

                    // Fail fast on values that can never render to a legal
                    // header value.
                    if HeaderValue::from_str(raw).is_err() && !raw.contains('%') {
                        return Err(ConfigError::InvalidHeaderValue {
                            name: cfg.name.clone(),
                        });
                    }

                    let value = HeaderTemplate::new(raw);
                    match op {
                        MutationOp::Add => HeaderMutation::Add { name, value },
                        _ => HeaderMutation::Append { name, value },
                    }
                }
            };

            rules.push(rule);
        }

        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply the rule set to `headers` in order. Side-effects the map only;
    /// a value that fails to render is skipped.
    pub fn evaluate(&self, headers: &mut HeaderMap, stream_info: &StreamInfo) {
        for rule in &self.rules {
            match rule {
                HeaderMutation::Add { name, value } => {
                    if let Some(v) = value.render(stream_info) {
                        headers.insert(name.clone(), v);
                    }
                }
                HeaderMutation::Append { name, value } => {
                    if let Some(v) = value.render(stream_info) {
                        headers.append(name.clone(), v);
                    }
                }
                HeaderMutation::Remove { name } => {
                    headers.remove(name);
                }
            }
        }
    }
}
