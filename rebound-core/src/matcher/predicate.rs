use crate::conf::ConfigError;
use crate::conf::types::PredicateConfig;
use crate::matcher::MatchingData;
use http::HeaderName;

/// Boolean predicate over a response snapshot.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Response status within `[min, max]` inclusive.
    StatusBetween { min: u16, max: u16 },

    /// Named response header present with exactly this value.
    HeaderExact { name: HeaderName, value: String },

    /// Named response header present with any value.
    HeaderPresent { name: HeaderName },

    All(Vec<Predicate>),
    Any(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn matches(&self, data: &MatchingData<'_>) -> bool {
        match self {
            Predicate::StatusBetween { min, max } => {
                let status = data.response_status.as_u16();
                (*min..=*max).contains(&status)
            }
            Predicate::HeaderExact { name, value } => data
                .response_headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|v| v == value)
                .unwrap_or(false),
            Predicate::HeaderPresent { name } => data.response_headers.contains_key(name),
            Predicate::All(inner) => inner.iter().all(|p| p.matches(data)),
            Predicate::Any(inner) => inner.iter().any(|p| p.matches(data)),
            Predicate::Not(inner) => !inner.matches(data),
        }
    }

    /// Build a predicate from one matcher block. Conditions listed together
    /// in the same block must all hold.
    pub fn from_config(cfg: &PredicateConfig) -> Result<Self, ConfigError> {
        let mut conditions = Vec::new();

        if cfg.status_min.is_some() || cfg.status_max.is_some() {
            conditions.push(Predicate::StatusBetween {
                min: cfg.status_min.unwrap_or(100),
                max: cfg.status_max.unwrap_or(599),
            });
        }

        if let Some(m) = &cfg.header_exact {
            conditions.push(Predicate::HeaderExact {
                name: parse_header_name(&m.name)?,
                value: m.value.clone(),
            });
        }

        if let Some(name) = &cfg.header_present {
            conditions.push(Predicate::HeaderPresent {
                name: parse_header_name(name)?,
            });
        }

        if !cfg.any_of.is_empty() {
            let parsed: Result<Vec<_>, _> =
                cfg.any_of.iter().map(Predicate::from_config).collect();
            conditions.push(Predicate::Any(parsed?));
        }

        if let Some(negated) = &cfg.not {
            conditions.push(Predicate::Not(Box::new(Predicate::from_config(negated)?)));
        }

        let mut conditions = conditions.into_iter();
        match (conditions.next(), conditions.len()) {
            (None, _) => Err(ConfigError::EmptyMatcher),
            (Some(only), 0) => Ok(only),
            (Some(first), _) => {
                let mut all = vec![first];
                all.extend(conditions);
                Ok(Predicate::All(all))
            }
        }
    }
}

fn parse_header_name(raw: &str) -> Result<HeaderName, ConfigError> {
    raw.parse()
        .map_err(|source| ConfigError::InvalidHeaderName {
            name: raw.to_string(),
            source,
        })
}
