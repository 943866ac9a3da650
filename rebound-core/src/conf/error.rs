use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    // IO
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Parsing
    #[error("failed to parse HCL in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: hcl::Error,
    },

    // Policy construction
    #[error("invalid uri specified for redirection for custom response: {uri}")]
    InvalidRedirectUri { uri: String },

    #[error("invalid status code {code} for custom response policy")]
    InvalidStatusCode { code: u16 },

    // Header mutations
    #[error("invalid header name '{name}': {source}")]
    InvalidHeaderName {
        name: String,
        #[source]
        source: http::header::InvalidHeaderName,
    },

    #[error("invalid header value for '{name}'")]
    InvalidHeaderValue { name: String },

    #[error("mutation of hop-by-hop header '{name}' is not allowed")]
    HopByHopHeader { name: String },

    #[error("header mutation '{name}' requires a value")]
    MissingValue { name: String },

    // Rule structure
    #[error("matcher block has no conditions")]
    EmptyMatcher,

    #[error("rule must configure exactly one policy (redirect or local_response)")]
    AmbiguousPolicy,

    #[error("redirect policy requests a request-mutation action, but none was provided")]
    MissingRequestAction,
}

impl ConfigError {
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: hcl::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}
