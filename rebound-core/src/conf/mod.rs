mod build;
mod error;
mod parse;
pub mod types;

#[cfg(test)]
mod tests;

pub use build::{BuildCtx, build_filter_config};
pub use error::ConfigError;
pub use parse::{parse_custom_response, parse_custom_response_str};
