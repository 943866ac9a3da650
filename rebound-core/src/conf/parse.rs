use crate::conf::ConfigError;
use crate::conf::types::CustomResponseConfig;
use std::fs;
use std::path::Path;

pub fn parse_custom_response(path: &Path) -> Result<CustomResponseConfig, ConfigError> {
    let s = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    parse_custom_response_str(&s, path)
}

pub fn parse_custom_response_str(
    s: &str,
    origin: &Path,
) -> Result<CustomResponseConfig, ConfigError> {
    hcl::from_str(s).map_err(|e| ConfigError::parse(origin, e))
}
