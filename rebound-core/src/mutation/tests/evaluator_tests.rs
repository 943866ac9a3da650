use crate::conf::ConfigError;
use crate::conf::types::{HeaderMutationConfig, MutationOp};
use crate::ctx::StreamInfo;
use crate::mutation::HeaderMutations;
use http::HeaderMap;
use pretty_assertions::assert_eq;
use std::net::{IpAddr, Ipv4Addr};

fn mutation(name: &str, value: Option<&str>, op: MutationOp) -> HeaderMutationConfig {
    HeaderMutationConfig {
        name: name.to_string(),
        value: value.map(str::to_string),
        op,
    }
}

fn stream_info() -> StreamInfo {
    StreamInfo::new(IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7)), false)
}

#[test]
fn add_replaces_existing_values() {
    let rules = HeaderMutations::from_config(&[mutation(
        "x-origin",
        Some("fallback"),
        MutationOp::Add,
    )])
    .expect("build");

    let mut headers = HeaderMap::new();
    headers.insert("x-origin", "upstream".parse().expect("value"));
    headers.append("x-origin", "upstream-2".parse().expect("value"));

    rules.evaluate(&mut headers, &stream_info());

    let values: Vec<_> = headers.get_all("x-origin").iter().collect();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0], "fallback");
}

#[test]
fn append_keeps_existing_values() {
    let rules =
        HeaderMutations::from_config(&[mutation("via", Some("rebound"), MutationOp::Append)])
            .expect("build");

    let mut headers = HeaderMap::new();
    headers.insert("via", "upstream".parse().expect("value"));

    rules.evaluate(&mut headers, &stream_info());

    let values: Vec<_> = headers.get_all("via").iter().collect();
    assert_eq!(values.len(), 2);
}

#[test]
fn rules_apply_in_configuration_order() {
    let rules = HeaderMutations::from_config(&[
        mutation("x-flag", Some("set"), MutationOp::Add),
        mutation("x-flag", None, MutationOp::Remove),
    ])
    .expect("build");

    let mut headers = HeaderMap::new();
    rules.evaluate(&mut headers, &stream_info());

    assert!(!headers.contains_key("x-flag"));
}

#[test]
fn stream_substitutions_render() {
    let rules = HeaderMutations::from_config(&[
        mutation("x-request-id", Some("%REQUEST_ID%"), MutationOp::Add),
        mutation(
            "x-forwarded-for",
            Some("%DOWNSTREAM_REMOTE_ADDRESS%"),
            MutationOp::Add,
        ),
    ])
    .expect("build");

    let si = stream_info();
    let mut headers = HeaderMap::new();
    rules.evaluate(&mut headers, &si);

    assert_eq!(
        headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .expect("request id"),
        si.request_id().0
    );
    assert_eq!(
        headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .expect("peer"),
        "203.0.113.7"
    );
}

#[test]
fn hop_by_hop_headers_are_rejected() {
    let err = HeaderMutations::from_config(&[mutation(
        "connection",
        Some("close"),
        MutationOp::Add,
    )])
    .expect_err("hop-by-hop");

    assert!(matches!(err, ConfigError::HopByHopHeader { .. }));
}

#[test]
fn add_without_value_is_rejected() {
    let err = HeaderMutations::from_config(&[mutation("x-flag", None, MutationOp::Add)])
        .expect_err("missing value");

    assert!(matches!(err, ConfigError::MissingValue { .. }));
}

#[test]
fn invalid_header_name_is_rejected() {
    let err = HeaderMutations::from_config(&[mutation(
        "not a header",
        Some("x"),
        MutationOp::Add,
    )])
    .expect_err("invalid name");

    assert!(matches!(err, ConfigError::InvalidHeaderName { .. }));
}
