use crate::conf::parse_custom_response_str;
use crate::conf::types::MutationOp;
use pretty_assertions::assert_eq;
use std::path::Path;

const FULL_CONFIG: &str = r#"
stat_prefix = "gateway"

rules = [
  {
    matcher = { status_min = 500, status_max = 599 }
    policy = {
      redirect = {
        host        = "https://fallback.example.com"
        path        = "/busy"
        status_code = 302

        response_headers = [
          { name = "x-custom-response", value = "redirect" }
        ]

        request_headers = [
          { name = "x-stale", op = "remove" }
        ]
      }
    }
  },
  {
    matcher = {
      header_exact = { name = "x-error-source", value = "backend" }
    }
    policy = {
      local_response = {
        status_code = 503
        body        = "upstream unavailable"
      }
    }
  }
]
"#;

#[test]
fn parses_rules_matchers_and_policies() {
    let cfg =
        parse_custom_response_str(FULL_CONFIG, Path::new("<inline>")).expect("parse");

    assert_eq!(cfg.stat_prefix.as_deref(), Some("gateway"));
    assert_eq!(cfg.rules.len(), 2);

    let first = &cfg.rules[0];
    assert_eq!(first.matcher.status_min, Some(500));
    assert_eq!(first.matcher.status_max, Some(599));

    let redirect = first.policy.redirect.as_ref().expect("redirect policy");
    assert_eq!(redirect.host, "https://fallback.example.com");
    assert_eq!(redirect.path, "/busy");
    assert_eq!(redirect.status_code, Some(302));
    assert_eq!(redirect.response_headers.len(), 1);
    assert_eq!(redirect.response_headers[0].op, MutationOp::Add);
    assert_eq!(redirect.request_headers[0].op, MutationOp::Remove);
    assert!(first.policy.local_response.is_none());

    let second = &cfg.rules[1];
    let matched = second.matcher.header_exact.as_ref().expect("header matcher");
    assert_eq!(matched.name, "x-error-source");

    let local = second.policy.local_response.as_ref().expect("local policy");
    assert_eq!(local.status_code, Some(503));
    assert_eq!(local.body.as_deref(), Some("upstream unavailable"));
}

#[test]
fn empty_config_has_no_rules() {
    let cfg = parse_custom_response_str("", Path::new("<inline>")).expect("parse");
    assert!(cfg.rules.is_empty());
    assert!(cfg.stat_prefix.is_none());
}

#[test]
fn malformed_hcl_is_a_parse_error() {
    let err = parse_custom_response_str("rule {", Path::new("<inline>")).expect_err("parse");
    assert!(err.to_string().contains("<inline>"));
}
