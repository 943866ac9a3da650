use crate::route::{RouteId, RouteProvider, Router};

fn router() -> Router {
    let mut r = Router::new();
    r.add_route("app.example.com", "/", RouteId::new("root"))
        .expect("add");
    r.add_route("app.example.com", "/api", RouteId::new("api"))
        .expect("add");
    r.add_route("app.example.com", "/api/v2", RouteId::new("api-v2"))
        .expect("add");
    r.add_route("*", "/health", RouteId::new("health"))
        .expect("add");
    r
}

#[test]
fn longest_prefix_wins() {
    let r = router();

    let id = r.find_route("app.example.com", "/api/v2/users").expect("route");
    assert_eq!(id.as_str(), "api-v2");

    let id = r.find_route("app.example.com", "/api/users").expect("route");
    assert_eq!(id.as_str(), "api");
}

#[test]
fn prefix_must_end_on_segment_boundary() {
    let r = router();

    // "/apiary" shares bytes with "/api" but is a different segment.
    let id = r.find_route("app.example.com", "/apiary").expect("route");
    assert_eq!(id.as_str(), "root");
}

#[test]
fn host_matching_is_case_insensitive_and_exact() {
    let r = router();

    assert!(r.find_route("APP.Example.Com", "/api").is_some());
    assert!(r.find_route("other.example.com", "/api").is_none());
}

#[test]
fn wildcard_host_matches_any_authority() {
    let r = router();

    let id = r.find_route("whatever.example.net", "/health").expect("route");
    assert_eq!(id.as_str(), "health");
}

#[test]
fn query_and_fragment_are_ignored_for_matching() {
    let r = router();

    let id = r
        .find_route("app.example.com", "/api/v2?page=1")
        .expect("route");
    assert_eq!(id.as_str(), "api-v2");
}

#[test]
fn duplicate_route_is_rejected() {
    let mut r = router();
    let err = r
        .add_route("app.example.com", "/api", RouteId::new("dup"))
        .expect_err("duplicate");
    assert!(err.to_string().contains("duplicate route"));
}

#[test]
fn path_must_be_rooted() {
    let mut r = Router::new();
    assert!(r.add_route("*", "no-slash", RouteId::new("x")).is_err());
    assert_eq!(r.route_count(), 0);
}
