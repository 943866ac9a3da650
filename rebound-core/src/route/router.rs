use crate::route::{RouteId, RouteProvider};
use anyhow::{Result, anyhow};

/// Virtual-host aware prefix router.
///
/// Each entry binds a host pattern (exact authority or `*`) and a path
/// prefix to a route id. The longest matching prefix wins within a host.
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<RouteEntry>,
}

#[derive(Debug)]
pub struct RouteEntry {
    pub host: String,
    pub path: String,
    pub id: RouteId,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_route(&mut self, host: &str, path: &str, id: RouteId) -> Result<()> {
        if !path.starts_with('/') {
            return Err(anyhow!("route path must start with '/': {}", path));
        }

        if self
            .routes
            .iter()
            .any(|r| r.host == host && r.path == path)
        {
            return Err(anyhow!("duplicate route for {}{}", host, path));
        }

        self.routes.push(RouteEntry {
            host: host.to_string(),
            path: path.to_string(),
            id,
        });

        // The longest prefix wins --> sort descending by path length.
        self.routes.sort_by(|a, b| b.path.len().cmp(&a.path.len()));

        Ok(())
    }

    pub(crate) fn route_count(&self) -> usize {
        self.routes.len()
    }
}

impl RouteProvider for Router {
    fn find_route(&self, host: &str, path: &str) -> Option<RouteId> {
        // A query string never participates in prefix matching.
        let path = path.split(['?', '#']).next().unwrap_or(path);

        self.routes
            .iter()
            .find(|r| host_matches(&r.host, host) && path_matches(&r.path, path))
            .map(|r| r.id.clone())
    }
}

fn host_matches(pattern: &str, host: &str) -> bool {
    pattern == "*" || pattern.eq_ignore_ascii_case(host)
}

fn path_matches(route_path: &str, request_path: &str) -> bool {
    if route_path == "/" {
        return true;
    }

    if request_path == route_path {
        return true;
    }

    request_path.starts_with(route_path)
        && request_path
            .as_bytes()
            .get(route_path.len())
            .map(|b| *b == b'/')
            .unwrap_or(false)
}
