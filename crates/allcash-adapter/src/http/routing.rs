/*
[INPUT]:  Endpoint paths supplied by callers (possibly legacy names)
[OUTPUT]: Canonical endpoint paths with a leading slash
[POS]:    HTTP layer - endpoint normalization and legacy route rewrites
[UPDATE]: When the broker renames endpoints that old callers still use
*/

/// Canonical endpoint for opening trades
pub const OPEN_TRADE_ENDPOINT: &str = "/trades/open";

/// How a legacy route entry matches an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMatch {
    Prefix(&'static str),
    Exact(&'static str),
}

impl RouteMatch {
    fn matches(&self, endpoint: &str) -> bool {
        match self {
            RouteMatch::Prefix(prefix) => endpoint.starts_with(prefix),
            RouteMatch::Exact(path) => endpoint == *path,
        }
    }
}

/// Old endpoint names and the path they are served from today.
///
/// Matching is purely by name; first match wins.
pub const LEGACY_ROUTES: &[(RouteMatch, &str)] = &[
    (RouteMatch::Prefix("/signal/trade"), OPEN_TRADE_ENDPOINT),
    (RouteMatch::Exact("/trade"), OPEN_TRADE_ENDPOINT),
];

/// Normalize an endpoint to start with `/` and apply legacy rewrites
pub fn resolve_endpoint(endpoint: &str) -> String {
    let normalized = if endpoint.starts_with('/') {
        endpoint.to_string()
    } else {
        format!("/{endpoint}")
    };

    LEGACY_ROUTES
        .iter()
        .find(|(rule, _)| rule.matches(&normalized))
        .map(|(_, target)| (*target).to_string())
        .unwrap_or(normalized)
}
