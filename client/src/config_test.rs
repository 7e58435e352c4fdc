use super::*;

#[test]
fn localhost_resolves_to_local_backend() {
    let config = ApiConfig::resolve(None, "localhost");
    assert_eq!(config.base_url, LOCAL_API_BASE_URL);
    let config = ApiConfig::resolve(None, "127.0.0.1");
    assert_eq!(config.base_url, LOCAL_API_BASE_URL);
}

#[test]
fn other_hosts_resolve_to_production_backend() {
    let config = ApiConfig::resolve(None, "ecowatch.example.org");
    assert_eq!(config.base_url, PRODUCTION_API_BASE_URL);
}

#[test]
fn override_wins_and_drops_trailing_slash() {
    let config = ApiConfig::resolve(Some("https://api.test/"), "localhost");
    assert_eq!(config.base_url, "https://api.test");
}

#[test]
fn blank_override_is_ignored() {
    let config = ApiConfig::resolve(Some("   "), "localhost");
    assert_eq!(config.base_url, LOCAL_API_BASE_URL);
}

#[test]
fn endpoint_joins_path() {
    let config = ApiConfig { base_url: "http://api".to_owned() };
    assert_eq!(config.endpoint("/api/auth/me"), "http://api/api/auth/me");
}

#[test]
fn route_matches_exact_and_wildcard() {
    assert!(route_matches("/dashboard", "/dashboard"));
    assert!(!route_matches("/dashboard", "/dashboard/map"));
    assert!(route_matches("/dashboard/*", "/dashboard/map"));
    assert!(!route_matches("/dashboard/*", "/map"));
}
