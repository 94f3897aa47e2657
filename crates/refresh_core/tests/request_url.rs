use pretty_assertions::assert_eq;
use refresh_core::{build_request_url, refresh_param, Endpoint};
use url::Url;

#[test]
fn current_path_replaces_query_and_fragment() {
    let page = Url::parse("https://example.com/finance/?sort=desc#top").unwrap();
    let url = build_request_url(&page, &Endpoint::CurrentPath, "plot").unwrap();
    assert_eq!(url.as_str(), "https://example.com/finance/?refresh-plot");
}

#[test]
fn relative_endpoint_follows_url_join_rules() {
    let page = Url::parse("https://example.com/questrade/accounts").unwrap();
    let url = build_request_url(&page, &Endpoint::Relative("go".to_string()), "live").unwrap();
    assert_eq!(url.as_str(), "https://example.com/questrade/go?refresh-live");

    let url =
        build_request_url(&page, &Endpoint::Relative("/api/refresh".to_string()), "live").unwrap();
    assert_eq!(url.as_str(), "https://example.com/api/refresh?refresh-live");
}

#[test]
fn refresh_param_is_prefixed_token() {
    assert_eq!(refresh_param("account"), "refresh-account");
}
