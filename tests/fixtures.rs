//! Endpoint contract tests: every named fixture endpoint, the static-asset
//! fallback, and the universal cache-defeating header.

mod common;

use common::{get, get_with_headers, head, request, spawn_server, spawn_server_with};
use fixtured::config::FixturesConfig;
use fixtured::Config;
use std::time::{Duration, Instant};

fn config_with_delay(delay_ms: u64) -> Config {
    Config {
        fixtures: FixturesConfig {
            delay_ms,
            ..FixturesConfig::default()
        },
        ..Config::default()
    }
}

const NO_STORE: &str = "no-store, no-cache, must-revalidate, max-age=0";

#[tokio::test]
async fn main_page_serves_base_html() {
    let server = spawn_server();
    let resp = get(server.addr(), "/").await;

    assert_eq!(resp.status, 200);
    assert!(resp.body.contains(r#"<h1 id="hello">Hello</h1>"#));
    assert!(resp.body.contains(r#"<a id="link1" href="./1">link1</a>"#));
    assert_eq!(resp.header("cache-control"), Some(NO_STORE));
}

#[tokio::test]
async fn head_request_gets_headers_without_body() {
    let server = spawn_server();
    let resp = head(server.addr(), "/").await;

    assert_eq!(resp.status, 200);
    assert!(resp.body.is_empty());
    let length: usize = resp
        .header("content-length")
        .expect("content-length present")
        .parse()
        .expect("numeric");
    assert!(length > 0);
}

#[tokio::test]
async fn non_get_methods_are_rejected() {
    let server = spawn_server();
    let resp = request(server.addr(), "POST", "/", &[]).await;
    assert_eq!(resp.status, 405);
    assert_eq!(resp.header("allow"), Some("GET, HEAD"));
}

#[tokio::test]
async fn empty_endpoint_returns_204() {
    let server = spawn_server();
    let resp = get(server.addr(), "/empty").await;

    assert_eq!(resp.status, 204);
    assert!(resp.body.is_empty());
    assert_eq!(resp.header("cache-control"), Some(NO_STORE));
}

#[tokio::test]
async fn link_page_has_back_link() {
    let server = spawn_server();
    let resp = get(server.addr(), "/1").await;

    assert_eq!(resp.status, 200);
    assert!(resp.body.contains(r#"<h1 id="link1">Link1</h1>"#));
    assert!(resp.body.contains(r#"<a id="back1" href="./">back1</a>"#));
}

#[tokio::test]
async fn generic_redirect_chain_terminates() {
    let server = spawn_server();

    let hop = get(server.addr(), "/redirect1").await;
    assert_eq!(hop.status, 302);
    assert_eq!(hop.header("location"), Some("/redirect2"));

    let terminal = get(server.addr(), "/redirect2").await;
    assert_eq!(terminal.status, 200);
    assert!(terminal.body.contains(r#"<h1 id="red2">redirect2</h1>"#));
}

#[tokio::test]
async fn asset_redirect_points_at_served_file() {
    let server = spawn_server();

    let hop = get(server.addr(), "/redirect3").await;
    assert_eq!(hop.status, 302);
    let target = hop.header("location").expect("location header").to_string();

    let asset = get(server.addr(), &target).await;
    assert_eq!(asset.status, 200);
    assert_eq!(asset.header("content-type"), Some("text/html; charset=utf-8"));
}

#[tokio::test]
async fn resource_page_references_the_stylesheet() {
    let server = spawn_server();
    let resp = get(server.addr(), "/one-style.html").await;

    assert_eq!(resp.status, 200);
    assert!(resp.body.contains(r#"<link rel="stylesheet" href="/one-style.css">"#));
    assert!(resp.body.contains("hello, world!"));
}

#[tokio::test]
async fn css_redirect_chain_is_three_hops_then_css() {
    let server = spawn_server();

    let mut path = "/one-style.css".to_string();
    let mut redirects = 0;
    let terminal = loop {
        let resp = get(server.addr(), &path).await;
        if resp.status == 302 {
            redirects += 1;
            assert!(redirects <= 3, "chain longer than expected");
            path = resp.header("location").expect("location header").to_string();
        } else {
            break resp;
        }
    };

    assert_eq!(redirects, 3);
    assert_eq!(terminal.status, 200);
    assert_eq!(terminal.header("content-type"), Some("text/css"));
    assert_eq!(terminal.body, "body {box-sizing: border-box;}");
}

#[tokio::test]
async fn csp_endpoint_sets_policy_header() {
    let server = spawn_server();
    let resp = get(server.addr(), "/csp").await;

    assert_eq!(resp.status, 200);
    assert!(resp.body.is_empty());
    assert_eq!(
        resp.header("content-security-policy"),
        Some("script-src 'self'")
    );
}

#[tokio::test]
async fn auth_without_credentials_is_challenged() {
    let server = spawn_server();
    let resp = get(server.addr(), "/auth").await;

    assert_eq!(resp.status, 401);
    assert_eq!(resp.header("www-authenticate"), Some("Basic realm=JSL"));
    assert!(resp.body.is_empty());
}

#[tokio::test]
async fn auth_with_valid_credentials_succeeds() {
    let server = spawn_server();
    // base64("user:pass")
    let resp = get_with_headers(
        server.addr(),
        "/auth",
        &[("Authorization", "Basic dXNlcjpwYXNz")],
    )
    .await;

    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, "ok");
}

#[tokio::test]
async fn auth_with_wrong_password_is_challenged() {
    let server = spawn_server();
    // base64("user:wrong")
    let resp = get_with_headers(
        server.addr(),
        "/auth",
        &[("Authorization", "Basic dXNlcjp3cm9uZw==")],
    )
    .await;

    assert_eq!(resp.status, 401);
    assert_eq!(resp.header("www-authenticate"), Some("Basic realm=JSL"));
}

#[tokio::test]
async fn auth_with_malformed_payload_is_401_not_500() {
    let server = spawn_server();
    for bad in ["Basic !!!", "Basic dXNlcnBhc3M=", "Bearer dXNlcjpwYXNz"] {
        let resp = get_with_headers(server.addr(), "/auth", &[("Authorization", bad)]).await;
        assert_eq!(resp.status, 401, "header {bad:?} must be a 401");
    }
}

#[tokio::test]
async fn unmatched_paths_serve_assets() {
    let server = spawn_server();
    let resp = get(server.addr(), "/frame.html").await;

    assert_eq!(resp.status, 200);
    assert_eq!(resp.header("content-type"), Some("text/html; charset=utf-8"));
    assert!(resp.body.contains("frame-content"));
}

#[tokio::test]
async fn unknown_path_is_404() {
    let server = spawn_server();
    let resp = get(server.addr(), "/no-such-fixture.html").await;
    assert_eq!(resp.status, 404);
}

#[tokio::test]
async fn traversal_outside_asset_root_is_404() {
    let server = spawn_server();
    let resp = get(server.addr(), "/../Cargo.toml").await;
    assert_eq!(resp.status, 404);
}

#[tokio::test]
async fn query_strings_do_not_change_routing() {
    let server = spawn_server();
    let resp = get(server.addr(), "/empty?cache-bust=1").await;
    assert_eq!(resp.status, 204);
}

#[tokio::test]
async fn long_endpoint_waits_for_the_configured_delay() {
    let server = spawn_server_with(config_with_delay(200));

    let started = Instant::now();
    let resp = get(server.addr(), "/long").await;

    assert_eq!(resp.status, 200);
    assert!(resp.body.is_empty());
    assert!(
        started.elapsed() >= Duration::from_millis(200),
        "delayed response arrived too early"
    );
}

#[tokio::test]
async fn delayed_request_does_not_block_concurrent_requests() {
    let server = spawn_server_with(config_with_delay(400));
    let addr = server.addr();

    let long = tokio::spawn(async move {
        let resp = get(addr, "/long").await;
        (Instant::now(), resp)
    });
    // Give the delayed request a head start, then race it with a fast one.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let fast = tokio::spawn(async move {
        let resp = get(addr, "/").await;
        (Instant::now(), resp)
    });

    let (long_done, long_resp) = long.await.expect("long task");
    let (fast_done, fast_resp) = fast.await.expect("fast task");

    assert_eq!(long_resp.status, 200);
    assert_eq!(fast_resp.status, 200);
    assert!(
        fast_done < long_done,
        "fast request must complete while the delayed one is suspended"
    );
}
