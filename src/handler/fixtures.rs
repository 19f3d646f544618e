//! Fixed handler set
//!
//! The named fixture endpoints: canned HTML bodies, redirect chains, the
//! delayed responder, the CSP header endpoint, and Basic-auth checking.
//! Each is a pure function from request to response; the only shared state
//! is configuration.

use crate::config::{AuthConfig, FixturesConfig};
use crate::http::{self, auth};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::time::Duration;

const BASE_HTML: &str = r#"
<html>
<head><title>main</title></head>
<body>
<h1 id="hello">Hello</h1>
<a id="link1" href="./1">link1</a>
<a id="link2" href="./2">link2</a>
</body>
</html>
"#;

const LINK1_HTML: &str = r#"
<head><title>link1</title></head>
<h1 id="link1">Link1</h1>
<a id="back1" href="./">back1</a>
"#;

const REDIRECT2_HTML: &str = r#"<h1 id="red2">redirect2</h1>"#;

const RESOURCE_PAGE_HTML: &str =
    r#"<link rel="stylesheet" href="/one-style.css"><div>hello, world!</div>"#;

const FINAL_CSS: &str = "body {box-sizing: border-box;}";

const CSP_POLICY: &str = "script-src 'self'";

/// `/` — fixed HTML with two links.
pub fn main_page(is_head: bool) -> Response<Full<Bytes>> {
    http::build_html_response(BASE_HTML, is_head)
}

/// `/1` — link page fragment.
pub fn link1_page(is_head: bool) -> Response<Full<Bytes>> {
    http::build_html_response(LINK1_HTML, is_head)
}

/// `/redirect2` — terminal hop of the generic redirect chain.
pub fn redirect2_page(is_head: bool) -> Response<Full<Bytes>> {
    http::build_html_response(REDIRECT2_HTML, is_head)
}

/// `/one-style.html` — page referencing the stylesheet that starts the CSS
/// redirect chain.
pub fn resource_page(is_head: bool) -> Response<Full<Bytes>> {
    http::build_html_response(RESOURCE_PAGE_HTML, is_head)
}

/// `/four-style.css` — terminal hop of the four-deep CSS redirect chain.
pub fn final_css(is_head: bool) -> Response<Full<Bytes>> {
    http::build_css_response(FINAL_CSS, is_head)
}

/// `/long` — suspend for the configured delay without blocking other
/// requests, then respond with an empty body.
pub async fn long_delay(fixtures: &FixturesConfig) -> Response<Full<Bytes>> {
    tokio::time::sleep(Duration::from_millis(fixtures.delay_ms)).await;
    http::build_empty_ok_response()
}

/// `/csp` — empty body with a Content-Security-Policy header.
pub fn csp_page() -> Response<Full<Bytes>> {
    http::build_csp_response(CSP_POLICY)
}

/// `/auth` — Basic-auth gate. Any missing, malformed, or incorrect
/// credential produces the 401 challenge; valid credentials produce `ok`.
pub fn auth_page(
    authorization: Option<&str>,
    config: &AuthConfig,
    is_head: bool,
) -> Response<Full<Bytes>> {
    if auth::check_basic_auth(authorization, &config.username, &config.password) {
        http::build_text_response("ok", is_head)
    } else {
        http::build_401_response(&config.realm)
    }
}
