//! HTTP response building module
//!
//! Builders for every canned response shape the fixture endpoints produce.
//! All builders set the no-store `Cache-Control` header so the browser under
//! test never serves a fixture from its cache.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Applied to every response; test runs must never hit the browser cache.
pub const NO_STORE: &str = "no-store, no-cache, must-revalidate, max-age=0";

/// Base builder with the universal cache-defeating header already set.
fn base(status: u16) -> hyper::http::response::Builder {
    Response::builder()
        .status(status)
        .header("Cache-Control", NO_STORE)
}

fn finish(
    builder: hyper::http::response::Builder,
    body: Bytes,
    label: &str,
) -> Response<Full<Bytes>> {
    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error(label, &e);
        Response::new(Full::new(Bytes::new()))
    })
}

fn body_bytes(content: &str, is_head: bool) -> Bytes {
    if is_head {
        Bytes::new()
    } else {
        Bytes::from(content.to_owned())
    }
}

/// Build 200 HTML response
pub fn build_html_response(content: &str, is_head: bool) -> Response<Full<Bytes>> {
    let builder = base(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content.len());
    finish(builder, body_bytes(content, is_head), "HTML")
}

/// Build 200 CSS response
pub fn build_css_response(content: &str, is_head: bool) -> Response<Full<Bytes>> {
    let builder = base(200)
        .header("Content-Type", "text/css")
        .header("Content-Length", content.len());
    finish(builder, body_bytes(content, is_head), "CSS")
}

/// Build 200 plain text response
pub fn build_text_response(content: &str, is_head: bool) -> Response<Full<Bytes>> {
    let builder = base(200)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Content-Length", content.len());
    finish(builder, body_bytes(content, is_head), "text")
}

/// Build 204 No Content response
pub fn build_204_response() -> Response<Full<Bytes>> {
    finish(base(204), Bytes::new(), "204")
}

/// Build 200 response with an empty body (the delayed handler's reply)
pub fn build_empty_ok_response() -> Response<Full<Bytes>> {
    finish(base(200).header("Content-Length", 0), Bytes::new(), "200")
}

/// Build 302 redirect response
pub fn build_redirect_response(target: &str) -> Response<Full<Bytes>> {
    let builder = base(302).header("Location", target);
    finish(builder, Bytes::new(), "302")
}

/// Build 200 empty response carrying a Content-Security-Policy header
pub fn build_csp_response(policy: &str) -> Response<Full<Bytes>> {
    let builder = base(200)
        .header("Content-Security-Policy", policy)
        .header("Content-Length", 0);
    finish(builder, Bytes::new(), "CSP")
}

/// Build 401 response with a Basic challenge
pub fn build_401_response(realm: &str) -> Response<Full<Bytes>> {
    let builder = base(401).header("WWW-Authenticate", format!("Basic realm={realm}"));
    finish(builder, Bytes::new(), "401")
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    let builder = base(404).header("Content-Type", "text/plain");
    finish(builder, Bytes::from("404 Not Found"), "404")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    let builder = base(405)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD");
    finish(builder, Bytes::from("405 Method Not Allowed"), "405")
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<Full<Bytes>> {
    let builder = base(500).header("Content-Type", "text/plain");
    finish(builder, Bytes::from("500 Internal Server Error"), "500")
}

/// Build 200 response for a static asset
pub fn build_asset_response(
    content: Vec<u8>,
    content_type: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };
    let builder = base(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length);
    finish(builder, body, "asset")
}

/// Log response build error
fn log_build_error(label: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {label} response: {error}"));
}
