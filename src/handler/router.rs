//! Request pipeline module
//!
//! Entry point for HTTP request processing. Every request runs the same
//! resolution order: method check, one-shot callback, precondition, override
//! headers, then dispatch to a fixed endpoint or the static responder.

use crate::handler::{fixtures, static_files};
use crate::http;
use crate::logger;
use crate::registry::{self, RecordedRequest};
use crate::server::AppState;
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderName, HeaderValue};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let raw_path = req.uri().path().to_string();
    let is_head = method == Method::HEAD;

    if !matches!(method, Method::GET | Method::HEAD) {
        logger::log_warning(&format!("Method not allowed: {method} {raw_path}"));
        let response = http::build_405_response();
        log_outcome(&state, response.status().as_u16(), method.as_str(), &raw_path);
        return Ok(response);
    }

    let recorded = RecordedRequest::from_request(&req);
    let path = registry::normalize_path(&raw_path);

    // 1. One-shot callback fires before anything else, even for paths that
    //    will end in a 404.
    if let Some(callback) = state.registry.take_callback(&path) {
        callback(&recorded);
    }

    // 2. Precondition gates the response; it is consumed before it runs, so
    //    a failing one is not retried. Failure surfaces as a 500.
    if let Some(precondition) = state.registry.take_precondition(&path) {
        if let Err(e) = precondition.run().await {
            logger::log_error(&format!("Precondition for '{raw_path}': {e}"));
            let response = http::build_500_response();
            log_outcome(&state, response.status().as_u16(), method.as_str(), &raw_path);
            return Ok(response);
        }
    }

    // 3. Resolve override headers (consumes a one-time set) before dispatch.
    let extra_headers = state.registry.headers_for_request(&path);

    // 4. Fixed endpoint or static fallback.
    let mut response = dispatch(&path, &recorded, &state, is_head).await;

    // 5. Override headers win over whatever the handler set.
    apply_extra_headers(&mut response, extra_headers);

    log_outcome(&state, response.status().as_u16(), method.as_str(), &raw_path);
    Ok(response)
}

/// Map a normalized path to its fixture endpoint, falling through to the
/// static responder.
async fn dispatch(
    path: &str,
    recorded: &RecordedRequest,
    state: &Arc<AppState>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    match path {
        "" => fixtures::main_page(is_head),
        "empty" => http::build_204_response(),
        "long" => fixtures::long_delay(&state.config.fixtures).await,
        "1" => fixtures::link1_page(is_head),
        "redirect1" => http::build_redirect_response("/redirect2"),
        "redirect2" => fixtures::redirect2_page(is_head),
        "redirect3" => http::build_redirect_response("/one-frame.html"),
        "one-style.html" => fixtures::resource_page(is_head),
        "one-style.css" => http::build_redirect_response("/two-style.css"),
        "two-style.css" => http::build_redirect_response("/three-style.css"),
        "three-style.css" => http::build_redirect_response("/four-style.css"),
        "four-style.css" => fixtures::final_css(is_head),
        "csp" => fixtures::csp_page(),
        "auth" => fixtures::auth_page(
            recorded.header("authorization"),
            &state.config.auth,
            is_head,
        ),
        _ => static_files::serve_asset(&state.config.fixtures.asset_dir, path, is_head).await,
    }
}

/// Insert registered override headers, replacing same-named handler headers.
/// Invalid names or values are dropped with a warning rather than failing
/// the response.
fn apply_extra_headers(response: &mut Response<Full<Bytes>>, headers: Vec<(String, String)>) {
    for (name, value) in headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            (Ok(header_name), Ok(header_value)) => {
                response.headers_mut().insert(header_name, header_value);
            }
            _ => logger::log_warning(&format!("Dropping invalid override header '{name}'")),
        }
    }
}

fn log_outcome(state: &Arc<AppState>, status: u16, method: &str, path: &str) {
    if status >= 500 {
        logger::log_handler_error(status, method, path);
    } else if state.config.logging.access_log {
        logger::log_access(status, method, path);
    }
}
