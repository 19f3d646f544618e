//! Static asset serving module
//!
//! Baseline behavior for every path no fixed endpoint claims: resolve the
//! normalized path inside the configured asset root and serve the file.

use crate::http::{self, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve a fixture asset, or 404 when the path does not resolve to a file
/// inside the asset root.
pub async fn serve_asset(
    asset_dir: &str,
    normalized_path: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    match load_asset(asset_dir, normalized_path).await {
        Some((content, content_type)) => http::build_asset_response(content, content_type, is_head),
        None => http::build_404_response(),
    }
}

/// Load an asset by its normalized (slash-trimmed, query-free) path.
pub async fn load_asset(asset_dir: &str, path: &str) -> Option<(Vec<u8>, &'static str)> {
    // Strip traversal sequences before joining; a leading slash left behind
    // by the replacement would make join() discard the asset root.
    let clean_path = path.replace("..", "");
    let clean_path = clean_path.trim_start_matches('/');
    let file_path = Path::new(asset_dir).join(clean_path);

    let asset_dir_canonical = match Path::new(asset_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Asset directory not found or inaccessible '{asset_dir}': {e}"
            ));
            return None;
        }
    };

    // Missing files are a routine 404, not worth a log line
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_path_canonical.starts_with(&asset_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }
    if !file_path_canonical.is_file() {
        return None;
    }

    let content = match fs::read(&file_path_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read asset '{}': {}",
                file_path_canonical.display(),
                e
            ));
            return None;
        }
    };

    let content_type =
        mime::get_content_type(file_path_canonical.extension().and_then(|e| e.to_str()));
    Some((content, content_type))
}
