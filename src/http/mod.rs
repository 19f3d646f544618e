//! HTTP protocol layer module
//!
//! Response builders, MIME detection, and Basic-auth parsing, decoupled from
//! the fixture endpoints themselves.

pub mod auth;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_204_response, build_401_response, build_404_response, build_405_response,
    build_500_response, build_asset_response, build_css_response, build_csp_response,
    build_empty_ok_response, build_html_response, build_redirect_response, build_text_response,
};
