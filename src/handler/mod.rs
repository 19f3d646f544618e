//! Request handler module
//!
//! Request pipeline, fixed fixture endpoints, and the static-asset fallback.

pub mod fixtures;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
