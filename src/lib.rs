//! Deterministic HTTP test-fixture server for browser-automation clients.
//!
//! Serves a fixed set of endpoints (redirect chains, a delayed responder, a
//! Basic-auth gate, security headers) over a static-asset fallback, plus a
//! per-path override registry the embedding test harness drives in-process:
//! persistent or one-time response headers, one-shot request callbacks,
//! awaitable preconditions, and next-request futures.
//!
//! ```no_run
//! use fixtured::{Config, FixtureServer};
//!
//! # async fn example() -> Result<(), fixtured::ServerError> {
//! let server = FixtureServer::bind(Config::default())?;
//! let handle = server.handle();
//! tokio::spawn(server.run());
//!
//! handle.registry().set_headers(
//!     "/empty",
//!     vec![("X-Test".to_string(), "1".to_string())],
//!     true,
//! );
//! let next = handle.registry().wait_for_request("/empty");
//! // ...drive the browser at handle.url("/empty"), then:
//! let request = next.await;
//! assert_eq!(request.path(), "/empty");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod registry;
pub mod server;

pub use config::Config;
pub use registry::{
    OverrideRegistry, PendingRequest, Precondition, PreconditionError, RecordedRequest,
};
pub use server::{AppState, FixtureServer, ServerError, ServerHandle};
