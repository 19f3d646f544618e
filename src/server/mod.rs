//! Server module
//!
//! Owns the listener and shared state, accepts connections, and hands each
//! request to the pipeline. The embedding test harness keeps a
//! [`ServerHandle`] to reach the override registry after `run` takes over.

pub mod listener;

use crate::config::Config;
use crate::handler;
use crate::logger;
use crate::registry::OverrideRegistry;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

/// Errors surfaced while starting or running the server. Request-level
/// failures never reach here; they become HTTP status codes.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid listen address: {0}")]
    Address(String),
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Shared application state: configuration plus the override registry.
pub struct AppState {
    pub config: Config,
    pub registry: OverrideRegistry,
}

/// The fixture server, bound but not yet serving.
pub struct FixtureServer {
    listener: TcpListener,
    addr: SocketAddr,
    state: Arc<AppState>,
}

/// Cloneable handle for the test driver: the bound address plus access to
/// the override registry. Stays valid after [`FixtureServer::run`] consumes
/// the server.
#[derive(Clone)]
pub struct ServerHandle {
    addr: SocketAddr,
    state: Arc<AppState>,
}

impl ServerHandle {
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub const fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Full URL for the given path.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// The per-path override registry.
    pub fn registry(&self) -> &OverrideRegistry {
        &self.state.registry
    }
}

impl FixtureServer {
    /// Bind the listener described by `config`. With the default port 0 the
    /// OS assigns a free port, available from [`local_addr`] afterwards.
    ///
    /// [`local_addr`]: FixtureServer::local_addr
    pub fn bind(config: Config) -> Result<Self, ServerError> {
        let requested = config.socket_addr().map_err(ServerError::Address)?;
        let listener = listener::create_reusable_listener(requested)?;
        let addr = listener.local_addr()?;
        let state = Arc::new(AppState {
            config,
            registry: OverrideRegistry::default(),
        });
        Ok(Self {
            listener,
            addr,
            state,
        })
    }

    pub const fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            addr: self.addr,
            state: Arc::clone(&self.state),
        }
    }

    /// Accept loop. Runs until the surrounding task is dropped; accept and
    /// serve errors are logged, never fatal.
    pub async fn run(self) {
        loop {
            match self.listener.accept().await {
                Ok((stream, _peer)) => serve_connection(stream, Arc::clone(&self.state)),
                Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
            }
        }
    }
}

/// Serve one connection in a spawned task so a suspended request (delay
/// handler, awaited precondition) never stalls the accept loop.
fn serve_connection(stream: tokio::net::TcpStream, state: Arc<AppState>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let service = service_fn(move |req| {
            let state = Arc::clone(&state);
            async move { handler::handle_request(req, state).await }
        });
        if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
            logger::log_connection_error(&err);
        }
    });
}
