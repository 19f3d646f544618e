//! Per-path override registry
//!
//! Decouples "what should happen on the next request to path P" from the
//! handlers themselves. The test driver registers headers, callbacks, and
//! preconditions here; the request pipeline consumes them in order before
//! a response is produced.

use hyper::body::Incoming;
use hyper::header::HeaderMap;
use hyper::{Method, Request, Uri};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, MutexGuard};
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::oneshot;

/// Cloneable snapshot of an inbound request, handed to one-shot callbacks
/// and next-request futures. The body is never captured; fixture endpoints
/// are GET/HEAD only.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
}

impl RecordedRequest {
    pub fn from_request(req: &Request<Incoming>) -> Self {
        Self {
            method: req.method().clone(),
            uri: req.uri().clone(),
            headers: req.headers().clone(),
        }
    }

    /// Request path as sent on the wire (query string not included).
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Header value as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Error produced by a failed precondition; surfaces to the client as a 500.
#[derive(Debug, Error)]
#[error("precondition failed: {0}")]
pub struct PreconditionError(String);

impl PreconditionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

type PreconditionResult = Result<(), PreconditionError>;
type BoxedPrecondition = Pin<Box<dyn Future<Output = PreconditionResult> + Send>>;

/// A gating unit of work that must complete before a response is emitted.
///
/// Synchronous and asynchronous variants are unified behind [`run`], so the
/// request pipeline needs no special-casing.
///
/// [`run`]: Precondition::run
pub enum Precondition {
    Sync(Box<dyn FnOnce() -> PreconditionResult + Send>),
    Async(BoxedPrecondition),
}

impl Precondition {
    pub fn sync(f: impl FnOnce() -> PreconditionResult + Send + 'static) -> Self {
        Self::Sync(Box::new(f))
    }

    pub fn future(fut: impl Future<Output = PreconditionResult> + Send + 'static) -> Self {
        Self::Async(Box::pin(fut))
    }

    /// Execute the precondition, suspending if it is asynchronous.
    pub async fn run(self) -> PreconditionResult {
        match self {
            Self::Sync(f) => f(),
            Self::Async(fut) => fut.await,
        }
    }
}

impl std::fmt::Debug for Precondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sync(_) => f.write_str("Precondition::Sync"),
            Self::Async(_) => f.write_str("Precondition::Async"),
        }
    }
}

type Callback = Box<dyn FnOnce(&RecordedRequest) + Send>;

/// Everything registered for one normalized path. A path may hold a
/// persistent and a one-time header set at the same time; the one-time set
/// wins for the next request only.
#[derive(Default)]
struct PathOverrides {
    persistent_headers: Option<Vec<(String, String)>>,
    one_time_headers: Option<Vec<(String, String)>>,
    callback: Option<Callback>,
    precondition: Option<Precondition>,
}

impl PathOverrides {
    fn is_empty(&self) -> bool {
        self.persistent_headers.is_none()
            && self.one_time_headers.is_none()
            && self.callback.is_none()
            && self.precondition.is_none()
    }
}

/// Registry of per-path request customizations, owned by the server state.
///
/// All mutation happens under a mutex that is never held across an await:
/// entries are taken out under the lock and invoked or awaited outside it,
/// so check-then-remove is atomic with respect to concurrent requests.
#[derive(Default)]
pub struct OverrideRegistry {
    inner: Mutex<HashMap<String, PathOverrides>>,
}

/// Normalize a URL path into a registry key: drop the query string, trim
/// leading and trailing slashes.
pub fn normalize_path(path: &str) -> String {
    let without_query = path.split('?').next().unwrap_or("");
    without_query.trim_matches('/').to_string()
}

impl OverrideRegistry {
    fn lock(&self) -> MutexGuard<'_, HashMap<String, PathOverrides>> {
        self.inner.lock().expect("override registry lock poisoned")
    }

    /// Register extra response headers for a path. A one-time set applies to
    /// the next request only; a persistent set applies to every request until
    /// replaced. Each kind overwrites any prior entry of the same kind.
    pub fn set_headers(&self, path: &str, headers: Vec<(String, String)>, one_time: bool) {
        let mut map = self.lock();
        let entry = map.entry(normalize_path(path)).or_default();
        if one_time {
            entry.one_time_headers = Some(headers);
        } else {
            entry.persistent_headers = Some(headers);
        }
    }

    /// Register a one-shot callback invoked with the next request to `path`,
    /// overwriting any existing callback for that path.
    pub fn add_callback(&self, path: &str, f: impl FnOnce(&RecordedRequest) + Send + 'static) {
        let mut map = self.lock();
        let entry = map.entry(normalize_path(path)).or_default();
        entry.callback = Some(Box::new(f));
    }

    /// Register a precondition gating the next response for `path`,
    /// overwriting any existing precondition for that path.
    pub fn add_precondition(&self, path: &str, precondition: Precondition) {
        let mut map = self.lock();
        let entry = map.entry(normalize_path(path)).or_default();
        entry.precondition = Some(precondition);
    }

    /// Future resolving with the next request to `path`. Implemented as a
    /// one-shot callback, so it follows callback semantics: replaced by a
    /// later `add_callback` or `wait_for_request` for the same path, in which
    /// case the earlier future never resolves.
    pub fn wait_for_request(&self, path: &str) -> PendingRequest {
        let (tx, rx) = oneshot::channel();
        self.add_callback(path, move |req| {
            let _ = tx.send(req.clone());
        });
        PendingRequest { rx: Some(rx) }
    }

    /// Remove and return the callback for an already-normalized path.
    pub(crate) fn take_callback(&self, normalized: &str) -> Option<Callback> {
        self.take_with(normalized, |entry| entry.callback.take())
    }

    /// Remove and return the precondition for an already-normalized path.
    pub(crate) fn take_precondition(&self, normalized: &str) -> Option<Precondition> {
        self.take_with(normalized, |entry| entry.precondition.take())
    }

    /// Headers to apply to the response for this request: the one-time set
    /// if present (consumed), else a copy of the persistent set.
    pub(crate) fn headers_for_request(&self, normalized: &str) -> Vec<(String, String)> {
        self.take_with(normalized, |entry| {
            entry
                .one_time_headers
                .take()
                .or_else(|| entry.persistent_headers.clone())
        })
        .unwrap_or_default()
    }

    /// Take a field out of a path's entry, dropping the entry once empty.
    fn take_with<T>(
        &self,
        normalized: &str,
        take: impl FnOnce(&mut PathOverrides) -> Option<T>,
    ) -> Option<T> {
        let mut map = self.lock();
        let entry = map.get_mut(normalized)?;
        let taken = take(entry);
        if entry.is_empty() {
            map.remove(normalized);
        }
        taken
    }
}

/// Single-resolution handle to the next request for a path.
///
/// Resolves exactly once; if no matching request ever arrives, or the
/// underlying registration is replaced, it stays pending forever.
pub struct PendingRequest {
    rx: Option<oneshot::Receiver<RecordedRequest>>,
}

impl Future for PendingRequest {
    type Output = RecordedRequest;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let Some(rx) = this.rx.as_mut() else {
            return Poll::Pending;
        };
        match Pin::new(rx).poll(cx) {
            Poll::Ready(Ok(req)) => {
                this.rx = None;
                Poll::Ready(req)
            }
            // Sender dropped: the registration was replaced. Fuse the
            // receiver so later polls do not hit its completed state.
            Poll::Ready(Err(_)) => {
                this.rx = None;
                Poll::Pending
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
