//! Dispatcher core - hot path for request dispatch.

use crate::ids::RequestId;
use crate::router::{ParamVec, RouteMatch};
use crate::runtime_config::RuntimeConfig;
use http::Method;
use may::coroutine;
use may::sync::mpsc;
use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Maximum inline headers before heap allocation.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage for the hot path.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Request data passed to a handler coroutine.
///
/// Carries everything extracted from the inbound request: method, concrete
/// path, bound path parameters, query parameters, headers, and the parsed
/// JSON body. Read-only from the handler's perspective; the response goes
/// out through the [`Responder`] handed to the handler alongside this.
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// Unique request ID for log correlation.
    pub request_id: RequestId,
    /// HTTP method (GET, POST, ...).
    pub method: Method,
    /// Concrete request path (query string stripped).
    pub path: String,
    /// Name of the handler processing this request.
    pub handler_name: String,
    /// Path parameters bound from the matched template, in template order.
    pub path_params: ParamVec,
    /// Query string parameters, in query-string order.
    pub query_params: ParamVec,
    /// HTTP headers (lowercase names).
    pub headers: HeaderVec,
    /// Request body parsed as JSON (if present).
    pub body: Option<Value>,
}

impl HandlerRequest {
    /// Get a path parameter by name.
    ///
    /// Returns the empty string when the name is absent; an empty capture
    /// and a missing one are indistinguishable.
    #[inline]
    #[must_use]
    pub fn path_param(&self, name: &str) -> &str {
        self.path_params
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    /// Get a query parameter by name.
    ///
    /// Returns the first value for the key (`?a=1&a=2` yields `"1"`), or the
    /// empty string when the key is absent.
    #[inline]
    #[must_use]
    pub fn query_param(&self, name: &str) -> &str {
        self.query_params
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    /// Get a header by name (case-insensitive).
    #[inline]
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Convert path params to a `HashMap`. Allocates; prefer
    /// [`HandlerRequest::path_param`] on hot paths.
    #[must_use]
    pub fn path_params_map(&self) -> HashMap<String, String> {
        self.path_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// Convert query params to a `HashMap` (first value wins per key).
    #[must_use]
    pub fn query_params_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::with_capacity(self.query_params.len());
        for (k, v) in &self.query_params {
            map.entry(k.to_string()).or_insert_with(|| v.clone());
        }
        map
    }
}

/// Response data sent back from a handler coroutine.
///
/// A `Value::String` body is written to the wire as `text/plain`; any other
/// value as `application/json`.
#[derive(Debug, Clone, Serialize)]
pub struct HandlerResponse {
    /// HTTP status code (200, 404, 500, ...).
    pub status: u16,
    /// Response body.
    pub body: Value,
}

impl HandlerResponse {
    /// Create a plain-text response.
    #[must_use]
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: Value::String(body.into()),
        }
    }

    /// Create a JSON response.
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        Self { status, body }
    }
}

/// Write-once response channel handed to a handler.
///
/// Every sending method consumes `self`, so a handler can produce at most
/// one finalizing write per request; a second write is a compile error, not
/// a runtime hazard. Dropping the responder without sending makes the
/// server answer 500 for the request.
#[derive(Debug)]
pub struct Responder {
    reply_tx: mpsc::Sender<HandlerResponse>,
}

impl Responder {
    /// Send a plain-text response with exactly the given status and body.
    pub fn send(self, status: u16, body: impl Into<String>) {
        self.finish(HandlerResponse::text(status, body));
    }

    /// Serialize `value` to JSON and send it with the given status.
    ///
    /// Serialization happens before anything is written. On failure the
    /// client receives a plain 500 and the error is returned so the handler
    /// can react (log, record, ...) - it is never silently swallowed.
    pub fn send_json<T: Serialize>(self, status: u16, value: &T) -> Result<(), serde_json::Error> {
        match serde_json::to_value(value) {
            Ok(body) => {
                self.finish(HandlerResponse::json(status, body));
                Ok(())
            }
            Err(err) => {
                error!(error = %err, "Response serialization failed");
                self.finish(HandlerResponse::text(500, "Internal Server Error"));
                Err(err)
            }
        }
    }

    fn finish(self, response: HandlerResponse) {
        if self.reply_tx.send(response).is_err() {
            warn!("Reply channel closed before the response could be delivered");
        }
    }
}

/// Type alias for a channel sender that feeds a handler coroutine.
pub type HandlerSender = mpsc::Sender<(HandlerRequest, Responder)>;

/// Dispatcher that routes matched requests to registered handler coroutines.
///
/// Each handler runs in its own long-lived `may` coroutine and receives
/// requests over an MPSC channel; the reply travels back over a per-request
/// channel. Handler panics are caught at the coroutine boundary and turned
/// into 500 replies so one failing request cannot kill the worker loop.
#[derive(Clone, Default)]
pub struct Dispatcher {
    /// Map of handler names to their channel senders.
    pub handlers: HashMap<String, HandlerSender>,
}

impl Dispatcher {
    /// Create a new empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Dispatcher {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler function under `name`, spawning its coroutine.
    ///
    /// If a handler with the same name already exists it is replaced; the
    /// old sender is dropped, which closes its channel and lets the old
    /// coroutine exit.
    ///
    /// # Safety
    ///
    /// Calls `may::coroutine::Builder::spawn()`, which is unsafe in the
    /// `may` runtime. The caller must ensure the runtime is initialized and
    /// that the handler is safe to run in a concurrent context.
    pub unsafe fn register_handler<F>(&mut self, name: &str, handler_fn: F)
    where
        F: Fn(HandlerRequest, Responder) + Send + 'static + Clone,
    {
        let (tx, rx) = mpsc::channel::<(HandlerRequest, Responder)>();
        let name = name.to_string();
        let coroutine_name = name.clone();
        let stack_size = RuntimeConfig::from_env().stack_size;

        // SAFETY: the handler is Send + 'static so the coroutine holds no
        // dangling references, and failures inside it are routed through the
        // reply channel rather than unwinding into the runtime.
        let spawn_result = unsafe {
            coroutine::Builder::new()
                .stack_size(stack_size)
                .spawn(move || {
                    debug!(
                        handler_name = %coroutine_name,
                        stack_size = stack_size,
                        "Handler coroutine started"
                    );
                    for (req, responder) in rx.iter() {
                        let reply_tx = responder.reply_tx.clone();
                        let handler_name = req.handler_name.clone();
                        let request_id = req.request_id;

                        if let Err(panic) =
                            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                                handler_fn(req, responder);
                            }))
                        {
                            let panic_message = format!("{panic:?}");
                            error!(
                                request_id = %request_id,
                                handler_name = %handler_name,
                                panic_message = %panic_message,
                                "Handler panicked"
                            );
                            let _ = reply_tx
                                .send(HandlerResponse::text(500, "Internal Server Error"));
                        }
                    }
                })
        };

        if let Err(err) = spawn_result {
            error!(
                handler_name = %name,
                error = %err,
                stack_size = stack_size,
                "Failed to spawn handler coroutine"
            );
            return;
        }

        if self.handlers.insert(name.clone(), tx).is_some() {
            warn!(
                handler_name = %name,
                "Replaced existing handler - old coroutine will exit"
            );
        } else {
            info!(
                handler_name = %name,
                total_handlers = self.handlers.len(),
                "Handler registered"
            );
        }
    }

    /// Dispatch a matched request to its handler and wait for the reply.
    ///
    /// Builds the [`HandlerRequest`] (fresh parameter set, request id) and
    /// the paired [`Responder`], sends both to the handler coroutine, and
    /// blocks until the reply arrives.
    ///
    /// Returns `None` when no handler is registered under the route's name
    /// or the handler went away without replying; the server surfaces that
    /// as a 500.
    #[must_use]
    pub fn dispatch(
        &self,
        route_match: RouteMatch,
        body: Option<Value>,
        headers: HeaderVec,
    ) -> Option<HandlerResponse> {
        let handler_name = route_match.route.handler_name.clone();
        let tx = self.handlers.get(&handler_name)?;

        let (reply_tx, reply_rx) = mpsc::channel();
        let request = HandlerRequest {
            request_id: RequestId::new(),
            method: route_match.route.method.clone(),
            path: route_match.path,
            handler_name,
            path_params: route_match.path_params,
            query_params: route_match.query_params,
            headers,
            body,
        };
        let request_id = request.request_id;
        debug!(
            request_id = %request_id,
            handler_name = %request.handler_name,
            path = %request.path,
            "Dispatching request"
        );

        tx.send((request, Responder { reply_tx })).ok()?;
        reply_rx.recv().ok()
    }
}
