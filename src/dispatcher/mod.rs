//! # Dispatcher Module
//!
//! Coroutine-based request handler dispatch.
//!
//! Each registered handler runs in its own long-lived `may` coroutine and
//! receives requests over an MPSC channel. A matched request is paired with
//! a write-once [`Responder`]; the handler's reply travels back over a
//! per-request channel to the coroutine serving the connection.
//!
//! ## Handler shape
//!
//! ```rust,ignore
//! use waypost::dispatcher::{HandlerRequest, Responder};
//!
//! fn get_pet(req: HandlerRequest, res: Responder) {
//!     let id = req.path_param("id");
//!     res.send(200, format!("pet {id}"));
//! }
//! ```
//!
//! ## Error handling
//!
//! - Handler panics are caught and converted into 500 replies; the worker
//!   loop keeps serving subsequent requests.
//! - Everything else that goes wrong inside a handler is the handler's own
//!   business: the dispatcher never wraps, retries, or rewrites its replies.
//! - A route without a live handler reports as `None` from
//!   [`Dispatcher::dispatch`], which the server turns into a 500.

mod core;

pub use core::{
    Dispatcher, HandlerRequest, HandlerResponse, HandlerSender, HeaderVec, Responder,
    MAX_INLINE_HEADERS,
};
