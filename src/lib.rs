//! # Waypost
//!
//! **Waypost** is a minimal, coroutine-powered HTTP request router for Rust.
//! Handlers are registered against an HTTP method and a templated path;
//! for each inbound request the router picks the matching handler, binds
//! the named path parameters, and invokes it with a request/response pair.
//!
//! ## Path templates
//!
//! | Token | Matches |
//! |---|---|
//! | `{name}` | alphanumerics and `_` (one or more) |
//! | `{name:number}` | digits and `.` (one or more) |
//! | `{name:string}` | alphanumerics and `_` (one or more) |
//! | anything else | itself, verbatim |
//!
//! Templates always match the whole path. Matching scans routes in
//! registration order and the first route matching both path and method
//! wins; a path match under the wrong method yields `405`, no path match
//! at all yields `404`.
//!
//! ## Architecture
//!
//! - **[`router`]** - template compilation and route resolution using
//!   regex-based matchers
//! - **[`dispatcher`]** - coroutine-based handler dispatch over channels
//! - **[`server`]** - HTTP boundary built on `may_minihttp`
//! - **[`runtime_config`]** - environment-based runtime configuration
//!
//! ## Quick Start
//!
//! ```no_run
//! use http::Method;
//! use waypost::server::{AppService, HttpServer};
//!
//! let service = AppService::new();
//! service
//!     .register_handler(Method::GET, "/pets/{id:number}", |req, res| {
//!         res.send(200, format!("pet {}", req.path_param("id")));
//!     })
//!     .expect("valid template");
//!
//! let handle = HttpServer(service).start("127.0.0.1:8080").expect("bind");
//! handle.join().expect("server exited");
//! ```
//!
//! ## Runtime Considerations
//!
//! Waypost runs on the `may` coroutine runtime, not tokio or async-std:
//! handlers are plain functions executed on lightweight coroutines, and
//! blocking operations should use `may`'s facilities. The coroutine stack
//! size is configurable via the `WAYPOST_STACK_SIZE` environment variable.

pub mod dispatcher;
pub mod echo;
pub mod ids;
pub mod router;
pub mod runtime_config;
pub mod server;

pub use dispatcher::{Dispatcher, HandlerRequest, HandlerResponse, Responder};
pub use router::{CompiledPattern, PatternError, RouteDecision, RouteMatch, Router};
pub use server::{AppService, HttpServer, ServerHandle};
