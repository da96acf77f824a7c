//! # Router Module
//!
//! Path template compilation and route resolution.
//!
//! The router works in two phases:
//!
//! 1. **Compilation**: at registration, templates like `/pets/{id:number}`
//!    are translated into anchored regex patterns with named capture groups
//!    ([`pattern::compile`]). Malformed templates are rejected on the spot.
//!
//! 2. **Matching**: for each incoming request the table is scanned in
//!    registration order; the first route matching both path and method
//!    wins and its captures become the request's path parameters. A path
//!    match under the wrong method yields `MethodNotAllowed`, everything
//!    else `NotFound`.
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use waypost::router::{RouteDecision, Router};
//!
//! let mut router = Router::new();
//! router.register(Method::GET, "/pets/{id:number}").unwrap();
//!
//! match router.route(Method::GET, "/pets/42") {
//!     RouteDecision::Match(m) => {
//!         assert_eq!(m.path_params[0].1, "42");
//!     }
//!     _ => unreachable!("route should match"),
//! }
//! ```

mod core;
pub mod pattern;

pub use core::{ParamVec, Route, RouteDecision, RouteMatch, Router, MAX_INLINE_PARAMS};
pub use pattern::{compile, CompiledPattern, PatternError};
