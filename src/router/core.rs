//! Route table and request matching - hot path for request routing.

use super::pattern::{compile, CompiledPattern, PatternError};
use http::Method;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Maximum number of path/query parameters before heap allocation.
/// Most REST paths carry well under 8 captures.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the hot path.
///
/// Param names are `Arc<str>` because they come from the compiled route
/// table and are cloned into every request; values are per-request data.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// A registered route: method, source template, compiled pattern, and the
/// name linking it to its dispatcher channel.
///
/// Uniqueness key = (method, canonical pattern). Two syntactically different
/// templates that compile to the same expression are the same route.
#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    pub template: String,
    pub pattern: CompiledPattern,
    pub handler_name: String,
}

/// Result of successfully matching a request path to a route.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched route (shared with the table to avoid expensive clones).
    pub route: Arc<Route>,
    /// The concrete request path that matched.
    pub path: String,
    /// Path parameters extracted from the URL (e.g. `{id}` -> `("id", "123")`).
    pub path_params: ParamVec,
    /// Query string parameters (populated by the server after the match).
    pub query_params: ParamVec,
}

/// Outcome of a route scan.
#[derive(Debug, Clone)]
pub enum RouteDecision {
    /// A route matched both path and method.
    Match(RouteMatch),
    /// At least one pattern matched the path, but none under the request method.
    MethodNotAllowed,
    /// No pattern matched the path.
    NotFound,
}

/// Registry of compiled routes, scanned in registration order.
///
/// Registration order is the documented match priority: when several
/// templates could match the same concrete path, the one registered first
/// wins. The table itself is not synchronized; share it behind
/// `Arc<RwLock<Router>>` when registration can happen while serving.
#[derive(Clone, Default)]
pub struct Router {
    routes: Vec<Arc<Route>>,
}

impl Router {
    /// Create an empty route table.
    #[must_use]
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Compile `template` and append a route for `method`.
    ///
    /// Returns the new route, or `None` without mutating the table when a
    /// route with the same (method, canonical pattern) already exists.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] when the template is malformed; nothing is
    /// stored in that case.
    pub fn register(
        &mut self,
        method: Method,
        template: &str,
    ) -> Result<Option<Arc<Route>>, PatternError> {
        let pattern = compile(template)?;
        if let Some(existing) = self
            .routes
            .iter()
            .find(|r| r.method == method && r.pattern.canonical() == pattern.canonical())
        {
            warn!(
                method = %method,
                template = %template,
                existing_template = %existing.template,
                "Duplicate route rejected"
            );
            return Ok(None);
        }

        let handler_name = format!("{} {}", method, template);
        let route = Arc::new(Route {
            method,
            template: template.to_string(),
            pattern,
            handler_name,
        });
        info!(
            method = %route.method,
            template = %template,
            canonical = %route.pattern.canonical(),
            routes_count = self.routes.len() + 1,
            "Route registered"
        );
        self.routes.push(Arc::clone(&route));
        Ok(Some(route))
    }

    /// Match an HTTP request against the table.
    ///
    /// Scans routes in registration order and selects the first whose
    /// pattern matches the path and whose method equals the request method.
    /// When patterns matched the path but never the method, the outcome is
    /// [`RouteDecision::MethodNotAllowed`]; when nothing matched the path it
    /// is [`RouteDecision::NotFound`].
    #[must_use]
    pub fn route(&self, method: Method, path: &str) -> RouteDecision {
        let mut path_matched = false;
        for route in &self.routes {
            let Some(path_params) = route.pattern.captures(path) else {
                continue;
            };
            path_matched = true;
            if route.method != method {
                continue;
            }
            debug!(
                method = %method,
                path = %path,
                template = %route.template,
                path_params = ?path_params,
                "Route matched"
            );
            return RouteDecision::Match(RouteMatch {
                route: Arc::clone(route),
                path: path.to_string(),
                path_params,
                query_params: ParamVec::new(),
            });
        }

        if path_matched {
            debug!(method = %method, path = %path, "Path matched but method did not");
            RouteDecision::MethodNotAllowed
        } else {
            debug!(method = %method, path = %path, "No route matched");
            RouteDecision::NotFound
        }
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Print all registered routes to stdout. Useful for debugging.
    pub fn dump_routes(&self) {
        println!("[routes] count={}", self.routes.len());
        for route in &self.routes {
            println!(
                "[route] {} {} -> {}",
                route.method,
                route.template,
                route.pattern.canonical()
            );
        }
    }
}
