use super::request::parse_request;
use super::response::{write_handler_response, write_plain_error};
use crate::dispatcher::{Dispatcher, HandlerRequest, Responder};
use crate::router::{PatternError, RouteDecision, Router};
use http::Method;
use may_minihttp::{HttpService, Request, Response};
use std::io;
use std::sync::{Arc, RwLock};
use tracing::warn;

/// The HTTP service binding a route table to a dispatcher.
///
/// One cloned instance serves each connection; the router and dispatcher
/// are shared behind `RwLock`s so handlers can be registered while the
/// server is live without corrupting concurrent lookups. Reads are shared
/// on the hot path; write locks are only taken during registration.
#[derive(Clone)]
pub struct AppService {
    pub router: Arc<RwLock<Router>>,
    pub dispatcher: Arc<RwLock<Dispatcher>>,
}

impl Default for AppService {
    fn default() -> Self {
        Self::new()
    }
}

impl AppService {
    /// Create a service with an empty route table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            router: Arc::new(RwLock::new(Router::new())),
            dispatcher: Arc::new(RwLock::new(Dispatcher::new())),
        }
    }

    /// Register `handler` for `method` + `template`.
    ///
    /// Compiles the template, inserts the route, and spawns the handler
    /// coroutine as one operation. Returns `Ok(false)` without mutating
    /// anything when a route with the same (method, compiled template) is
    /// already registered.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] when the template is malformed; the route
    /// is not stored and no handler is spawned.
    pub fn register_handler<F>(
        &self,
        method: Method,
        template: &str,
        handler: F,
    ) -> Result<bool, PatternError>
    where
        F: Fn(HandlerRequest, Responder) + Send + 'static + Clone,
    {
        let route = {
            let mut router = self.router.write().unwrap();
            match router.register(method, template)? {
                Some(route) => route,
                None => return Ok(false),
            }
        };
        let mut dispatcher = self.dispatcher.write().unwrap();
        // SAFETY: handlers are registered from regular threads or coroutines
        // after may is configured; the handler bound here is Send + 'static.
        unsafe {
            dispatcher.register_handler(&route.handler_name, handler);
        }
        Ok(true)
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let parsed = parse_request(req);

        let Ok(method) = Method::from_bytes(parsed.method.as_bytes()) else {
            warn!(method = %parsed.method, "Unparseable method token");
            write_plain_error(res, 404, "Not Found");
            return Ok(());
        };

        let decision = {
            let router = self.router.read().unwrap();
            router.route(method, &parsed.path)
        };

        match decision {
            RouteDecision::Match(mut route_match) => {
                route_match.query_params = parsed.query_params;
                let reply = {
                    let dispatcher = self.dispatcher.read().unwrap();
                    dispatcher.dispatch(route_match, parsed.body, parsed.headers)
                };
                match reply {
                    Some(response) => write_handler_response(res, response.status, response.body),
                    None => {
                        warn!(path = %parsed.path, "Handler failed or not registered");
                        write_plain_error(res, 500, "Internal Server Error");
                    }
                }
            }
            RouteDecision::MethodNotAllowed => write_plain_error(res, 405, "Method Not Allowed"),
            RouteDecision::NotFound => write_plain_error(res, 404, "Not Found"),
        }
        Ok(())
    }
}
