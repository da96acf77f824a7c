//! # Server Module
//!
//! The HTTP boundary: request parsing, response writing, the
//! [`AppService`] binding router and dispatcher together, and the
//! [`HttpServer`] lifecycle wrapper around `may_minihttp`.
//!
//! The service answers every request in one of four ways:
//!
//! - a matched route's handler reply (status and body chosen by the handler)
//! - `404 Not Found` when no template matched the path
//! - `405 Method Not Allowed` when a template matched but not the method
//! - `500 Internal Server Error` when the matched handler produced no reply

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_query_params, parse_request, ParsedRequest};
pub use response::{write_handler_response, write_plain_error};
pub use service::AppService;
