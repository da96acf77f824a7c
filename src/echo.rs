use crate::dispatcher::{HandlerRequest, Responder};
use serde_json::json;
use tracing::error;

/// Example handler: echoes the routed request back as JSON.
///
/// Used by the demo binary and the integration tests; handy for checking
/// what the router bound for a given request.
pub fn echo_handler(req: HandlerRequest, res: Responder) {
    let payload = json!({
        "handler": req.handler_name,
        "method": req.method.to_string(),
        "path": req.path,
        "params": req.path_params_map(),
        "query": req.query_params_map(),
        "body": req.body,
    });
    if let Err(err) = res.send_json(200, &payload) {
        error!(error = %err, "echo response failed to serialize");
    }
}
