use may_minihttp::Response;
use serde_json::Value;
use tracing::error;

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "OK",
    }
}

/// Write a handler reply to the wire.
///
/// A `Value::String` body goes out verbatim as `text/plain`; any other
/// value is serialized as `application/json`.
pub fn write_handler_response(res: &mut Response, status: u16, body: Value) {
    match body {
        Value::String(s) => {
            res.status_code(status as usize, status_reason(status));
            res.header("Content-Type: text/plain");
            res.body_vec(s.into_bytes());
        }
        other => match serde_json::to_vec(&other) {
            Ok(bytes) => {
                res.status_code(status as usize, status_reason(status));
                res.header("Content-Type: application/json");
                res.body_vec(bytes);
            }
            Err(err) => {
                error!(error = %err, "Failed to encode response body");
                write_plain_error(res, 500, "Internal Server Error");
            }
        },
    }
}

/// Write a plain-text failure response (404 / 405 / 500).
pub fn write_plain_error(res: &mut Response, status: u16, message: &str) {
    res.status_code(status as usize, status_reason(status));
    res.header("Content-Type: text/plain");
    res.body_vec(message.as_bytes().to_vec());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(404), "Not Found");
        assert_eq!(status_reason(405), "Method Not Allowed");
    }
}
