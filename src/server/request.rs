use crate::dispatcher::HeaderVec;
use crate::router::ParamVec;
use may_minihttp::Request;
use std::io::Read;
use std::sync::Arc;
use tracing::debug;

/// Parsed HTTP request data used by `AppService`.
#[derive(Debug)]
pub struct ParsedRequest {
    /// HTTP method token, verbatim from the request line.
    pub method: String,
    /// Request path with the query string stripped.
    pub path: String,
    /// HTTP headers (lowercase names).
    pub headers: HeaderVec,
    /// Query string parameters in query order, duplicates preserved.
    pub query_params: ParamVec,
    /// Request body parsed as JSON, when present and parseable.
    pub body: Option<serde_json::Value>,
}

/// Parse query string parameters from a URL path.
///
/// Extracts everything after the first `?` and percent-decodes names and
/// values. Pairs keep their query-string order and duplicate keys are
/// preserved; lookups through the handler request take the first value.
pub fn parse_query_params(path: &str) -> ParamVec {
    match path.split_once('?') {
        Some((_, query)) => url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (Arc::from(k.as_ref()), v.to_string()))
            .collect(),
        None => ParamVec::new(),
    }
}

/// Extract method, path, headers, query parameters, and JSON body from a
/// raw `may_minihttp::Request`.
pub fn parse_request(req: Request) -> ParsedRequest {
    let method = req.method().to_string();
    let raw_path = req.path().to_string();
    let path = raw_path
        .split('?')
        .next()
        .unwrap_or("/")
        .to_string();

    let headers: HeaderVec = req
        .headers()
        .iter()
        .map(|h| {
            (
                Arc::from(h.name.to_ascii_lowercase().as_str()),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();

    let query_params = parse_query_params(&raw_path);

    let body = {
        let mut body_str = String::new();
        match req.body().read_to_string(&mut body_str) {
            Ok(size) if size > 0 => match serde_json::from_str(&body_str) {
                Ok(json) => Some(json),
                Err(err) => {
                    debug!(error = %err, body_size = size, "Request body is not JSON");
                    None
                }
            },
            _ => None,
        }
    };

    debug!(
        method = %method,
        path = %path,
        header_count = headers.len(),
        query_count = query_params.len(),
        has_body = body.is_some(),
        "HTTP request parsed"
    );

    ParsedRequest {
        method,
        path,
        headers,
        query_params,
        body,
    }
}
