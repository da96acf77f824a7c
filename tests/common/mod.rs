#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::Once;
use std::time::Duration;

static INIT: Once = Once::new();

/// Configure the may runtime and tracing once per test binary.
pub fn init_runtime() {
    INIT.call_once(|| {
        may::config().set_stack_size(0x8000);
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A decoded HTTP response from the minimal test client.
#[derive(Debug)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

/// Minimal blocking HTTP client over a raw TcpStream.
///
/// Reads until the Content-Length'd body is complete so it works against a
/// keep-alive server.
pub fn request(addr: &str, method: &str, target: &str, body: Option<&str>) -> HttpReply {
    let mut stream = TcpStream::connect(addr).expect("connect to test server");
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .expect("set read timeout");

    let body = body.unwrap_or("");
    let raw = format!(
        "{method} {target} HTTP/1.1\r\n\
         Host: waypost-test\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(raw.as_bytes()).expect("write request");

    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if response_complete(&buf) {
                    break;
                }
            }
            Err(_) => break,
        }
    }
    parse_reply(&buf)
}

pub fn get(addr: &str, target: &str) -> HttpReply {
    request(addr, "GET", target, None)
}

pub fn post_json(addr: &str, target: &str, body: &str) -> HttpReply {
    request(addr, "POST", target, Some(body))
}

fn header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn response_complete(buf: &[u8]) -> bool {
    match header_end(buf) {
        Some(end) => {
            let head = String::from_utf8_lossy(&buf[..end]);
            buf.len() >= end + 4 + content_length(&head)
        }
        None => false,
    }
}

fn content_length(head: &str) -> usize {
    head.lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse().ok()
            } else {
                None
            }
        })
        .unwrap_or(0)
}

fn parse_reply(buf: &[u8]) -> HttpReply {
    let end = header_end(buf).expect("complete response headers");
    let head = String::from_utf8_lossy(&buf[..end]).to_string();
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|code| code.parse().ok())
        .expect("status line");
    let length = content_length(&head);
    let body_bytes = &buf[end + 4..(end + 4 + length).min(buf.len())];
    HttpReply {
        status,
        body: String::from_utf8_lossy(body_bytes).to_string(),
    }
}
