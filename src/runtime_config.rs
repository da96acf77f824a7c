//! # Runtime Configuration Module
//!
//! Environment variable based configuration for the coroutine runtime and
//! the demo binary.
//!
//! ## Environment Variables
//!
//! ### `WAYPOST_STACK_SIZE`
//!
//! Stack size for handler coroutines, in decimal (`16384`) or hexadecimal
//! (`0x4000`). Default: `0x4000` (16 KB). Larger stacks support deeper call
//! chains; smaller stacks reduce memory with many concurrent coroutines.
//!
//! ### `WAYPOST_ADDR`
//!
//! Bind address for the demo binary. Default: `127.0.0.1:8080`.

use std::env;

const DEFAULT_STACK_SIZE: usize = 0x4000;
const DEFAULT_ADDR: &str = "127.0.0.1:8080";

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Stack size for handler coroutines in bytes (default: 16 KB).
    pub stack_size: usize,
    /// Bind address for the demo binary (default: `127.0.0.1:8080`).
    pub addr: String,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let stack_size = env::var("WAYPOST_STACK_SIZE")
            .ok()
            .and_then(|val| {
                if let Some(hex) = val.strip_prefix("0x") {
                    usize::from_str_radix(hex, 16).ok()
                } else {
                    val.parse().ok()
                }
            })
            .unwrap_or(DEFAULT_STACK_SIZE);
        let addr = env::var("WAYPOST_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        RuntimeConfig { stack_size, addr }
    }
}
