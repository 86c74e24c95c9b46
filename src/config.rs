//! Configuration for the MA'AT engine
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::registry::{RegistryConfig, DEFAULT_MAX_LISTENERS, DEFAULT_QUEUE_CAPACITY};

/// MA'AT Engine - real-time principle resonance scoring
#[derive(Parser, Debug, Clone)]
#[command(name = "maat-engine")]
#[command(about = "Scores free text against the MA'AT principles over HTTP and WebSocket")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "127.0.0.1:8000")]
    pub listen: SocketAddr,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON", default_value = "false")]
    pub log_json: bool,

    /// JSON file replacing the built-in principle table
    #[arg(long, env = "PRINCIPLES_FILE")]
    pub principles_file: Option<PathBuf>,

    /// Per-listener broadcast send timeout in milliseconds
    #[arg(long, env = "SEND_TIMEOUT_MS", default_value = "5000")]
    pub send_timeout_ms: u64,

    /// Queued payloads per listener before sends start waiting
    #[arg(long, env = "LISTENER_QUEUE", default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub listener_queue: usize,

    /// Maximum attached streaming listeners
    #[arg(long, env = "MAX_LISTENERS", default_value_t = DEFAULT_MAX_LISTENERS)]
    pub max_listeners: usize,
}

impl Args {
    /// Registry tuning derived from the arguments
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            send_timeout: Duration::from_millis(self.send_timeout_ms),
            queue_capacity: self.listener_queue,
            max_listeners: self.max_listeners,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.send_timeout_ms == 0 {
            return Err("SEND_TIMEOUT_MS must be greater than zero".to_string());
        }

        if self.listener_queue == 0 {
            return Err("LISTENER_QUEUE must be greater than zero".to_string());
        }

        if self.max_listeners == 0 {
            return Err("MAX_LISTENERS must be greater than zero".to_string());
        }

        Ok(())
    }
}

impl Default for Args {
    fn default() -> Self {
        Self::parse_from(["maat-engine"])
    }
}
