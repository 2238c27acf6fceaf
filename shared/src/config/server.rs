//! Server configuration module

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Worker threads (0 = number of CPU cores)
    #[serde(default)]
    pub workers: usize,

    /// Maximum JSON payload size in bytes
    #[serde(default = "default_max_payload_size")]
    pub max_payload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 8080,
            workers: 0,
            max_payload_size: default_max_payload_size(),
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// HTTP adapter behaviour that is not transport plumbing
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Include the generated code in `/send` responses.
    ///
    /// Only meant for local development against simulated channels.
    #[serde(default)]
    pub expose_code: bool,

    /// Origins allowed by CORS; empty means any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

fn default_max_payload_size() -> usize {
    16 * 1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        let config = ServerConfig::new("0.0.0.0", 9000);
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert_eq!(config.workers, 0);
    }

    #[test]
    fn test_http_config_hides_code_by_default() {
        assert!(!HttpConfig::default().expose_code);
    }
}
