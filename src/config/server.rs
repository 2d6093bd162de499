//! HTTP listener settings

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body; analysis payloads are tiny
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_body_bytes: 64 * 1024,
        }
    }
}

impl ServerConfig {
    /// Socket address to listen on. `host` must be an IP literal.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|_| ConfigError::Validation {
            field: "server.host".to_string(),
            message: format!("'{}' is not an IP address", self.host),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Validation {
                field: "server.port".to_string(),
                message: "port must be non-zero".to_string(),
            });
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Validation {
                field: "server.max_body_bytes".to_string(),
                message: "body limit must be positive".to_string(),
            });
        }
        self.bind_addr().map(|_| ())
    }
}
