//! Server configuration.
//!
//! Values come from the environment (a `.env` file is loaded by the binary
//! through `dotenvy`) and may be overridden by command-line flags.
//!
//! | Variable                | Default | Meaning                               |
//! |-------------------------|---------|---------------------------------------|
//! | `LEDGERFLAT_PORT`       | `3000`  | HTTP port                             |
//! | `LEDGERFLAT_STATIC_DIR` | unset   | Built frontend to serve at `/`        |
//! | `LEDGERFLAT_MAX_UPLOAD` | 50 MiB  | Maximum accepted upload size in bytes |

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;

pub const DEFAULT_MAX_UPLOAD: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: Option<PathBuf>,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            static_dir: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD,
        }
    }
}

impl ServerConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            port: lookup("LEDGERFLAT_PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.port),
            static_dir: lookup("LEDGERFLAT_STATIC_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            max_upload_bytes: lookup("LEDGERFLAT_MAX_UPLOAD")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
        }
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_values_from_lookup() {
        let env: HashMap<&str, &str> = [
            ("LEDGERFLAT_PORT", "8080"),
            ("LEDGERFLAT_STATIC_DIR", "frontend/dist"),
            ("LEDGERFLAT_MAX_UPLOAD", "1024"),
        ]
        .into_iter()
        .collect();

        let config = ServerConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.port, 8080);
        assert_eq!(config.static_dir, Some(PathBuf::from("frontend/dist")));
        assert_eq!(config.max_upload_bytes, 1024);
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = ServerConfig::from_lookup(|k| (k == "LEDGERFLAT_PORT").then(|| "nope".to_string()));
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_cli_override() {
        let config = ServerConfig::default().with_port(Some(9000));
        assert_eq!(config.port, 9000);
        assert_eq!(ServerConfig::default().with_port(None).port, DEFAULT_PORT);
    }
}
