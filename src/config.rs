//! Runtime configuration for the feedback service
//!
//! Only two settings exist: the listen address and the database path. The
//! binary's clap arguments read them from the command line, then the
//! environment variables below, then these defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Default listen address
pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Default database file, relative to the working directory
pub const DEFAULT_DB_PATH: &str = "feedback.db";

/// Environment variable overriding the listen address
pub const ADDR_ENV: &str = "AVALIACAO_ADDR";

/// Environment variable overriding the database path
pub const DB_PATH_ENV: &str = "AVALIACAO_DB_PATH";

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server address
    pub addr: SocketAddr,
    /// SQLite database file
    pub db_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: ([0, 0, 0, 0], 3000).into(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.addr.to_string(), DEFAULT_ADDR);
        assert_eq!(config.db_path, PathBuf::from("feedback.db"));
    }
}
