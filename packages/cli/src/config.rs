use std::env;
use std::net::{IpAddr, SocketAddr};
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid host address: {0}")]
    InvalidHost(String),
}

/// Where the item database lives
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseLocation {
    File(PathBuf),
    InMemory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub database: DatabaseLocation,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host_str = env::var("TASKLIST_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let host = parse_host(&host_str)?;

        let port_str = env::var("PORT").unwrap_or_else(|_| "8000".to_string());
        let port = validate_port(port_str.trim().parse::<u16>()?)?;

        let database = env::var("TASKLIST_DB_PATH")
            .ok()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(tasklist_storage::default_database_path);

        Ok(Config {
            host,
            port,
            database: DatabaseLocation::File(database),
        })
    }

    /// Apply command line values on top of the environment
    pub fn with_overrides(
        mut self,
        host: Option<&str>,
        port: Option<u16>,
        database: Option<PathBuf>,
        in_memory: bool,
    ) -> Result<Self, ConfigError> {
        if let Some(host) = host {
            self.host = parse_host(host)?;
        }
        if let Some(port) = port {
            self.port = validate_port(port)?;
        }
        if in_memory {
            self.database = DatabaseLocation::InMemory;
        } else if let Some(path) = database {
            self.database = DatabaseLocation::File(path);
        }
        Ok(self)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_host(value: &str) -> Result<IpAddr, ConfigError> {
    let value = value.trim();
    if value == "localhost" {
        return Ok(IpAddr::from([127, 0, 0, 1]));
    }
    value
        .parse::<IpAddr>()
        .map_err(|_| ConfigError::InvalidHost(value.to_string()))
}

fn validate_port(port: u16) -> Result<u16, ConfigError> {
    if port == 0 {
        return Err(ConfigError::PortOutOfRange(port));
    }
    Ok(port)
}
