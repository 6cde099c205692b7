//! Runtime configuration.
//!
//! Read once at startup from environment variables, falling back to the
//! defaults below. The knowledge-base host is validated with `url` so a
//! typo fails at boot rather than on the first page load.

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_KB_SERVICE_HOST: &str = "http://localhost:8050";
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub enum ConfigError {
    InvalidHost(String),
    InvalidAddr(String),
    InvalidNumber { var: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidHost(msg) => write!(f, "Invalid KB_SERVICE_HOST: {}", msg),
            ConfigError::InvalidAddr(msg) => write!(f, "Invalid MENTIONS_ADDR: {}", msg),
            ConfigError::InvalidNumber { var, value } => {
                write!(f, "{} must be a non-negative integer, got {:?}", var, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the knowledge-base service, without a trailing slash.
    pub kb_service_host: String,
    pub addr: SocketAddr,
    pub page_size: u64,
    /// `None` means requests never time out.
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kb_service_host: DEFAULT_KB_SERVICE_HOST.to_string(),
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("KB_SERVICE_HOST").unwrap_or_else(|_| DEFAULT_KB_SERVICE_HOST.into());
        let addr = env::var("MENTIONS_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.into());
        let page_size = read_number("MENTIONS_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        let timeout_secs = read_number("KB_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            kb_service_host: normalize_host(&host)?,
            addr: addr
                .parse()
                .map_err(|e: std::net::AddrParseError| ConfigError::InvalidAddr(e.to_string()))?,
            page_size: if page_size == 0 {
                DEFAULT_PAGE_SIZE
            } else {
                page_size
            },
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        })
    }
}

fn read_number(var: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
        Err(_) => Ok(default),
    }
}

/// Validate the knowledge-base base URL and strip any trailing slash so
/// paths can be appended verbatim.
pub fn normalize_host(host: &str) -> Result<String, ConfigError> {
    let url = Url::parse(host.trim()).map_err(|e| ConfigError::InvalidHost(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidHost(format!(
            "unsupported scheme {}",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(ConfigError::InvalidHost("no host in URL".to_string()));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_host_strips_slash() {
        assert_eq!(
            normalize_host("http://localhost:8050/").unwrap(),
            "http://localhost:8050"
        );
        assert_eq!(
            normalize_host("https://kb.example.org/api/").unwrap(),
            "https://kb.example.org/api"
        );
    }

    #[test]
    fn test_normalize_host_rejects_bad_urls() {
        assert!(matches!(
            normalize_host("ftp://kb.example.org"),
            Err(ConfigError::InvalidHost(_))
        ));
        assert!(matches!(
            normalize_host("not a url"),
            Err(ConfigError::InvalidHost(_))
        ));
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }
}
