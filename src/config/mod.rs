use dashmap::DashMap;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Configuration service
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    /// A service preloaded with the process environment
    pub fn new() -> Self {
        let service = Self::default();
        for (key, value) in env::vars() {
            service.set(&key, &value);
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }

    /// Parse a value, falling back to `default` when it is missing or invalid
    pub fn get_parsed<T: std::str::FromStr>(&self, key: &str, default: T) -> T {
        match self.get(key) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring invalid value for {}: {:?}", key, raw);
                default
            }),
            None => default,
        }
    }

    fn get_millis(&self, key: &str) -> Option<Duration> {
        self.get(key)?
            .parse::<u64>()
            .map_err(|_| tracing::warn!("Ignoring invalid duration for {}", key))
            .ok()
            .map(Duration::from_millis)
    }
}

/// Where and how a host serves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServeConfig {
    pub host: String,
    pub port: u16,

    /// Bound on each lifespan's setup
    pub startup_timeout: Option<Duration>,

    /// Bound on each lifespan's teardown
    pub shutdown_timeout: Option<Duration>,
}

impl ServeConfig {
    pub const HOST: &'static str = "HOST";
    pub const PORT: &'static str = "PORT";
    pub const STARTUP_TIMEOUT: &'static str = "HTTPROUTER_STARTUP_TIMEOUT_MS";
    pub const SHUTDOWN_TIMEOUT: &'static str = "HTTPROUTER_SHUTDOWN_TIMEOUT_MS";

    /// Read the serve settings from a configuration service
    ///
    /// Missing or invalid values keep their defaults.
    pub fn from_config(config: &ConfigService) -> Self {
        let defaults = Self::default();
        Self {
            host: config.get(Self::HOST).unwrap_or(defaults.host),
            port: config.get_parsed(Self::PORT, defaults.port),
            startup_timeout: config.get_millis(Self::STARTUP_TIMEOUT),
            shutdown_timeout: config.get_millis(Self::SHUTDOWN_TIMEOUT),
        }
    }

    pub fn from_env() -> Self {
        Self::from_config(&ConfigService::new())
    }

    /// `host:port`, ready for `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn socket_addr(&self) -> Option<SocketAddr> {
        self.bind_address().parse().ok()
    }
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            startup_timeout: None,
            shutdown_timeout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = ServeConfig::from_config(&ConfigService::default());
        assert_eq!(config, ServeConfig::default());
        assert_eq!(config.bind_address(), "127.0.0.1:8000");
    }

    #[test]
    fn test_reads_values() {
        let service = ConfigService::default();
        service.set("HOST", "0.0.0.0");
        service.set("PORT", "9090");
        service.set("HTTPROUTER_STARTUP_TIMEOUT_MS", "1500");

        let config = ServeConfig::from_config(&service);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9090);
        assert_eq!(config.startup_timeout, Some(Duration::from_millis(1500)));
        assert_eq!(config.shutdown_timeout, None);
        assert!(config.socket_addr().is_some());
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let service = ConfigService::default();
        service.set("PORT", "not-a-port");
        service.set("HTTPROUTER_SHUTDOWN_TIMEOUT_MS", "-1");

        let config = ServeConfig::from_config(&service);
        assert_eq!(config.port, 8000);
        assert_eq!(config.shutdown_timeout, None);
    }
}
