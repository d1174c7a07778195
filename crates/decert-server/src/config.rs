//! Server configuration.
//!
//! Everything is read once at startup and passed explicitly into
//! constructors; nothing reads the environment after boot.

use anyhow::{Context, Result};

/// Default bind address when `DECERT_BIND_ADDR` is not set.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Runtime configuration for the DeCert server.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Base URL of the chain gateway.
    pub chain_gateway_url: String,
    /// Chain identity used to issue certificates that name no issuer.
    pub issuer_address: String,
}

impl Config {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            database_url: require(&lookup, "DATABASE_URL")?,
            bind_addr: lookup("DECERT_BIND_ADDR")
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            chain_gateway_url: require(&lookup, "CHAIN_GATEWAY_URL")?,
            issuer_address: require(&lookup, "DECERT_ISSUER_ADDRESS")?,
        })
    }
}

fn require(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .with_context(|| format!("{} environment variable is not set", key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn from_map(map: &HashMap<String, String>) -> Result<Config> {
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_full_configuration() {
        let map = vars(&[
            ("DATABASE_URL", "postgresql://localhost/decerts"),
            ("DECERT_BIND_ADDR", "0.0.0.0:9000"),
            ("CHAIN_GATEWAY_URL", "http://gateway:9040"),
            ("DECERT_ISSUER_ADDRESS", "issuer-system"),
        ]);

        let config = from_map(&map).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.chain_gateway_url, "http://gateway:9040");
    }

    #[test]
    fn test_bind_addr_defaults() {
        let map = vars(&[
            ("DATABASE_URL", "postgresql://localhost/decerts"),
            ("CHAIN_GATEWAY_URL", "http://gateway:9040"),
            ("DECERT_ISSUER_ADDRESS", "issuer-system"),
        ]);

        let config = from_map(&map).unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
    }

    #[test]
    fn test_missing_database_url_fails() {
        let map = vars(&[
            ("CHAIN_GATEWAY_URL", "http://gateway:9040"),
            ("DECERT_ISSUER_ADDRESS", "issuer-system"),
        ]);

        let err = from_map(&map).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let map = vars(&[
            ("DATABASE_URL", "postgresql://localhost/decerts"),
            ("CHAIN_GATEWAY_URL", "  "),
            ("DECERT_ISSUER_ADDRESS", "issuer-system"),
        ]);

        let err = from_map(&map).unwrap_err();
        assert!(err.to_string().contains("CHAIN_GATEWAY_URL"));
    }
}
