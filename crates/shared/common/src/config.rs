//! Shared configuration structures.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Base service configuration shared by all services.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Service name for logging and tracing
    pub service_name: String,
    /// Host address to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Log level
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_name: "service".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
        }
    }
}

/// In-process domain event channel configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventChannelConfig {
    /// Events buffered per subscriber before the oldest are dropped
    pub capacity: usize,
}

impl Default for EventChannelConfig {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

/// How stored passwords are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordScheme {
    /// Deterministic SHA-256, comparable by equality
    #[default]
    Sha256,
    /// Salted Argon2 with verify-style matching
    Argon2,
}

impl FromStr for PasswordScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha256" => Ok(PasswordScheme::Sha256),
            "argon2" => Ok(PasswordScheme::Argon2),
            other => Err(format!("unknown password scheme '{}'", other)),
        }
    }
}

impl fmt::Display for PasswordScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordScheme::Sha256 => write!(f, "sha256"),
            PasswordScheme::Argon2 => write!(f, "argon2"),
        }
    }
}

/// Password protection configuration.
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct PasswordConfig {
    pub scheme: PasswordScheme,
    /// Secret prepended before hashing (sha256 scheme only)
    #[serde(skip_serializing)]
    pub pepper: Option<String>,
}

impl fmt::Debug for PasswordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordConfig")
            .field("scheme", &self.scheme)
            .field("pepper", &self.pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_scheme_parsing() {
        assert_eq!("sha256".parse::<PasswordScheme>().unwrap(), PasswordScheme::Sha256);
        assert_eq!(" Argon2 ".parse::<PasswordScheme>().unwrap(), PasswordScheme::Argon2);
        assert!("md5".parse::<PasswordScheme>().is_err());
    }

    #[test]
    fn test_password_config_debug_redacts_pepper() {
        let config = PasswordConfig {
            scheme: PasswordScheme::Sha256,
            pepper: Some("very-secret".to_string()),
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
