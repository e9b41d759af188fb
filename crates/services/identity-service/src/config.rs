//! Identity service configuration.

use std::env;
use std::sync::Arc;

use common::{EventChannelConfig, PasswordConfig, PasswordScheme, ServiceConfig};
use domain::{
    Argon2EncryptionService, EncryptionService, PasswordPolicy, Sha256EncryptionService,
    StrengthPasswordService,
};

/// Identity service configuration.
#[derive(Debug, Clone)]
pub struct IdentityServiceConfig {
    /// Bind address and service identity
    pub service: ServiceConfig,
    /// Domain event channel sizing
    pub events: EventChannelConfig,
    /// How passwords are encrypted
    pub password: PasswordConfig,
}

impl IdentityServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let scheme = match env::var("IDENTITY_PASSWORD_SCHEME") {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                tracing::warn!("{}, falling back to {}", e, PasswordScheme::default());
                PasswordScheme::default()
            }),
            Err(_) => PasswordScheme::default(),
        };

        Self {
            service: ServiceConfig {
                service_name: "identity-service".to_string(),
                host: env::var("IDENTITY_SERVICE_HOST").unwrap_or(defaults.service.host),
                port: env::var("IDENTITY_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.service.port),
                log_level: env::var("RUST_LOG").unwrap_or(defaults.service.log_level),
            },
            events: EventChannelConfig {
                capacity: env::var("IDENTITY_EVENT_CHANNEL_CAPACITY")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .filter(|c: &usize| *c > 0)
                    .unwrap_or(defaults.events.capacity),
            },
            password: PasswordConfig {
                scheme,
                pepper: env::var("IDENTITY_PASSWORD_PEPPER")
                    .ok()
                    .filter(|p| !p.is_empty()),
            },
        }
    }

    /// Build the password policy this configuration describes.
    pub fn password_policy(&self) -> PasswordPolicy {
        let encryption: Arc<dyn EncryptionService> = match self.password.scheme {
            PasswordScheme::Sha256 => match &self.password.pepper {
                Some(pepper) => Arc::new(Sha256EncryptionService::with_pepper(pepper.clone())),
                None => Arc::new(Sha256EncryptionService::new()),
            },
            PasswordScheme::Argon2 => {
                if self.password.pepper.is_some() {
                    tracing::warn!("IDENTITY_PASSWORD_PEPPER is ignored by the argon2 scheme");
                }
                Arc::new(Argon2EncryptionService::new())
            }
        };

        PasswordPolicy::new(encryption, Arc::new(StrengthPasswordService::new()))
    }
}

impl Default for IdentityServiceConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                service_name: "identity-service".to_string(),
                ..ServiceConfig::default()
            },
            events: EventChannelConfig::default(),
            password: PasswordConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_deterministic() {
        let policy = IdentityServiceConfig::default().password_policy();
        let first = policy.protect_initial("jdoe", "Goodpass1!").unwrap();
        let second = policy.protect_initial("jdoe", "Goodpass1!").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_argon2_policy_verifies() {
        let mut config = IdentityServiceConfig::default();
        config.password.scheme = PasswordScheme::Argon2;
        let policy = config.password_policy();

        let stored = policy.protect_initial("jdoe", "Goodpass1!").unwrap();
        assert!(stored.starts_with("$argon2"));
        assert!(policy.confirm_current("Goodpass1!", &stored).is_ok());
    }
}
