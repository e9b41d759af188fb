//! Tenant identifier value object.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assertion::argument_not_empty;
use crate::constants::MSG_TENANT_REQUIRED;
use crate::error::{DomainError, DomainResult};

/// Opaque, comparable tenant identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    /// Wrap an existing identifier. Fails when empty.
    pub fn new(id: impl Into<String>) -> DomainResult<Self> {
        let id = id.into();
        argument_not_empty(id.trim(), MSG_TENANT_REQUIRED)?;
        Ok(Self(id))
    }

    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TenantId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TenantId::new(s)
    }
}

impl TryFrom<String> for TenantId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TenantId::new(value)
    }
}

impl From<TenantId> for String {
    fn from(id: TenantId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_blank() {
        assert!(matches!(TenantId::new(""), Err(DomainError::EmptyArgument(_))));
        assert!(matches!(TenantId::new("  "), Err(DomainError::EmptyArgument(_))));
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(TenantId::generate(), TenantId::generate());
    }

    #[test]
    fn test_serde_is_transparent_string() {
        let id = TenantId::new("T1").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"T1\"");

        let parsed: TenantId = serde_json::from_str("\"T1\"").unwrap();
        assert_eq!(parsed, id);
        assert!(serde_json::from_str::<TenantId>("\"\"").is_err());
    }
}
