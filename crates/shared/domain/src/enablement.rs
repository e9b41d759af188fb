//! Enablement value object.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assertion::argument_true;
use crate::constants::MSG_ENABLEMENT_WINDOW;
use crate::error::{DomainError, DomainResult};

/// Whether access is permitted, optionally restricted to a validity window.
///
/// Immutable: a user's enablement is redefined by replacing the whole value.
/// Either bound of the window may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "EnablementRecord")]
pub struct Enablement {
    enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_date: Option<DateTime<Utc>>,
}

impl Enablement {
    /// Create an enablement. Fails when `start_date` is after `end_date`.
    pub fn new(
        enabled: bool,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> DomainResult<Self> {
        if let (Some(start), Some(end)) = (start_date, end_date) {
            argument_true(start <= end, MSG_ENABLEMENT_WINDOW)?;
        }
        Ok(Self {
            enabled,
            start_date,
            end_date,
        })
    }

    /// Enabled with no time restriction
    pub fn indefinite() -> Self {
        Self {
            enabled: true,
            start_date: None,
            end_date: None,
        }
    }

    /// Disabled with no time restriction
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            start_date: None,
            end_date: None,
        }
    }

    pub fn is_enabled_flag(&self) -> bool {
        self.enabled
    }

    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date
    }

    /// True when `now` falls outside the validity window
    pub fn is_time_expired(&self, now: DateTime<Utc>) -> bool {
        let not_started = self.start_date.is_some_and(|start| now < start);
        let ended = self.end_date.is_some_and(|end| now > end);
        not_started || ended
    }

    /// Access is permitted at `now`
    pub fn is_currently_valid(&self, now: DateTime<Utc>) -> bool {
        self.enabled && !self.is_time_expired(now)
    }

    /// Access is permitted right now
    pub fn is_enablement_enabled(&self) -> bool {
        self.is_currently_valid(Utc::now())
    }
}

/// Serialized shape of an [`Enablement`], checked on the way in
#[derive(Deserialize)]
struct EnablementRecord {
    enabled: bool,
    #[serde(default)]
    start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    end_date: Option<DateTime<Utc>>,
}

impl TryFrom<EnablementRecord> for Enablement {
    type Error = DomainError;

    fn try_from(record: EnablementRecord) -> Result<Self, Self::Error> {
        Enablement::new(record.enabled, record.start_date, record.end_date)
    }
}

impl Default for Enablement {
    fn default() -> Self {
        Self::indefinite()
    }
}

impl fmt::Display for Enablement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |d: Option<DateTime<Utc>>| d.map_or_else(|| "-".to_string(), |d| d.to_rfc3339());
        write!(
            f,
            "Enablement [enabled={}, startDate={}, endDate={}]",
            self.enabled,
            bound(self.start_date),
            bound(self.end_date)
        )
    }
}
