//! Person entity and its contact value objects.
//!
//! The Person holds the human-facing profile of a user. It is associated with
//! exactly one user, recorded by that user's natural key rather than a
//! reference back to the aggregate.

use std::fmt;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::assertion::{argument_length, argument_matches, argument_not_empty, argument_true};
use crate::constants::{
    EVENT_VERSION, MAX_EMAIL_LENGTH, MAX_NAME_PART_LENGTH, MAX_TELEPHONE_LENGTH,
    MIN_TELEPHONE_LENGTH, MSG_PERSON_ALREADY_ASSOCIATED,
};
use crate::error::{DomainError, DomainResult};
use crate::event::{
    DomainEventPublisher, IdentityEvent, PersonContactInformationChanged, PersonNameChanged,
};
use crate::user::UserIdentity;

// Hardcoded patterns; a failure here is a source bug.
static NAME_PART_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\p{Lu}[\p{L}'\- ]*$").expect("hardcoded name regex is invalid")
});

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("hardcoded email regex is invalid")
});

static TELEPHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[0-9()\- ]+$").expect("hardcoded telephone regex is invalid")
});

/// A person's first and last name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "FullNameRecord")]
pub struct FullName {
    first_name: String,
    last_name: String,
}

impl FullName {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> DomainResult<Self> {
        let first_name = first_name.into();
        let last_name = last_name.into();
        Self::check_part(&first_name, "First name")?;
        Self::check_part(&last_name, "Last name")?;
        Ok(Self {
            first_name,
            last_name,
        })
    }

    fn check_part(value: &str, label: &str) -> DomainResult<()> {
        argument_not_empty(value, &format!("{label} is required."))?;
        argument_length(
            value,
            1,
            MAX_NAME_PART_LENGTH,
            &format!("{label} must be {MAX_NAME_PART_LENGTH} characters or less."),
        )?;
        argument_matches(
            &NAME_PART_REGEX,
            value,
            &format!("{label} must start with an uppercase letter and contain only letters."),
        )
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// "First Last"
    pub fn as_formatted_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Deserialize)]
struct FullNameRecord {
    first_name: String,
    last_name: String,
}

impl TryFrom<FullNameRecord> for FullName {
    type Error = DomainError;

    fn try_from(record: FullNameRecord) -> Result<Self, Self::Error> {
        FullName::new(record.first_name, record.last_name)
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

/// Validated email address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(address: impl Into<String>) -> DomainResult<Self> {
        let address = address.into().trim().to_string();
        argument_not_empty(&address, "The email address is required.")?;
        argument_length(
            &address,
            1,
            MAX_EMAIL_LENGTH,
            "Email address must be 254 characters or less.",
        )?;
        argument_matches(&EMAIL_REGEX, &address, "Email address format is invalid.")?;
        Ok(Self(address))
    }

    pub fn address(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        EmailAddress::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}

/// Telephone number
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Telephone(String);

impl Telephone {
    pub fn new(number: impl Into<String>) -> DomainResult<Self> {
        let number = number.into().trim().to_string();
        argument_not_empty(&number, "Telephone number is required.")?;
        argument_length(
            &number,
            MIN_TELEPHONE_LENGTH,
            MAX_TELEPHONE_LENGTH,
            "Telephone number may not be more than 20 characters.",
        )?;
        argument_matches(
            &TELEPHONE_REGEX,
            &number,
            "Telephone number or its format is invalid.",
        )?;
        argument_true(
            number.chars().any(|c| c.is_ascii_digit()),
            "Telephone number must contain digits.",
        )?;
        Ok(Self(number))
    }

    pub fn number(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Telephone {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Telephone::new(value)
    }
}

impl From<Telephone> for String {
    fn from(telephone: Telephone) -> Self {
        telephone.0
    }
}

/// How to reach a person
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactInformation {
    email_address: EmailAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    primary_telephone: Option<Telephone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    secondary_telephone: Option<Telephone>,
}

impl ContactInformation {
    pub fn new(
        email_address: EmailAddress,
        primary_telephone: Option<Telephone>,
        secondary_telephone: Option<Telephone>,
    ) -> Self {
        Self {
            email_address,
            primary_telephone,
            secondary_telephone,
        }
    }

    pub fn email_address(&self) -> &EmailAddress {
        &self.email_address
    }

    pub fn primary_telephone(&self) -> Option<&Telephone> {
        self.primary_telephone.as_ref()
    }

    pub fn secondary_telephone(&self) -> Option<&Telephone> {
        self.secondary_telephone.as_ref()
    }
}

/// The profile associated with a user
///
/// Serializable for projections, but never deserialized: the owning user is
/// recorded only by the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    name: FullName,
    contact_information: ContactInformation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<UserIdentity>,
}

impl Person {
    pub fn new(name: FullName, contact_information: ContactInformation) -> Self {
        Self {
            name,
            contact_information,
            user: None,
        }
    }

    pub fn name(&self) -> &FullName {
        &self.name
    }

    pub fn contact_information(&self) -> &ContactInformation {
        &self.contact_information
    }

    pub fn email_address(&self) -> &EmailAddress {
        self.contact_information.email_address()
    }

    /// Natural key of the user this person belongs to, once registered
    pub fn user(&self) -> Option<&UserIdentity> {
        self.user.as_ref()
    }

    /// Record the owning user. A person can be associated only once.
    pub(crate) fn associate_with(&mut self, user: UserIdentity) -> DomainResult<()> {
        argument_true(self.user.is_none(), MSG_PERSON_ALREADY_ASSOCIATED)?;
        self.user = Some(user);
        Ok(())
    }

    /// Fails if this person already belongs to a user
    pub(crate) fn ensure_unassociated(&self) -> DomainResult<()> {
        argument_true(self.user.is_none(), MSG_PERSON_ALREADY_ASSOCIATED)
    }

    pub fn change_name(&mut self, name: FullName, publisher: &dyn DomainEventPublisher) {
        self.name = name;

        if let Some(user) = &self.user {
            publisher.publish(IdentityEvent::PersonNameChanged(PersonNameChanged {
                tenant_id: user.tenant_id().clone(),
                username: user.username().to_string(),
                name: self.name.clone(),
                occurred_on: Utc::now(),
                event_version: EVENT_VERSION,
            }));
        }
    }

    pub fn change_contact_information(
        &mut self,
        contact_information: ContactInformation,
        publisher: &dyn DomainEventPublisher,
    ) {
        self.contact_information = contact_information;

        if let Some(user) = &self.user {
            publisher.publish(IdentityEvent::PersonContactInformationChanged(
                PersonContactInformationChanged {
                    tenant_id: user.tenant_id().clone(),
                    username: user.username().to_string(),
                    contact_information: self.contact_information.clone(),
                    occurred_on: Utc::now(),
                    event_version: EVENT_VERSION,
                },
            ));
        }
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Person [name={}, emailAddress={}]",
            self.name, self.contact_information.email_address
        )
    }
}
