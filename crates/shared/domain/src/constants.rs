//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Identity
// =============================================================================

/// Maximum username length
pub const MAX_USERNAME_LENGTH: usize = 250;

/// Maximum length of a first or last name
pub const MAX_NAME_PART_LENGTH: usize = 50;

/// Maximum email address length (RFC 5321 path limit)
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Telephone number length bounds
pub const MIN_TELEPHONE_LENGTH: usize = 5;
pub const MAX_TELEPHONE_LENGTH: usize = 20;

// =============================================================================
// Password strength
// =============================================================================

/// Passwords shorter than this are always weak
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Score at or above which a password is not weak
pub const STRONG_PASSWORD_THRESHOLD: u32 = 20;

/// Score at or above which a password is very strong
pub const VERY_STRONG_PASSWORD_THRESHOLD: u32 = 40;

/// Bonus granted per character class present (lower, upper, digit, symbol)
pub const CHARACTER_CLASS_BONUS: u32 = 5;

/// Characters counted as symbols by the strength score
pub const PASSWORD_SYMBOLS: &str = "\"`!?$%^&*()_-+={[}]:;@'~#|\\<,>./";

// =============================================================================
// Events
// =============================================================================

/// Version stamped on every identity event payload
pub const EVENT_VERSION: u32 = 1;

// =============================================================================
// Validation messages
// =============================================================================

pub const MSG_TENANT_REQUIRED: &str = "The tenant id must be provided.";
pub const MSG_USERNAME_REQUIRED: &str = "The username must be provided.";
pub const MSG_USERNAME_LENGTH: &str = "The username must be 250 characters or less.";
pub const MSG_PASSWORD_REQUIRED: &str = "The password must be provided.";
pub const MSG_PASSWORDS_REQUIRED: &str = "Current and new password must be provided.";
pub const MSG_PASSWORD_NOT_CONFIRMED: &str = "Current password not confirmed.";
pub const MSG_PASSWORD_UNCHANGED: &str = "The password is unchanged.";
pub const MSG_PASSWORD_WEAK: &str = "The password must be stronger.";
pub const MSG_USERNAME_PASSWORD_SAME: &str = "The username and password must not be the same.";
pub const MSG_PERSON_ALREADY_ASSOCIATED: &str = "The person is already associated with a user.";
pub const MSG_ENABLEMENT_WINDOW: &str = "Enablement start and/or end date is invalid.";
