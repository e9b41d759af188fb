//! Password protection - encryption and strength capabilities plus the
//! policy the user aggregate applies to every new credential.
//!
//! The aggregate only ever stores what [`EncryptionService::encrypted_value`]
//! returns, and verifies a presented password with
//! [`EncryptionService::matches`].

use std::fmt;
use std::sync::Arc;

use argon2::{
    password_hash::{
        self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};
use sha2::{Digest, Sha256};

use crate::assertion::{argument_changed, argument_not_empty, argument_true, policy_satisfied};
use crate::constants::{
    CHARACTER_CLASS_BONUS, MIN_PASSWORD_LENGTH, MSG_PASSWORDS_REQUIRED,
    MSG_PASSWORD_NOT_CONFIRMED, MSG_PASSWORD_REQUIRED, MSG_PASSWORD_UNCHANGED, MSG_PASSWORD_WEAK,
    MSG_USERNAME_PASSWORD_SAME, PASSWORD_SYMBOLS, STRONG_PASSWORD_THRESHOLD,
    VERY_STRONG_PASSWORD_THRESHOLD,
};
use crate::error::{DomainError, DomainResult};

/// Turns a plaintext credential into its stored form.
pub trait EncryptionService: Send + Sync {
    /// The stored form of `plain_text`
    fn encrypted_value(&self, plain_text: &str) -> DomainResult<String>;

    /// Whether `plain_text` corresponds to the stored `encrypted` value.
    ///
    /// Defaults to encrypting and comparing, which requires a deterministic
    /// transform. Salted schemes override this. A failing collaborator is an
    /// error, never a mismatch.
    fn matches(&self, plain_text: &str, encrypted: &str) -> DomainResult<bool> {
        Ok(self.encrypted_value(plain_text)? == encrypted)
    }
}

/// Decides whether a candidate password is acceptable.
pub trait PasswordService: Send + Sync {
    fn is_weak(&self, plain_text: &str) -> bool;
}

/// Deterministic SHA-256 transform, hex encoded.
///
/// Same input always yields the same output, so stored values can be
/// compared directly. An optional pepper is prepended before hashing.
#[derive(Clone, Default)]
pub struct Sha256EncryptionService {
    pepper: Option<String>,
}

impl Sha256EncryptionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pepper(pepper: impl Into<String>) -> Self {
        Self {
            pepper: Some(pepper.into()),
        }
    }
}

// Don't expose the pepper in debug output
impl fmt::Debug for Sha256EncryptionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sha256EncryptionService")
            .field("pepper", &self.pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl EncryptionService for Sha256EncryptionService {
    fn encrypted_value(&self, plain_text: &str) -> DomainResult<String> {
        argument_not_empty(plain_text, MSG_PASSWORD_REQUIRED)?;

        let mut hasher = Sha256::new();
        if let Some(pepper) = &self.pepper {
            hasher.update(pepper.as_bytes());
        }
        hasher.update(plain_text.as_bytes());
        Ok(hex::encode(hasher.finalize()))
    }
}

/// Salted Argon2 hashing with verify-style matching.
///
/// Two encryptions of the same password differ, so equality of stored values
/// says nothing; use [`EncryptionService::matches`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2EncryptionService;

impl Argon2EncryptionService {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

impl EncryptionService for Argon2EncryptionService {
    fn encrypted_value(&self, plain_text: &str) -> DomainResult<String> {
        argument_not_empty(plain_text, MSG_PASSWORD_REQUIRED)?;

        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| DomainError::encryption(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn matches(&self, plain_text: &str, encrypted: &str) -> DomainResult<bool> {
        let parsed = PasswordHash::new(encrypted)
            .map_err(|e| DomainError::encryption(format!("Stored password hash is invalid: {}", e)))?;

        match Self::argon2().verify_password(plain_text.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(DomainError::encryption(format!("Password verification failed: {}", e))),
        }
    }
}

/// Strength score
///
/// One point per character, plus a bonus for each character class present
/// (lowercase, uppercase, digit, symbol). Anything shorter than
/// [`MIN_PASSWORD_LENGTH`] is weak regardless of score.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrengthPasswordService;

impl StrengthPasswordService {
    pub fn new() -> Self {
        Self
    }

    pub fn strength(&self, plain_text: &str) -> u32 {
        let mut length = 0u32;
        let (mut lower, mut upper, mut digit, mut symbol) = (false, false, false, false);

        for c in plain_text.chars() {
            length += 1;
            if c.is_lowercase() {
                lower = true;
            } else if c.is_uppercase() {
                upper = true;
            } else if c.is_ascii_digit() {
                digit = true;
            } else if PASSWORD_SYMBOLS.contains(c) {
                symbol = true;
            }
        }

        let classes = [lower, upper, digit, symbol].iter().filter(|&&p| p).count() as u32;
        length + classes * CHARACTER_CLASS_BONUS
    }

    pub fn is_very_strong(&self, plain_text: &str) -> bool {
        plain_text.chars().count() >= MIN_PASSWORD_LENGTH
            && self.strength(plain_text) >= VERY_STRONG_PASSWORD_THRESHOLD
    }
}

impl PasswordService for StrengthPasswordService {
    fn is_weak(&self, plain_text: &str) -> bool {
        plain_text.chars().count() < MIN_PASSWORD_LENGTH
            || self.strength(plain_text) < STRONG_PASSWORD_THRESHOLD
    }
}

/// The checks every new credential passes before it is stored.
///
/// Registration and password change are separate entry points: registration
/// has no prior password to compare against, a change must confirm one.
#[derive(Clone)]
pub struct PasswordPolicy {
    encryption: Arc<dyn EncryptionService>,
    strength: Arc<dyn PasswordService>,
}

impl fmt::Debug for PasswordPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordPolicy").finish_non_exhaustive()
    }
}

impl PasswordPolicy {
    pub fn new(encryption: Arc<dyn EncryptionService>, strength: Arc<dyn PasswordService>) -> Self {
        Self {
            encryption,
            strength,
        }
    }

    /// Deterministic SHA-256 encryption and the default strength score
    pub fn standard() -> Self {
        Self::new(
            Arc::new(Sha256EncryptionService::new()),
            Arc::new(StrengthPasswordService::new()),
        )
    }

    /// Protect the first password of a new user and return its stored form.
    pub fn protect_initial(&self, username: &str, password: &str) -> DomainResult<String> {
        argument_not_empty(password, MSG_PASSWORD_REQUIRED)?;
        self.protect(username, password)
    }

    /// Confirm that `current` is the password behind `stored`.
    pub fn confirm_current(&self, current: &str, stored: &str) -> DomainResult<()> {
        argument_not_empty(current, MSG_PASSWORDS_REQUIRED)?;
        if !self.encryption.matches(current, stored)? {
            return Err(DomainError::argument_mismatch(MSG_PASSWORD_NOT_CONFIRMED));
        }
        Ok(())
    }

    /// Protect a replacement password and return its stored form.
    ///
    /// Does not confirm `current`; call [`Self::confirm_current`] first.
    pub fn protect_change(
        &self,
        username: &str,
        current: &str,
        changed: &str,
    ) -> DomainResult<String> {
        argument_changed(current, changed, MSG_PASSWORD_UNCHANGED)?;
        self.protect(username, changed)
    }

    fn protect(&self, username: &str, password: &str) -> DomainResult<String> {
        policy_satisfied(!self.strength.is_weak(password), MSG_PASSWORD_WEAK)?;
        policy_satisfied(username != password, MSG_USERNAME_PASSWORD_SAME)?;

        let encrypted = self.encryption.encrypted_value(password)?;
        argument_true(!encrypted.is_empty(), "Encrypted password must not be empty.")?;
        Ok(encrypted)
    }
}
