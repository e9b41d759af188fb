//! Argument assertions shared by the aggregate and value objects.
//!
//! Each function checks one condition and maps a failure to one
//! [`DomainError`] kind, so operations can compose them with `?` and stop at
//! the first failure.

use regex::Regex;

use crate::error::{DomainError, DomainResult};

/// Fails with `EmptyArgument` when `value` is empty.
pub fn argument_not_empty(value: &str, message: &str) -> DomainResult<()> {
    if value.is_empty() {
        return Err(DomainError::empty_argument(message));
    }
    Ok(())
}

/// Fails with `ArgumentMismatch` when the values differ.
pub fn argument_equals<T: PartialEq + ?Sized>(
    expected: &T,
    actual: &T,
    message: &str,
) -> DomainResult<()> {
    if expected != actual {
        return Err(DomainError::argument_mismatch(message));
    }
    Ok(())
}

/// Fails with `ArgumentUnchanged` when the values are equal.
pub fn argument_changed<T: PartialEq + ?Sized>(
    old: &T,
    new: &T,
    message: &str,
) -> DomainResult<()> {
    if old == new {
        return Err(DomainError::argument_unchanged(message));
    }
    Ok(())
}

/// Fails with `PolicyViolation` when `satisfied` is false.
pub fn policy_satisfied(satisfied: bool, message: &str) -> DomainResult<()> {
    if !satisfied {
        return Err(DomainError::policy_violation(message));
    }
    Ok(())
}

/// Fails with `InvalidArgument` when `condition` is false.
pub fn argument_true(condition: bool, message: &str) -> DomainResult<()> {
    if !condition {
        return Err(DomainError::invalid_argument(message));
    }
    Ok(())
}

/// Fails with `InvalidArgument` when the character count is outside `min..=max`.
pub fn argument_length(value: &str, min: usize, max: usize, message: &str) -> DomainResult<()> {
    let length = value.chars().count();
    argument_true(length >= min && length <= max, message)
}

/// Fails with `InvalidArgument` when `value` does not match `pattern`.
pub fn argument_matches(pattern: &Regex, value: &str, message: &str) -> DomainResult<()> {
    argument_true(pattern.is_match(value), message)
}
