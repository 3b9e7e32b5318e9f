//! Password primitives: secret input, stored hash and the length policy.

use std::fmt;

use zeroize::Zeroizing;

/// Default minimum password length accepted from API clients.
pub const DEFAULT_PASSWORD_MIN_LENGTH: usize = 5;

/// Longest password, in bytes, that bcrypt hashes without truncation.
pub const PASSWORD_MAX_BYTES: usize = 72;

/// Clear-text password supplied by a caller.
///
/// The buffer is wiped on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct PlainPassword(Zeroizing<String>);

impl PlainPassword {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    /// Borrow the secret for hashing or verification.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlainPassword(***)")
    }
}

/// One-way password hash as produced by a [`crate::domain::ports::PasswordHasher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Rejections raised by [`PasswordPolicy::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordPolicyError {
    TooShort { min: usize },
    TooLong { max: usize },
}

impl fmt::Display for PasswordPolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { min } => {
                write!(f, "ensure this field has at least {min} characters")
            }
            Self::TooLong { max } => {
                write!(f, "ensure this field has no more than {max} bytes")
            }
        }
    }
}

impl std::error::Error for PasswordPolicyError {}

/// Rules applied to passwords chosen through the public API.
///
/// # Examples
/// ```
/// use recipe_backend::domain::{PasswordPolicy, PlainPassword};
///
/// let policy = PasswordPolicy::default();
/// assert!(policy.check(&PlainPassword::new("test")).is_err());
/// assert!(policy.check(&PlainPassword::new("testpass123")).is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_PASSWORD_MIN_LENGTH)
    }
}

impl PasswordPolicy {
    pub const fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    pub const fn min_length(&self) -> usize {
        self.min_length
    }

    /// Check a candidate password against the policy.
    pub fn check(&self, password: &PlainPassword) -> Result<(), PasswordPolicyError> {
        if password.expose().chars().count() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min: self.min_length,
            });
        }
        Self::check_hashable(password)
    }

    /// Reject passwords the hasher would otherwise have to truncate.
    ///
    /// Applies to every stored password, including operator-provisioned ones.
    pub fn check_hashable(password: &PlainPassword) -> Result<(), PasswordPolicyError> {
        if password.expose().len() > PASSWORD_MAX_BYTES {
            return Err(PasswordPolicyError::TooLong {
                max: PASSWORD_MAX_BYTES,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", false)]
    #[case("pw", false)]
    #[case("test", false)]
    #[case("tests", true)]
    #[case("testpass123", true)]
    fn default_policy_requires_five_characters(#[case] raw: &str, #[case] accepted: bool) {
        let result = PasswordPolicy::default().check(&PlainPassword::new(raw));
        assert_eq!(result.is_ok(), accepted);
    }

    #[test]
    fn policy_counts_characters_not_bytes() {
        let policy = PasswordPolicy::new(4);
        assert!(policy.check(&PlainPassword::new("ééé")).is_err());
        assert!(policy.check(&PlainPassword::new("éééé")).is_ok());
    }

    #[rstest]
    #[case(PASSWORD_MAX_BYTES, true)]
    #[case(PASSWORD_MAX_BYTES + 1, false)]
    fn passwords_beyond_the_hash_limit_are_rejected(#[case] len: usize, #[case] accepted: bool) {
        let candidate = PlainPassword::new("a".repeat(len));
        let result = PasswordPolicy::default().check(&candidate);
        assert_eq!(result.is_ok(), accepted);
        if !accepted {
            assert_eq!(
                result,
                Err(PasswordPolicyError::TooLong {
                    max: PASSWORD_MAX_BYTES
                })
            );
        }
    }

    #[test]
    fn hash_limit_counts_bytes() {
        let candidate = PlainPassword::new("é".repeat(40));
        assert!(PasswordPolicy::check_hashable(&candidate).is_err());
    }

    #[test]
    fn debug_output_hides_secret() {
        let rendered = format!("{:?}", PlainPassword::new("hunter2"));
        assert!(!rendered.contains("hunter2"));
    }
}
